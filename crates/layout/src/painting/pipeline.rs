//! Per-node paint order.
//!
//! A node paints its document side effects, shifts itself by its relative
//! offset, opens its opacity group and structure tag, then paints
//! background, borders, content and positioned children before undoing all
//! of it in reverse. Floats, transformed boxes and outlines are deferred to
//! the context's list and painted after the flow pass.

use super::background::draw_background;
use super::border::draw_borders;
use super::clip::resolve_radius;
use super::context::DrawContext;
use crate::LayoutError;
use crate::box_model::{apply_edges, apply_margins};
use crate::interface::LayoutArea;
use crate::nodes::image::image_source;
use crate::nodes::text::text_state;
use crate::positioning::apply_relative;
use crate::properties::{Property, PropertyValue};
use crate::text::metrics::{BOLD_SIMULATION_STROKE, ITALIC_ANGLE};
use crate::text::{is_invisible, scale};
use crate::tree::{NodeId, NodeKind, RenderNode, RenderTree};
use folio_style::{Background, BackgroundImage, Border, BorderRadius, TextDecoration};
use folio_traits::{Annotation, Canvas, Glyph, TEXT_SPACE_COEFF};
use folio_types::{AffineTransform, AnchorId, Color, Rect};

/// Paints `id` and everything it contains, then marks it flushed.
///
/// Painting a node twice, or before it has an occupied area, is an error.
pub fn draw(tree: &mut RenderTree, id: NodeId, ctx: &mut DrawContext<'_>) -> Result<(), LayoutError> {
    if tree.is_flushed(id) {
        return Err(LayoutError::InvalidTree(format!(
            "{} node {} is already flushed",
            tree.node(id).kind.name(),
            id.index()
        )));
    }
    let Some(area) = tree.occupied(id) else {
        return Err(LayoutError::UninitializedArea(format!(
            "{} node {} was drawn before layout",
            tree.node(id).kind.name(),
            id.index()
        )));
    };

    apply_document_effects(tree, id, area, ctx);
    apply_relative(tree, id, false);
    let result = draw_shifted(tree, id, ctx);
    apply_relative(tree, id, true);
    result?;
    tree.mark_flushed(id)
}

/// Paints a flow child, or defers it when it floats or is transformed.
///
/// A child with an outline also queues a box for the outline, grown by the
/// outline width and offset, unless that box is too small to hold it.
pub fn draw_child(tree: &mut RenderTree, child: NodeId, ctx: &mut DrawContext<'_>) -> Result<(), LayoutError> {
    if let Some(outline) = tree.get::<Option<Border>>(child, Property::Outline).flatten() {
        queue_outline(tree, child, outline, ctx);
    }
    if tree.is_floating(child) || tree.has_property(child, Property::Transform) {
        ctx.defer(child);
        return Ok(());
    }
    draw(tree, child, ctx)
}

/// Paints deferred nodes in append order, including any deferred while
/// draining.
pub fn drain_deferred(tree: &mut RenderTree, ctx: &mut DrawContext<'_>) -> Result<(), LayoutError> {
    while !ctx.deferred.is_empty() {
        let queued = std::mem::take(&mut ctx.deferred);
        for id in queued {
            match tree.get::<AffineTransform>(id, Property::Transform) {
                Some(transform) => draw_transformed(tree, id, transform, ctx)?,
                None => draw(tree, id, ctx)?,
            }
        }
    }
    Ok(())
}

/// Applies `transform` around the centre of the node's box.
fn draw_transformed(
    tree: &mut RenderTree,
    id: NodeId,
    transform: AffineTransform,
    ctx: &mut DrawContext<'_>,
) -> Result<(), LayoutError> {
    let centre = tree
        .occupied(id)
        .map(|a| (a.rect.x + a.rect.width / 2.0, a.rect.y + a.rect.height / 2.0))
        .unwrap_or((0.0, 0.0));
    let matrix = AffineTransform::translation(-centre.0, -centre.1)
        .then(&transform)
        .then(&AffineTransform::translation(centre.0, centre.1));
    ctx.canvas.save_state();
    ctx.canvas.concat_matrix(matrix);
    let result = draw(tree, id, ctx);
    ctx.canvas.restore_state();
    result
}

fn queue_outline(tree: &mut RenderTree, child: NodeId, outline: Border, ctx: &mut DrawContext<'_>) {
    let Some(area) = tree.occupied(child) else {
        return;
    };
    let width = outline.effective_width();
    if width <= 0.0 {
        return;
    }
    let grow = width + tree.as_float(child, Property::OutlineOffset).unwrap_or(0.0);
    let rect = area.rect.apply_edges(grow, grow, grow, grow, true);
    if rect.width < 2.0 * width || rect.height < 2.0 * width {
        log::debug!("Outline box {:?} of node {} is too small to draw", rect, child.index());
        return;
    }

    let mut node = RenderNode::new(NodeKind::Block, None);
    node.properties.set(Property::Border, PropertyValue::Border(Some(outline)));
    node.occupied = Some(LayoutArea::new(area.page_number, rect));
    let outline_box = tree.insert(node);
    ctx.defer(outline_box);
}

/// Registers destinations and annotations. A destination is consumed so a
/// fragment painted later does not register it again.
fn apply_document_effects(tree: &mut RenderTree, id: NodeId, area: LayoutArea, ctx: &mut DrawContext<'_>) {
    let rect = apply_margins(area.rect, &tree.margins(id), false);
    if let Some(anchor) = tree.get::<AnchorId>(id, Property::Destination) {
        ctx.document
            .add_named_destination(&anchor, area.page_number, rect.top());
        tree.delete(id, Property::Destination);
    }
    if let Some(uri) = tree.get::<String>(id, Property::Action) {
        ctx.document
            .add_annotation(area.page_number, Annotation::Action { rect, uri });
    }
    if let Some(target) = tree.get::<AnchorId>(id, Property::Link) {
        ctx.document
            .add_annotation(area.page_number, Annotation::Link { rect, target });
    }
}

fn draw_shifted(tree: &mut RenderTree, id: NodeId, ctx: &mut DrawContext<'_>) -> Result<(), LayoutError> {
    let Some(area) = tree.occupied(id) else {
        return Ok(());
    };

    let opacity = tree.as_float(id, Property::Opacity).unwrap_or(1.0);
    let grouped = opacity < 1.0;
    if grouped {
        ctx.canvas.save_state();
        ctx.canvas.set_opacity(opacity, opacity);
    }
    let role = tree.get::<String>(id, Property::Role);
    if let Some(role) = &role {
        ctx.canvas.open_tag(role);
    }

    let border_box = apply_margins(area.rect, &tree.margins(id), false);
    let borders = tree.borders(id);
    let radius = resolve_radius(tree.get::<BorderRadius>(id, Property::BorderRadius), &border_box);
    let background = tree.get::<Background>(id, Property::Background);
    let image = tree.get::<BackgroundImage>(id, Property::BackgroundImage);
    draw_background(ctx.canvas, border_box, background.as_ref(), image.as_ref(), radius, &borders);
    draw_borders(ctx.canvas, border_box, &borders, radius);

    let content_box = apply_edges(border_box, &tree.border_padding(id), false);
    draw_content(tree, id, content_box, ctx)?;

    for child in tree.positioned_children(id).to_vec() {
        if tree.occupied(child).is_none() {
            log::warn!("Positioned node {} was never placed, skipping", child.index());
            continue;
        }
        draw_child(tree, child, ctx)?;
    }

    if role.is_some() {
        ctx.canvas.close_tag();
    }
    if grouped {
        ctx.canvas.restore_state();
    }
    Ok(())
}

fn draw_content(
    tree: &mut RenderTree,
    id: NodeId,
    content_box: Rect,
    ctx: &mut DrawContext<'_>,
) -> Result<(), LayoutError> {
    let children: Vec<NodeId> = match &tree.node(id).kind {
        NodeKind::Text(_) => {
            draw_text(tree, id, ctx.canvas);
            return Ok(());
        }
        NodeKind::Image => {
            if let Some(source) = image_source(tree, id) {
                ctx.canvas.add_image(&source.uri, content_box);
            }
            return Ok(());
        }
        NodeKind::Paragraph(state) => state
            .lines
            .iter()
            .flat_map(|line| line.fragments.iter().copied())
            .collect(),
        NodeKind::Document | NodeKind::Block | NodeKind::Table => tree.children(id).to_vec(),
    };

    for child in children {
        draw_child(tree, child, ctx)?;
    }
    if matches!(tree.node(id).kind, NodeKind::Document) {
        drain_deferred(tree, ctx)?;
    }
    Ok(())
}

fn draw_text(tree: &RenderTree, id: NodeId, canvas: &mut dyn Canvas) {
    let (Some(state), Some(area)) = (text_state(tree, id), tree.occupied(id)) else {
        return;
    };
    let (Some(line), Some(font)) = (&state.line, &state.font) else {
        return;
    };
    let size = state.font_size;
    if size <= 0.0 {
        return;
    }

    let word_spacing = state.word_spacing * TEXT_SPACE_COEFF / size;
    let glyphs: Vec<Glyph> = line
        .as_slice()
        .iter()
        .filter(|g| !is_invisible(g))
        .map(|g| {
            let mut glyph = *g;
            if glyph.is_space() {
                glyph.x_advance += word_spacing;
            }
            glyph
        })
        .collect();
    if glyphs.is_empty() {
        return;
    }

    let color = tree.as_color(id, Property::FontColor).unwrap_or(Color::BLACK);
    let rise = tree.as_float(id, Property::TextRise).unwrap_or(0.0);
    let italic = tree.as_bool(id, Property::ItalicSimulation).unwrap_or(false);
    let bold = tree.as_bool(id, Property::BoldSimulation).unwrap_or(false);
    let x = area.rect.x;
    let baseline = area.rect.top() - state.metrics.ascent;

    canvas.begin_text();
    canvas.set_font(font.postscript_name(), size);
    canvas.set_text_matrix(AffineTransform {
        c: if italic { ITALIC_ANGLE } else { 0.0 },
        e: x,
        f: baseline,
        ..AffineTransform::identity()
    });
    if rise != 0.0 {
        canvas.set_text_rise(rise);
    }
    canvas.set_fill_color(color);
    if bold {
        canvas.set_stroke_color(color);
        canvas.set_line_width(size * BOLD_SIMULATION_STROKE);
    }
    canvas.show_glyphs(&glyphs);
    canvas.end_text();

    let decoration = tree
        .get::<TextDecoration>(id, Property::TextDecoration)
        .unwrap_or_default();
    let metrics = font.metrics();
    let (offset, thickness) = match decoration {
        TextDecoration::None => return,
        TextDecoration::Underline => (
            scale(metrics.underline_position, size),
            scale(metrics.underline_thickness, size),
        ),
        TextDecoration::LineThrough => (size * 0.25, scale(metrics.underline_thickness, size)),
    };
    let thickness = if thickness > 0.0 { thickness } else { size / 15.0 };
    let y = baseline + rise + offset;
    canvas.save_state();
    canvas.set_stroke_color(color);
    canvas.set_line_width(thickness);
    canvas.move_to(x, y);
    canvas.line_to(x + area.rect.width, y);
    canvas.stroke();
    canvas.restore_state();
}
