//! Text leaf renderer.
//!
//! A text node shapes its content once, on first layout, into a shared
//! [`GlyphLine`]. Every later layout call breaks a single line off the
//! node's window; what fit and what remains become two copies of the node
//! that alias the same glyph buffer.

use crate::LayoutError;
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutResult};
use crate::model::ElementKind;
use crate::properties::{Property, PropertyValue};
use crate::text::line_breaker::{BreakStatus, LineBreakRequest, break_line};
use crate::text::metrics::{BOLD_SIMULATION_STROKE, ITALIC_ANGLE, LineMetrics};
use crate::text::GlyphLine;
use crate::tree::{NodeId, NodeKind, RenderTree};
use folio_style::{FontStyle, FontWeight, Overflow};
use folio_traits::{FontQuery, Hyphenator, SharedFont};
use folio_types::Rect;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct TextState {
    pub line: Option<GlyphLine>,
    pub font: Option<SharedFont>,
    pub font_size: f32,
    pub metrics: LineMetrics,
    /// Extra advance given to every space of a justified line, in points.
    pub word_spacing: f32,
}

pub fn text_state(tree: &RenderTree, id: NodeId) -> Option<&TextState> {
    match &tree.node(id).kind {
        NodeKind::Text(state) => Some(state),
        _ => None,
    }
}

fn text_state_mut(tree: &mut RenderTree, id: NodeId) -> Option<&mut TextState> {
    match &mut tree.node_mut(id).kind {
        NodeKind::Text(state) => Some(state),
        _ => None,
    }
}

/// Resolves the `Font` property to a font program.
///
/// The property may hold a resolved font or a family name; when it is unset
/// the configured default family is used. Anything else is a contract
/// violation.
pub fn resolve_font(
    tree: &RenderTree,
    id: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<SharedFont, LayoutError> {
    let family = match tree.property(id, Property::Font) {
        Some(PropertyValue::Font(font)) => return Ok(font),
        Some(PropertyValue::Text(family)) => family,
        None => env.config.default_font_family.clone(),
        Some(other) => {
            return Err(LayoutError::FontResolution(format!(
                "Font property must be a font or a family name, got {:?}",
                other
            )));
        }
    };

    let provider = env.fonts.ok_or(LayoutError::MissingFontProvider)?;
    let query = FontQuery::new(
        family,
        tree.get::<FontWeight>(id, Property::FontWeight)
            .unwrap_or_default(),
        tree.get::<FontStyle>(id, Property::FontStyle)
            .unwrap_or_default(),
    );
    provider
        .resolve(&query)
        .map_err(|e| LayoutError::FontResolution(e.to_string()))
}

pub fn font_size(tree: &RenderTree, id: NodeId, env: &LayoutEnvironment<'_>) -> f32 {
    tree.as_float(id, Property::FontSize)
        .unwrap_or(env.config.default_font_size)
}

/// Shapes the node's text unless it already carries a glyph line.
pub fn ensure_shaped(
    tree: &mut RenderTree,
    id: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<(), LayoutError> {
    if text_state(tree, id).is_some_and(|s| s.line.is_some()) {
        return Ok(());
    }

    let content = match &tree.node(id).model {
        Some(model) => match &model.borrow().kind {
            ElementKind::Text(content) => content.clone(),
            other => {
                return Err(LayoutError::InvalidTree(format!(
                    "text renderer bound to a {} element",
                    other.name()
                )));
            }
        },
        None => String::new(),
    };

    let font = resolve_font(tree, id, env)?;
    let line = GlyphLine::new(font.shape(&content));
    log::debug!(
        "Shaped {} glyphs with '{}'",
        line.len(),
        font.postscript_name()
    );
    if let Some(state) = text_state_mut(tree, id) {
        state.line = Some(line);
        state.font = Some(font);
    }
    Ok(())
}

/// Hyphenator for this node: its own, or the environment's when the node
/// merely enables hyphenation.
fn own_hyphenator(tree: &RenderTree, id: NodeId) -> (Option<Arc<dyn Hyphenator>>, bool) {
    match tree.property(id, Property::Hyphenation) {
        Some(PropertyValue::Hyphenator(h)) => (Some(h), true),
        Some(PropertyValue::Bool(enabled)) => (None, enabled),
        _ => (None, false),
    }
}

pub fn layout_text(
    tree: &mut RenderTree,
    id: NodeId,
    ctx: &LayoutContext,
    env: &LayoutEnvironment<'_>,
) -> Result<LayoutResult, LayoutError> {
    ensure_shaped(tree, id, env)?;
    let (line, font) = match text_state(tree, id) {
        Some(TextState {
            line: Some(line),
            font: Some(font),
            ..
        }) => (line.clone(), font.clone()),
        _ => {
            return Err(LayoutError::InvalidTree(format!(
                "node {} is not a shaped text node",
                id.index()
            )));
        }
    };

    let size = font_size(tree, id, env);
    let rise = tree.as_float(id, Property::TextRise).unwrap_or(0.0);
    let metrics = LineMetrics::for_font(&font.metrics(), size, rise);

    let mut style_allowance = 0.0;
    if tree.as_bool(id, Property::ItalicSimulation).unwrap_or(false) {
        style_allowance += ITALIC_ANGLE * size;
    }
    if tree.as_bool(id, Property::BoldSimulation).unwrap_or(false) {
        style_allowance += BOLD_SIMULATION_STROKE * size;
    }

    let (own, enabled) = own_hyphenator(tree, id);
    let hyphenator: Option<&dyn Hyphenator> = match &own {
        Some(h) => Some(h.as_ref()),
        None if enabled => env.hyphenator,
        None => None,
    };

    let overflow = tree
        .get::<Overflow>(id, Property::Overflow)
        .unwrap_or_default();
    let area = ctx.area.rect;
    let request = LineBreakRequest {
        line: &line,
        font_size: size,
        metrics,
        available_width: area.width,
        available_height: area.height,
        style_allowance,
        hyphenator,
        hyphen: font.glyph('-'),
        check_height: !ctx.force_placement && overflow == Overflow::Fit,
        line_has_content: ctx.line_has_content,
    };
    let result = break_line(&request);

    let occupied = LayoutArea::new(
        ctx.area.page_number,
        Rect::new(
            area.x,
            area.top() - result.height,
            result.width,
            result.height,
        ),
    );

    let store = |tree: &mut RenderTree, target: NodeId, line: GlyphLine| {
        if let Some(state) = text_state_mut(tree, target) {
            state.line = Some(line);
            state.font = Some(font.clone());
            state.font_size = size;
            state.metrics = metrics;
            state.word_spacing = 0.0;
        }
    };

    match result.status {
        BreakStatus::Nothing => Ok(LayoutResult::nothing(id, id)),
        BreakStatus::Full => {
            store(tree, id, result.line);
            tree.set_occupied(id, occupied);
            Ok(LayoutResult::full(occupied))
        }
        BreakStatus::Partial => {
            let split = tree.create_copy(id);
            store(tree, split, result.line);
            tree.set_occupied(split, occupied);

            let overflow = tree.create_copy(id);
            let rest_start = result.overflow_start.unwrap_or(line.end);
            store(tree, overflow, line.window(rest_start, line.end));

            let mut layout = LayoutResult::partial(occupied, split, overflow);
            layout.word_split = result.word_split;
            layout.forced_newline = result.forced_newline;
            Ok(layout)
        }
    }
}

/// Drops leading whitespace (but not newlines) from the window.
pub fn trim_first(tree: &mut RenderTree, id: NodeId) {
    if let Some(TextState {
        line: Some(line), ..
    }) = text_state_mut(tree, id)
    {
        while line.start < line.end {
            let glyph = line.get(line.start);
            if !glyph.is_whitespace() || glyph.is_newline() {
                break;
            }
            line.start += 1;
        }
    }
}

/// Drops trailing whitespace from the window and shrinks the occupied area
/// accordingly. Returns the width removed.
pub fn trim_last(tree: &mut RenderTree, id: NodeId) -> f32 {
    let mut trimmed = 0.0;
    if let Some(TextState {
        line: Some(line),
        font_size,
        ..
    }) = text_state_mut(tree, id)
    {
        while line.end > line.start {
            let last = line.end - 1;
            let glyph = line.get(last);
            if !glyph.is_whitespace() || glyph.is_newline() {
                break;
            }
            trimmed += line.glyph_advance(last, *font_size);
            line.end = last;
        }
    }
    if let Some(area) = tree.node_mut(id).occupied.as_mut() {
        area.rect.width -= trimmed;
    }
    trimmed
}

/// Widest newline-separated segment of the whole text.
pub fn max_content_width(
    tree: &mut RenderTree,
    id: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<f32, LayoutError> {
    ensure_shaped(tree, id, env)?;
    let size = font_size(tree, id, env);
    let Some(TextState {
        line: Some(line), ..
    }) = text_state(tree, id)
    else {
        return Ok(0.0);
    };

    let mut widest: f32 = 0.0;
    let mut segment_start = line.start;
    for index in line.start..=line.end {
        if index == line.end || line.get(index).is_newline() {
            widest = widest.max(line.width_between(segment_start, index, size));
            segment_start = index + 1;
        }
    }
    Ok(widest)
}
