//! Paragraph renderer: assembles inline children into line boxes.
//!
//! Each line is filled left to right by laying out inline children into the
//! remaining width. A child that only partly fits contributes its split to
//! the line and leaves its overflow at the head of the queue for the next
//! line. Completed lines are trimmed, reordered for right-to-left runs,
//! aligned, and stacked downward with the configured line height.

use crate::LayoutError;
use crate::box_model::{apply_edges, apply_margins};
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutResult, LayoutStatus};
use crate::nodes::block::{constrained_width, is_forced};
use crate::nodes::text::{self, TextState, text_state};
use crate::nodes::{constrained_height, layout};
use crate::properties::Property;
use crate::text::{LineMetrics, visual_runs};
use crate::tree::{NodeId, NodeKind, RenderTree};
use folio_style::{BaseDirection, TextAlign};
use folio_types::Rect;
use folio_types::geometry::EPSILON;
use std::collections::VecDeque;

/// One laid-out line of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBox {
    /// Fragments in visual order, left to right.
    pub fragments: Vec<NodeId>,
    pub rect: Rect,
    pub baseline: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphState {
    pub lines: Vec<LineBox>,
}

pub fn paragraph_state(tree: &RenderTree, id: NodeId) -> Option<&ParagraphState> {
    match &tree.node(id).kind {
        NodeKind::Paragraph(state) => Some(state),
        _ => None,
    }
}

fn set_lines(tree: &mut RenderTree, id: NodeId, lines: Vec<LineBox>) {
    tree.node_mut(id).kind = NodeKind::Paragraph(ParagraphState { lines });
}

/// Line content before trimming and alignment.
#[derive(Debug, Default)]
struct PendingLine {
    fragments: Vec<NodeId>,
    metrics: Option<LineMetrics>,
    width: f32,
    forced_newline: bool,
}

impl PendingLine {
    fn push(&mut self, tree: &RenderTree, fragment: NodeId) {
        let fragment_metrics = fragment_metrics(tree, fragment);
        self.metrics = Some(match self.metrics {
            Some(current) => current.merge(&fragment_metrics),
            None => fragment_metrics,
        });
        self.width += tree.occupied(fragment).map(|a| a.rect.width).unwrap_or(0.0);
        self.fragments.push(fragment);
    }
}

fn fragment_metrics(tree: &RenderTree, id: NodeId) -> LineMetrics {
    match text_state(tree, id) {
        Some(state) => state.metrics,
        None => LineMetrics {
            ascent: tree.occupied(id).map(|a| a.rect.height).unwrap_or(0.0),
            descent: 0.0,
        },
    }
}

fn is_empty_text(tree: &RenderTree, id: NodeId) -> bool {
    text_state(tree, id).is_some_and(|s| s.line.as_ref().is_none_or(|l| l.is_empty()))
}

/// A copy of `id` that can be trimmed without touching the node the
/// paragraph keeps for re-layout.
fn fork_fragment(tree: &mut RenderTree, id: NodeId) -> NodeId {
    let copy = tree.create_copy(id);
    if let Some(area) = tree.occupied(id) {
        tree.set_occupied(copy, area);
    }
    copy
}

enum LineFill {
    Filled(PendingLine),
    /// Not even the first fragment fit; carries the node that failed.
    DoesNotFit(NodeId),
}

fn fill_line(
    tree: &mut RenderTree,
    pending: &mut VecDeque<NodeId>,
    area: LayoutArea,
    forced: bool,
    env: &LayoutEnvironment<'_>,
) -> Result<LineFill, LayoutError> {
    let mut line = PendingLine::default();
    let right = area.rect.right();
    let mut x = area.rect.x;

    while let Some(&front) = pending.front() {
        let mut child = front;
        if line.fragments.is_empty() && matches!(tree.node(child).kind, NodeKind::Text(_)) {
            text::ensure_shaped(tree, child, env)?;
            child = fork_fragment(tree, child);
            text::trim_first(tree, child);
            pending[0] = child;
            if is_empty_text(tree, child) {
                pending.pop_front();
                continue;
            }
        }

        let ctx = LayoutContext::new(LayoutArea::new(
            area.page_number,
            Rect::new(x, area.rect.y, (right - x).max(0.0), area.rect.height),
        ))
        .forced(forced && line.fragments.is_empty())
        .with_line_content(!line.fragments.is_empty());

        let result = layout(tree, child, &ctx, env)?;
        match result.status {
            LayoutStatus::Full => {
                pending.pop_front();
                line.push(tree, child);
                x += result.occupied.map(|a| a.rect.width).unwrap_or(0.0);
            }
            LayoutStatus::Partial => {
                pending.pop_front();
                if let Some(overflow) = result.overflow {
                    pending.push_front(overflow);
                }
                if let Some(split) = result.split
                    && (result.forced_newline || !is_empty_text(tree, split))
                {
                    line.push(tree, split);
                }
                line.forced_newline = result.forced_newline;
                break;
            }
            LayoutStatus::Nothing => {
                if line.fragments.is_empty() {
                    return Ok(LineFill::DoesNotFit(result.cause.unwrap_or(child)));
                }
                break;
            }
        }
    }
    Ok(LineFill::Filled(line))
}

/// Splits text fragments along directional runs and returns the line's
/// fragments in visual order.
fn reorder_line(tree: &mut RenderTree, fragments: Vec<NodeId>, direction: BaseDirection) -> Vec<NodeId> {
    let mut logical = String::new();
    let mut spans = Vec::with_capacity(fragments.len());
    for &fragment in &fragments {
        let start = logical.chars().count();
        match text_state(tree, fragment).and_then(|s| s.line.as_ref()) {
            Some(line) => logical.extend(
                line.as_slice()
                    .iter()
                    .map(|g| g.unicode.unwrap_or('\u{FFFC}')),
            ),
            None => logical.push('\u{FFFC}'),
        }
        spans.push((fragment, start, logical.chars().count() - start));
    }

    let runs = visual_runs(&logical, direction);
    if runs.iter().all(|run| !run.rtl) {
        return fragments;
    }

    let mut visual = Vec::with_capacity(fragments.len());
    for run in runs {
        let mut pieces = Vec::new();
        for &(fragment, start, len) in &spans {
            let from = run.range.start.max(start);
            let to = run.range.end.min(start + len);
            if from >= to {
                continue;
            }
            let Some(TextState {
                line: Some(line),
                font_size,
                ..
            }) = text_state(tree, fragment).cloned()
            else {
                pieces.push(fragment);
                continue;
            };
            if !run.rtl && from == start && to == start + len {
                pieces.push(fragment);
                continue;
            }

            let mut window = line.window(line.start + from - start, line.start + to - start);
            if run.rtl {
                window = window.reversed();
            }
            let width = window.width(font_size);
            let piece = fork_fragment(tree, fragment);
            if let NodeKind::Text(state) = &mut tree.node_mut(piece).kind {
                state.line = Some(window);
            }
            if let Some(area) = tree.node_mut(piece).occupied.as_mut() {
                area.rect.width = width;
            }
            pieces.push(piece);
        }
        if run.rtl {
            pieces.reverse();
        }
        visual.extend(pieces);
    }
    visual
}

struct LineLayout {
    left: f32,
    width: f32,
    align: TextAlign,
    direction: BaseDirection,
    line_height: f32,
}

/// Trims, reorders, aligns and places a filled line whose top edge is `top`.
fn finish_line(
    tree: &mut RenderTree,
    mut line: PendingLine,
    top: f32,
    available_height: f32,
    is_last: bool,
    settings: &LineLayout,
) -> LineBox {
    let metrics = line.metrics.unwrap_or_default();
    let natural = metrics.height();
    let advance = (natural * settings.line_height)
        .min(available_height)
        .max(natural);
    let baseline = top - (advance - natural) / 2.0 - metrics.ascent;

    if let Some(&last) = line.fragments.last()
        && matches!(tree.node(last).kind, NodeKind::Text(_))
    {
        let last = fork_fragment(tree, last);
        line.width -= text::trim_last(tree, last);
        if let Some(slot) = line.fragments.last_mut() {
            *slot = last;
        }
    }

    let fragments = reorder_line(tree, line.fragments, settings.direction);

    let free = (settings.width - line.width).max(0.0);
    let justify =
        settings.align == TextAlign::Justify && !is_last && !line.forced_newline;
    let mut word_spacing = 0.0;
    let mut x = settings.left
        + match settings.align {
            TextAlign::Right => free,
            TextAlign::Center => free / 2.0,
            TextAlign::Left | TextAlign::Justify => 0.0,
        };
    if justify {
        let spaces: usize = fragments
            .iter()
            .filter_map(|f| text_state(tree, *f).and_then(|s| s.line.as_ref()))
            .map(|l| l.count_spaces())
            .sum();
        if spaces > 0 {
            word_spacing = free / spaces as f32;
        }
    }

    for &fragment in &fragments {
        let Some(area) = tree.occupied(fragment) else {
            continue;
        };
        let fragment_baseline = area.rect.top() - fragment_metrics(tree, fragment).ascent;
        tree.move_node(fragment, x - area.rect.x, baseline - fragment_baseline);

        let mut width = area.rect.width;
        if word_spacing > 0.0
            && let NodeKind::Text(state) = &mut tree.node_mut(fragment).kind
        {
            let spaces = state.line.as_ref().map(|l| l.count_spaces()).unwrap_or(0);
            state.word_spacing = word_spacing;
            width += spaces as f32 * word_spacing;
            if let Some(area) = tree.node_mut(fragment).occupied.as_mut() {
                area.rect.width = width;
            }
        }
        x += width;
    }

    LineBox {
        fragments,
        rect: Rect::new(settings.left, top - advance, settings.width, advance),
        baseline,
    }
}

pub fn layout_paragraph(
    tree: &mut RenderTree,
    id: NodeId,
    ctx: &LayoutContext,
    env: &LayoutEnvironment<'_>,
) -> Result<LayoutResult, LayoutError> {
    let forced = is_forced(tree, id, ctx);

    let area = ctx.area.rect;
    let margins = tree.margins(id);
    let border_padding = tree.border_padding(id);
    let mut content = apply_edges(apply_margins(area, &margins, false), &border_padding, false);
    let width = tree
        .retrieve_width(id, Property::Width, area.width)
        .unwrap_or(content.width);
    content.width = constrained_width(tree, id, width, area.width);

    let direction = tree
        .get::<BaseDirection>(id, Property::BaseDirection)
        .unwrap_or_default();
    let settings = LineLayout {
        left: content.x,
        width: content.width,
        align: tree
            .get::<TextAlign>(id, Property::TextAlign)
            .unwrap_or(if direction.is_rtl() {
                TextAlign::Right
            } else {
                TextAlign::Left
            }),
        direction,
        line_height: tree.as_float(id, Property::LineHeight).unwrap_or(1.0),
    };

    let mut pending: VecDeque<NodeId> = tree.children(id).iter().copied().collect();
    let mut lines = Vec::new();
    let mut cursor = content.top();
    let mut cause = None;

    while !pending.is_empty() {
        let available = (cursor - content.bottom()).max(0.0);
        let line_area = LayoutArea::new(
            ctx.area.page_number,
            Rect::new(content.x, content.bottom(), content.width, available),
        );
        match fill_line(tree, &mut pending, line_area, forced && lines.is_empty(), env)? {
            LineFill::DoesNotFit(failed) => {
                cause = Some(failed);
                break;
            }
            LineFill::Filled(line) => {
                if line.fragments.is_empty() {
                    continue;
                }
                let is_last = pending.is_empty();
                let line_box = finish_line(tree, line, cursor, available, is_last, &settings);
                cursor = line_box.rect.bottom();
                lines.push(line_box);
            }
        }
    }

    if lines.is_empty() && !pending.is_empty() {
        return Ok(LayoutResult::nothing(id, cause.unwrap_or(id)));
    }

    let used = content.top() - cursor;
    let mut content_height = constrained_height(tree, id, used, area.height);
    let frame = border_padding.vertical() + margins.vertical();
    if pending.is_empty() && content_height + frame > area.height + EPSILON {
        if !forced {
            return Ok(LayoutResult::nothing(id, id));
        }
        log::warn!(
            "Paragraph height {} exceeds the available {} at {:?}; clipping",
            content_height + frame,
            area.height,
            area
        );
        content_height = (area.height - frame).max(0.0);
    }

    let total = content_height + frame;
    let occupied = LayoutArea::new(
        ctx.area.page_number,
        Rect::new(
            area.x,
            area.top() - total,
            content.width + border_padding.horizontal() + margins.horizontal(),
            total,
        ),
    );

    if pending.is_empty() {
        set_lines(tree, id, lines);
        tree.set_occupied(id, occupied);
        return Ok(LayoutResult::full(occupied));
    }

    let split = tree.create_copy(id);
    let placed: Vec<NodeId> = lines
        .iter()
        .flat_map(|line| line.fragments.iter().copied())
        .collect();
    tree.set_children(split, placed);
    set_lines(tree, split, lines);
    tree.set_occupied(split, occupied);

    let overflow = tree.create_copy(id);
    tree.set_children(overflow, pending.into_iter().collect());
    set_lines(tree, overflow, Vec::new());

    let mut result = LayoutResult::partial(occupied, split, overflow);
    if let Some(cause) = cause {
        result = result.with_cause(cause);
    }
    Ok(result)
}

/// Inline children laid end to end on one line.
pub fn max_content_width(
    tree: &mut RenderTree,
    id: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<f32, LayoutError> {
    let mut width = 0.0;
    for child in tree.children(id).to_vec() {
        width += crate::nodes::max_content_width(tree, child, env)?;
    }
    Ok(width)
}
