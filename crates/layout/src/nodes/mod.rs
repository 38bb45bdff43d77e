//! Per-variant layout, dispatched on [`NodeKind`].

pub mod block;
pub mod image;
pub mod paragraph;
pub mod table;
pub mod text;

use crate::LayoutError;
use crate::interface::{LayoutContext, LayoutEnvironment, LayoutResult, LayoutStatus};
use crate::positioning;
use crate::properties::Property;
use crate::tree::{NodeId, NodeKind, RenderTree};

/// Lays out `id` into `ctx.area`, then places the positioned children of
/// whichever node ends up holding the placed content.
pub fn layout(
    tree: &mut RenderTree,
    id: NodeId,
    ctx: &LayoutContext,
    env: &LayoutEnvironment<'_>,
) -> Result<LayoutResult, LayoutError> {
    let result = match tree.node(id).kind {
        NodeKind::Document | NodeKind::Block => block::layout_block(tree, id, ctx, env)?,
        NodeKind::Paragraph(_) => paragraph::layout_paragraph(tree, id, ctx, env)?,
        NodeKind::Text(_) => text::layout_text(tree, id, ctx, env)?,
        NodeKind::Image => image::layout_image(tree, id, ctx, env)?,
        NodeKind::Table => table::layout_table(tree, id, ctx, env)?,
    };

    let holder = match result.status {
        LayoutStatus::Full => Some(id),
        LayoutStatus::Partial => result.split,
        LayoutStatus::Nothing => None,
    };
    if let Some(holder) = holder
        && !tree.positioned_children(id).is_empty()
    {
        if holder != id {
            let positioned = std::mem::take(&mut tree.node_mut(id).positioned);
            for child in &positioned {
                tree.node_mut(*child).parent = Some(holder);
            }
            tree.node_mut(holder).positioned = positioned;
        }
        positioning::layout_positioned(tree, holder, env)?;
    }
    Ok(result)
}

/// Widest the node would be with unlimited width, margins included.
pub fn max_content_width(
    tree: &mut RenderTree,
    id: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<f32, LayoutError> {
    let frame = tree.margins(id).horizontal() + tree.border_padding(id).horizontal();
    if let Some(width) = tree.retrieve_width(id, Property::Width, 0.0) {
        return Ok(width + frame);
    }

    let content = match tree.node(id).kind {
        NodeKind::Text(_) => return text::max_content_width(tree, id, env),
        NodeKind::Paragraph(_) => paragraph::max_content_width(tree, id, env)?,
        NodeKind::Image => image::intrinsic_size(tree, id).0,
        NodeKind::Table => table::max_content_width(tree, id, env)?,
        NodeKind::Document | NodeKind::Block => {
            let mut widest: f32 = 0.0;
            for child in tree.children(id).to_vec() {
                widest = widest.max(max_content_width(tree, child, env)?);
            }
            widest
        }
    };
    Ok(content + frame)
}

/// Applies `Height`, `MinHeight` and `MaxHeight` to a content height.
pub(crate) fn constrained_height(
    tree: &RenderTree,
    id: NodeId,
    content_height: f32,
    parent_height: f32,
) -> f32 {
    if let Some(height) = tree.retrieve_height(id, Property::Height, parent_height) {
        return height;
    }
    let mut height = content_height;
    if let Some(max) = tree.retrieve_height(id, Property::MaxHeight, parent_height) {
        height = height.min(max);
    }
    if let Some(min) = tree.retrieve_height(id, Property::MinHeight, parent_height) {
        height = height.max(min);
    }
    height
}
