//! Block flow: children stack top to bottom inside the content box.

use crate::LayoutError;
use crate::box_model::{apply_edges, apply_margins};
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutResult, LayoutStatus};
use crate::nodes::{constrained_height, layout, max_content_width};
use crate::properties::Property;
use crate::tree::{NodeId, RenderTree};
use folio_style::{Float, Overflow};
use folio_types::Rect;
use folio_types::geometry::EPSILON;

/// Clamps a content width into `MinWidth`/`MaxWidth`.
pub(crate) fn constrained_width(tree: &RenderTree, id: NodeId, width: f32, parent_width: f32) -> f32 {
    let mut width = width;
    if let Some(max) = tree.retrieve_width(id, Property::MaxWidth, parent_width) {
        width = width.min(max);
    }
    if let Some(min) = tree.retrieve_width(id, Property::MinWidth, parent_width) {
        width = width.max(min);
    }
    width
}

pub(crate) fn is_forced(tree: &RenderTree, id: NodeId, ctx: &LayoutContext) -> bool {
    ctx.force_placement
        || tree.as_bool(id, Property::ForcedPlacement).unwrap_or(false)
        || tree.get::<Overflow>(id, Property::Overflow).unwrap_or_default() != Overflow::Fit
}

/// Floats placed side by side in one horizontal band.
#[derive(Debug, Clone, Copy)]
struct FloatBand {
    top: f32,
    bottom: f32,
    left: f32,
    right: f32,
    floats: usize,
}

impl FloatBand {
    fn open(top: f32) -> Self {
        Self {
            top,
            bottom: top,
            left: 0.0,
            right: 0.0,
            floats: 0,
        }
    }
}

/// Vertical flow position of a container.
///
/// Floats do not move the cursor. They fill a band against the left and
/// right content edges, and the next in-flow child starts below the band.
/// In-flow content does not wrap beside floats.
#[derive(Debug, Clone)]
pub(crate) struct FlowCursor {
    y: f32,
    band: Option<FloatBand>,
}

impl FlowCursor {
    pub(crate) fn new(top: f32) -> Self {
        Self { y: top, band: None }
    }

    /// Area offered to `child` inside `content`.
    pub(crate) fn child_area(
        &mut self,
        tree: &mut RenderTree,
        child: NodeId,
        content: Rect,
        env: &LayoutEnvironment<'_>,
    ) -> Result<Rect, LayoutError> {
        if !tree.is_floating(child) {
            let y = self.clear();
            return Ok(Rect::new(content.x, content.bottom(), content.width, (y - content.bottom()).max(0.0)));
        }

        let width = max_content_width(tree, child, env)?.min(content.width);
        let mut band = self.band.unwrap_or_else(|| FloatBand::open(self.y));
        if band.floats > 0 && band.left + band.right + width > content.width + EPSILON {
            self.y = self.y.min(band.bottom);
            band = FloatBand::open(self.y);
        }
        let x = match tree.get::<Float>(child, Property::Float).unwrap_or_default() {
            Float::Right => content.right() - band.right - width,
            Float::Left | Float::None => content.x + band.left,
        };
        self.band = Some(band);
        Ok(Rect::new(x, content.bottom(), width, (band.top - content.bottom()).max(0.0)))
    }

    /// Records the area `child` occupied after laying out in `child_area`.
    pub(crate) fn advance(&mut self, tree: &RenderTree, child: NodeId, occupied: Rect) {
        match self.band.as_mut() {
            Some(band) if tree.is_floating(child) => {
                match tree.get::<Float>(child, Property::Float).unwrap_or_default() {
                    Float::Right => band.right += occupied.width,
                    Float::Left | Float::None => band.left += occupied.width,
                }
                band.bottom = band.bottom.min(occupied.bottom());
                band.floats += 1;
            }
            _ => self.y = self.y.min(occupied.bottom()),
        }
    }

    /// Closes the open float band and returns the cursor below it.
    pub(crate) fn clear(&mut self) -> f32 {
        if let Some(band) = self.band.take() {
            self.y = self.y.min(band.bottom);
        }
        self.y
    }
}

pub fn layout_block(
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

    let children = tree.children(id).to_vec();
    let mut flow = FlowCursor::new(content.top());
    let mut placed = Vec::with_capacity(children.len());
    let mut remaining = Vec::new();
    let mut cause = None;

    for (index, &child) in children.iter().enumerate() {
        let child_rect = flow.child_area(tree, child, content, env)?;
        let child_ctx = LayoutContext::new(LayoutArea::new(ctx.area.page_number, child_rect))
            .forced(forced && placed.is_empty());

        let result = layout(tree, child, &child_ctx, env)?;
        if let Some(occupied) = result.occupied {
            flow.advance(tree, child, occupied.rect);
        }
        match result.status {
            LayoutStatus::Full => placed.push(child),
            LayoutStatus::Partial => {
                placed.extend(result.split);
                remaining.extend(result.overflow);
                remaining.extend_from_slice(&children[index + 1..]);
                cause = result.cause.or(Some(child));
                break;
            }
            LayoutStatus::Nothing => {
                let failed = result.cause.unwrap_or(child);
                if placed.is_empty() {
                    return Ok(LayoutResult::nothing(id, failed));
                }
                remaining.extend_from_slice(&children[index..]);
                cause = Some(failed);
                break;
            }
        }
    }

    let used = content.top() - flow.clear();
    let mut content_height = constrained_height(tree, id, used, area.height);
    let frame = border_padding.vertical() + margins.vertical();
    if remaining.is_empty() && content_height + frame > area.height + EPSILON {
        if !forced {
            return Ok(LayoutResult::nothing(id, id));
        }
        log::warn!(
            "{} height {} does not fit the available {} at {:?}; clamping",
            tree.node(id).kind.name(),
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

    if remaining.is_empty() {
        tree.set_occupied(id, occupied);
        return Ok(LayoutResult::full(occupied));
    }

    let split = tree.create_copy(id);
    tree.set_children(split, placed);
    tree.set_occupied(split, occupied);
    let overflow = tree.create_copy(id);
    tree.set_children(overflow, remaining);

    let mut result = LayoutResult::partial(occupied, split, overflow);
    if let Some(cause) = cause {
        result = result.with_cause(cause);
    }
    Ok(result)
}
