use crate::LayoutError;
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutResult};
use crate::model::{ElementKind, ImageSource};
use crate::nodes::block::is_forced;
use crate::properties::Property;
use crate::tree::{NodeId, RenderTree};
use folio_types::Rect;
use folio_types::geometry::EPSILON;

pub fn image_source(tree: &RenderTree, id: NodeId) -> Option<ImageSource> {
    let model = tree.node(id).model.as_ref()?;
    match &model.borrow().kind {
        ElementKind::Image(source) => Some(source.clone()),
        _ => None,
    }
}

/// Intrinsic width and height in points; zero when the node has no image.
pub fn intrinsic_size(tree: &RenderTree, id: NodeId) -> (f32, f32) {
    image_source(tree, id)
        .map(|s| (s.width, s.height))
        .unwrap_or((0.0, 0.0))
}

/// Declared size, completing a missing dimension from the intrinsic aspect
/// ratio.
fn declared_size(tree: &RenderTree, id: NodeId, area: &Rect) -> (f32, f32) {
    let (intrinsic_width, intrinsic_height) = intrinsic_size(tree, id);
    let width = tree.retrieve_width(id, Property::Width, area.width);
    let height = tree.retrieve_height(id, Property::Height, area.height);
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) if intrinsic_width > 0.0 => (w, intrinsic_height * w / intrinsic_width),
        (None, Some(h)) if intrinsic_height > 0.0 => (intrinsic_width * h / intrinsic_height, h),
        (Some(w), None) => (w, intrinsic_height),
        (None, Some(h)) => (intrinsic_width, h),
        (None, None) => (intrinsic_width, intrinsic_height),
    }
}

pub fn layout_image(
    tree: &mut RenderTree,
    id: NodeId,
    ctx: &LayoutContext,
    _env: &LayoutEnvironment<'_>,
) -> Result<LayoutResult, LayoutError> {
    let area = ctx.area.rect;
    let margins = tree.margins(id);
    let border_padding = tree.border_padding(id);
    let frame_width = margins.horizontal() + border_padding.horizontal();
    let frame_height = margins.vertical() + border_padding.vertical();

    let (mut width, mut height) = declared_size(tree, id, &area);
    let max_width = (area.width - frame_width).max(0.0);
    if width > max_width && width > 0.0 {
        let scale = max_width / width;
        width *= scale;
        height *= scale;
    }

    let mut total = height + frame_height;
    if total > area.height + EPSILON {
        if !is_forced(tree, id, ctx) {
            return Ok(LayoutResult::nothing(id, id));
        }
        log::warn!(
            "Image of height {} does not fit the available {} at {:?}; clamping",
            total,
            area.height,
            area
        );
        total = area.height.max(0.0);
    }

    let occupied = LayoutArea::new(
        ctx.area.page_number,
        Rect::new(area.x, area.top() - total, width + frame_width, total),
    );
    tree.set_occupied(id, occupied);
    Ok(LayoutResult::full(occupied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::interface::LayoutStatus;
    use crate::model::ModelElement;
    use crate::properties::PropertyValue;
    use folio_style::Dimension;

    fn layout_in(model: ModelElement, width: f32, height: f32) -> (RenderTree, NodeId, LayoutResult) {
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let mut tree = RenderTree::new();
        let id = tree.create_renderer(&model.shared());
        let ctx = LayoutContext::new(LayoutArea::new(1, Rect::new(0.0, 0.0, width, height)));
        let result = layout_image(&mut tree, id, &ctx, &env).unwrap();
        (tree, id, result)
    }

    #[test]
    fn test_wide_image_scales_down_proportionally() {
        let (_, _, result) = layout_in(ModelElement::image("logo.png", 400.0, 100.0), 200.0, 500.0);
        let rect = result.occupied.unwrap().rect;
        assert!((rect.width - 200.0).abs() < 1e-4);
        assert!((rect.height - 50.0).abs() < 1e-4);
        assert!((rect.top() - 500.0).abs() < 1e-4);
    }

    #[test]
    fn test_declared_width_keeps_aspect_ratio() {
        let model = ModelElement::image("logo.png", 100.0, 40.0)
            .with(Property::Width, PropertyValue::Length(Dimension::Pt(50.0)));
        let (_, _, result) = layout_in(model, 300.0, 300.0);
        assert!((result.occupied.unwrap().rect.height - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_tall_image_does_not_fit() {
        let (tree, id, result) = layout_in(ModelElement::image("tall.png", 50.0, 400.0), 200.0, 100.0);
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert_eq!(result.overflow, Some(id));
        assert!(tree.occupied(id).is_none());
    }

    #[test]
    fn test_forced_image_is_clamped() {
        let model = ModelElement::image("tall.png", 50.0, 400.0)
            .with(Property::ForcedPlacement, PropertyValue::Bool(true));
        let (_, _, result) = layout_in(model, 200.0, 100.0);
        assert!(result.is_full());
        assert!((result.occupied.unwrap().rect.height - 100.0).abs() < 1e-4);
    }
}
