//! Relative, absolute and fixed placement.
//!
//! Relative boxes stay where flow put them and are only shifted while they
//! paint. Absolute and fixed boxes are laid out after their holder has an
//! occupied area, then moved to satisfy their offsets against the holder's
//! padding box (or the page for fixed boxes held by the root).

use crate::LayoutError;
use crate::box_model::{apply_border_box, apply_margins};
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutStatus};
use crate::nodes::{self, max_content_width};
use crate::properties::{Property, PropertyValue};
use crate::tree::{NodeId, RenderTree};
use folio_style::{BaseDirection, BoxSizing, Dimension, Position};
use folio_types::Rect;

/// Resolved offsets; `None` means the offset is unset or `auto`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offsets {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

impl Offsets {
    pub fn resolve(tree: &RenderTree, id: NodeId, container: &Rect) -> Self {
        let offset = |key: Property, base: f32| tree.get::<Dimension>(id, key)?.resolve(base);
        Self {
            top: offset(Property::Top, container.height),
            right: offset(Property::Right, container.width),
            bottom: offset(Property::Bottom, container.height),
            left: offset(Property::Left, container.width),
        }
    }
}

/// Translation applied to a relatively positioned box while it paints.
///
/// `left` wins over `right` and `top` over `bottom`; y grows upward so a
/// top offset moves the box down.
pub fn relative_offset(tree: &RenderTree, id: NodeId) -> (f32, f32) {
    let base = tree
        .parent(id)
        .and_then(|parent| tree.occupied(parent))
        .map(|area| area.rect)
        .unwrap_or_default();
    let offsets = Offsets::resolve(tree, id, &base);
    let left = offsets.left.unwrap_or(0.0);
    let right = offsets.right.unwrap_or(0.0);
    let top = offsets.top.unwrap_or(0.0);
    let bottom = offsets.bottom.unwrap_or(0.0);
    let dx = if left != 0.0 { left } else { -right };
    let dy = if top != 0.0 { -top } else { bottom };
    (dx, dy)
}

/// Shifts a relatively positioned node by its offsets, or back when
/// `reverse` is set. Other positioning schemes are left alone.
pub fn apply_relative(tree: &mut RenderTree, id: NodeId, reverse: bool) {
    if tree.position(id) != Position::Relative {
        return;
    }
    let (dx, dy) = relative_offset(tree, id);
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    if reverse {
        tree.move_node(id, -dx, -dy);
    } else {
        tree.move_node(id, dx, dy);
    }
}

/// Lays out every positioned child held by `holder` against its padding box.
///
/// A holder without an occupied area cannot anchor anything; the children
/// are skipped and left unplaced.
pub fn layout_positioned(
    tree: &mut RenderTree,
    holder: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<(), LayoutError> {
    let Some(area) = tree.occupied(holder) else {
        log::error!(
            "Cannot position children of {} node {}: occupied area is not initialized",
            tree.node(holder).kind.name(),
            holder.index()
        );
        return Ok(());
    };
    let container = apply_border_box(
        apply_margins(area.rect, &tree.margins(holder), false),
        &tree.borders(holder),
        false,
    );
    let container = LayoutArea::new(area.page_number, container);
    for child in tree.positioned_children(holder).to_vec() {
        layout_absolute(tree, holder, child, container, env)?;
    }
    Ok(())
}

/// `MinHeight` implied by `top` and `bottom` when no height is declared.
fn derive_min_height(tree: &mut RenderTree, id: NodeId, container: &Rect, top: f32, bottom: f32) {
    let frame = tree.margins(id).vertical() + tree.border_padding(id).vertical();
    let mut min_height = container.height - top - bottom - frame;
    if let Some(current) = tree.retrieve_height(id, Property::MinHeight, container.height) {
        min_height = min_height.max(current);
    }
    if let Some(max) = tree.retrieve_height(id, Property::MaxHeight, container.height) {
        min_height = min_height.min(max);
    }
    let mut min_height = min_height.max(0.0);
    if tree.box_sizing(id) == BoxSizing::BorderBox {
        min_height += tree.border_padding(id).vertical();
    }
    log::debug!(
        "Derived min-height {} for node {} from top {} and bottom {}",
        min_height,
        id.index(),
        top,
        bottom
    );
    tree.set_own(
        id,
        Property::MinHeight,
        PropertyValue::Length(Dimension::Pt(min_height)),
    );
}

/// Lays out one absolute or fixed `child` of `holder` inside `container`
/// and moves it to its offsets.
pub fn layout_absolute(
    tree: &mut RenderTree,
    holder: NodeId,
    child: NodeId,
    container: LayoutArea,
    env: &LayoutEnvironment<'_>,
) -> Result<(), LayoutError> {
    let rect = container.rect;
    let mut offsets = Offsets::resolve(tree, child, &rect);
    if offsets.left.is_none() && offsets.right.is_none() {
        let direction = tree
            .get::<BaseDirection>(child, Property::BaseDirection)
            .unwrap_or_default();
        if direction.is_rtl() {
            offsets.right = Some(0.0);
        }
    }
    if offsets.top.is_none() && offsets.bottom.is_none() {
        offsets.top = Some(0.0);
    }

    if let (Some(top), Some(bottom)) = (offsets.top, offsets.bottom)
        && !tree.has_property(child, Property::Height)
    {
        derive_min_height(tree, child, &rect, top, bottom);
    }

    let width = match (offsets.left, offsets.right) {
        (Some(left), Some(right)) => (rect.width - left - right).max(0.0),
        _ if !tree.has_property(child, Property::Width) => {
            max_content_width(tree, child, env)?.min(rect.width)
        }
        _ => rect.width,
    };

    let ctx = LayoutContext::new(LayoutArea::new(
        container.page_number,
        Rect::new(rect.x, rect.bottom(), width, rect.height),
    ))
    .forced(true);
    let result = nodes::layout(tree, child, &ctx, env)?;

    let placed = match (result.status, result.split) {
        (LayoutStatus::Partial, Some(split)) => {
            log::warn!(
                "Positioned {} node {} does not fit {:?}; the remainder is dropped",
                tree.node(child).kind.name(),
                child.index(),
                rect
            );
            for slot in tree.node_mut(holder).positioned.iter_mut() {
                if *slot == child {
                    *slot = split;
                }
            }
            tree.node_mut(split).parent = Some(holder);
            split
        }
        (LayoutStatus::Nothing, _) => {
            log::warn!(
                "Positioned {} node {} could not be placed in {:?}",
                tree.node(child).kind.name(),
                child.index(),
                rect
            );
            return Ok(());
        }
        _ => child,
    };

    let Some(occupied) = tree.occupied(placed) else {
        log::error!(
            "Positioned node {} has no occupied area after layout",
            placed.index()
        );
        return Ok(());
    };
    let occupied = occupied.rect;

    let x = match (offsets.left, offsets.right) {
        (Some(left), _) => rect.x + left,
        (None, Some(right)) => rect.right() - right - occupied.width,
        (None, None) => occupied.x,
    };
    let top = match (offsets.top, offsets.bottom) {
        (Some(top), _) => rect.top() - top,
        (None, Some(bottom)) => rect.bottom() + bottom + occupied.height,
        (None, None) => occupied.top(),
    };
    tree.move_node(placed, x - occupied.x, top - occupied.top());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::model::{ModelElement, SharedElement};

    fn pt(value: f32) -> PropertyValue {
        PropertyValue::Length(Dimension::Pt(value))
    }

    fn absolute() -> ModelElement {
        ModelElement::div().with(Property::Position, PropertyValue::Position(Position::Absolute))
    }

    /// A holder occupying `(0, 0, 300, 200)` with `child` attached.
    fn holder_with(holder: ModelElement, child: SharedElement) -> (RenderTree, NodeId, NodeId) {
        let mut tree = RenderTree::new();
        let holder = tree.create_renderer(&holder.shared());
        tree.set_occupied(holder, LayoutArea::new(1, Rect::new(0.0, 0.0, 300.0, 200.0)));
        let child = tree.create_renderer(&child);
        tree.add_child(holder, child);
        (tree, holder, child)
    }

    #[test]
    fn test_relative_offset_prefers_left_and_top() {
        let mut tree = RenderTree::new();
        let id = tree.create_renderer(
            &ModelElement::div()
                .with(Property::Left, pt(10.0))
                .with(Property::Right, pt(99.0))
                .with(Property::Top, pt(5.0))
                .shared(),
        );
        assert_eq!(relative_offset(&tree, id), (10.0, -5.0));

        let other = tree.create_renderer(
            &ModelElement::div()
                .with(Property::Right, pt(4.0))
                .with(Property::Bottom, pt(3.0))
                .shared(),
        );
        assert_eq!(relative_offset(&tree, other), (-4.0, 3.0));
    }

    #[test]
    fn test_relative_translation_is_reversible() {
        let mut tree = RenderTree::new();
        let id = tree.create_renderer(
            &ModelElement::div()
                .with(Property::Position, PropertyValue::Position(Position::Relative))
                .with(Property::Left, pt(10.0))
                .with(Property::Top, pt(20.0))
                .shared(),
        );
        let rect = Rect::new(50.0, 50.0, 10.0, 10.0);
        tree.set_occupied(id, LayoutArea::new(1, rect));

        apply_relative(&mut tree, id, false);
        assert!(tree.occupied(id).unwrap().rect.approx_eq(&Rect::new(60.0, 30.0, 10.0, 10.0)));
        apply_relative(&mut tree, id, true);
        assert!(tree.occupied(id).unwrap().rect.approx_eq(&rect));
    }

    #[test]
    fn test_top_and_bottom_derive_min_height() {
        let child = absolute()
            .with(Property::Top, pt(10.0))
            .with(Property::Bottom, pt(10.0))
            .with(Property::PaddingTop, pt(5.0))
            .with(Property::PaddingBottom, pt(5.0))
            .shared();
        let (mut tree, holder, child) = holder_with(ModelElement::div(), child);
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);

        layout_positioned(&mut tree, holder, &env).unwrap();

        assert_eq!(tree.as_float(child, Property::MinHeight), Some(170.0));
        let rect = tree.occupied(child).unwrap().rect;
        assert!((rect.height - 180.0).abs() < 1e-4);
        assert!((rect.top() - 190.0).abs() < 1e-4);
        assert!((rect.bottom() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_left_and_right_stretch_the_width() {
        let child = absolute()
            .with(Property::Left, pt(20.0))
            .with(Property::Right, pt(30.0))
            .with(Property::Height, pt(40.0))
            .shared();
        let (mut tree, holder, child) = holder_with(ModelElement::div(), child);
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);

        layout_positioned(&mut tree, holder, &env).unwrap();

        let rect = tree.occupied(child).unwrap().rect;
        assert!(rect.approx_eq(&Rect::new(20.0, 160.0, 250.0, 40.0)));
    }

    #[test]
    fn test_unconstrained_box_shrinks_to_content() {
        let child = absolute().with(Property::Bottom, pt(0.0)).shared();
        let (mut tree, holder, child) = holder_with(ModelElement::div(), child);
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let inner = tree.create_renderer(&ModelElement::div().with(Property::Width, pt(40.0)).shared());
        tree.add_child(child, inner);

        layout_positioned(&mut tree, holder, &env).unwrap();

        let rect = tree.occupied(child).unwrap().rect;
        assert!((rect.width - 40.0).abs() < 1e-4);
        assert!((rect.bottom() - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_rtl_box_without_offsets_anchors_right() {
        let child = absolute().with(Property::Width, pt(50.0)).with(Property::Height, pt(10.0)).shared();
        let holder = ModelElement::div().with(
            Property::BaseDirection,
            PropertyValue::Direction(BaseDirection::RightToLeft),
        );
        let (mut tree, holder, child) = holder_with(holder, child);
        assert_eq!(tree.positioned_children(holder), &[child]);
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);

        layout_positioned(&mut tree, holder, &env).unwrap();

        let rect = tree.occupied(child).unwrap().rect;
        assert!(rect.approx_eq(&Rect::new(250.0, 190.0, 50.0, 10.0)));
    }

    #[test]
    fn test_uninitialized_holder_is_skipped() {
        let child = absolute().with(Property::Top, pt(1.0)).shared();
        let mut tree = RenderTree::new();
        let holder = tree.create_renderer(&ModelElement::div().shared());
        let child = tree.create_renderer(&child);
        tree.add_child(holder, child);
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);

        assert!(layout_positioned(&mut tree, holder, &env).is_ok());
        assert!(tree.occupied(child).is_none());
    }
}
