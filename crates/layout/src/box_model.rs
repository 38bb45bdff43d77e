//! Margin, border and padding arithmetic on occupied rectangles.
//!
//! Every transform takes four independent edge widths. `reverse = false`
//! shrinks the rectangle (from the margin box towards the content box),
//! `reverse = true` grows it back.

use crate::properties::Property;
use crate::tree::{NodeId, RenderTree};
use folio_style::{Border, BoxSizing, Dimension, Edges};
use folio_types::Rect;

pub fn apply_edges(rect: Rect, edges: &Edges, reverse: bool) -> Rect {
    rect.apply_edges(edges.top, edges.right, edges.bottom, edges.left, reverse)
}

pub fn apply_margins(rect: Rect, margins: &Edges, reverse: bool) -> Rect {
    apply_edges(rect, margins, reverse)
}

pub fn apply_paddings(rect: Rect, paddings: &Edges, reverse: bool) -> Rect {
    apply_edges(rect, paddings, reverse)
}

/// Unset edges contribute zero width.
pub fn apply_border_box(rect: Rect, borders: &[Option<Border>; 4], reverse: bool) -> Rect {
    apply_edges(rect, &border_widths(borders), reverse)
}

pub fn border_widths(borders: &[Option<Border>; 4]) -> Edges {
    let width = |b: &Option<Border>| b.as_ref().map(Border::effective_width).unwrap_or(0.0);
    Edges::new(
        width(&borders[0]),
        width(&borders[1]),
        width(&borders[2]),
        width(&borders[3]),
    )
}

const MARGIN_KEYS: [Property; 4] = [
    Property::MarginTop,
    Property::MarginRight,
    Property::MarginBottom,
    Property::MarginLeft,
];

const PADDING_KEYS: [Property; 4] = [
    Property::PaddingTop,
    Property::PaddingRight,
    Property::PaddingBottom,
    Property::PaddingLeft,
];

const BORDER_KEYS: [Property; 4] = [
    Property::BorderTop,
    Property::BorderRight,
    Property::BorderBottom,
    Property::BorderLeft,
];

fn resolve_edges(tree: &RenderTree, id: NodeId, keys: [Property; 4]) -> Edges {
    let value = |key: Property| match tree.get::<Dimension>(id, key) {
        Some(Dimension::Pt(v)) => v,
        Some(Dimension::Percent(_)) => {
            log::warn!("Percentage {:?} is not supported here, using 0", key);
            0.0
        }
        _ => 0.0,
    };
    Edges::new(value(keys[0]), value(keys[1]), value(keys[2]), value(keys[3]))
}

impl RenderTree {
    pub fn margins(&self, id: NodeId) -> Edges {
        resolve_edges(self, id, MARGIN_KEYS)
    }

    pub fn paddings(&self, id: NodeId) -> Edges {
        resolve_edges(self, id, PADDING_KEYS)
    }

    /// Per-edge borders in top, right, bottom, left order.
    ///
    /// An edge's own property wins, including an explicit `None`; the
    /// uniform `Border` property only fills edges that declare nothing.
    pub fn borders(&self, id: NodeId) -> [Option<Border>; 4] {
        let fallback = self.get::<Option<Border>>(id, Property::Border).flatten();
        BORDER_KEYS.map(|key| {
            let edge = match self.get::<Option<Border>>(id, key) {
                Some(edge) => edge,
                None => fallback,
            };
            edge.filter(|b| b.effective_width() > 0.0)
        })
    }

    pub fn box_sizing(&self, id: NodeId) -> BoxSizing {
        self.get(id, Property::BoxSizing).unwrap_or_default()
    }

    /// Combined horizontal and vertical border plus padding.
    pub fn border_padding(&self, id: NodeId) -> Edges {
        let b = border_widths(&self.borders(id));
        let p = self.paddings(id);
        Edges::new(b.top + p.top, b.right + p.right, b.bottom + p.bottom, b.left + p.left)
    }

    /// Declared width converted to a content-box width.
    pub fn retrieve_width(&self, id: NodeId, key: Property, parent_width: f32) -> Option<f32> {
        let value = self.get::<Dimension>(id, key)?.resolve(parent_width)?;
        Some(self.to_content_box(id, value, true))
    }

    /// Declared height converted to a content-box height.
    pub fn retrieve_height(&self, id: NodeId, key: Property, parent_height: f32) -> Option<f32> {
        let value = self.get::<Dimension>(id, key)?.resolve(parent_height)?;
        Some(self.to_content_box(id, value, false))
    }

    fn to_content_box(&self, id: NodeId, value: f32, horizontal: bool) -> f32 {
        match self.box_sizing(id) {
            BoxSizing::ContentBox => value,
            BoxSizing::BorderBox => {
                let bp = self.border_padding(id);
                let extra = if horizontal { bp.horizontal() } else { bp.vertical() };
                (value - extra).max(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelElement;
    use crate::properties::PropertyValue;
    use folio_types::Color;

    #[test]
    fn test_margins_round_trip() {
        let rect = Rect::new(10.0, 20.0, 300.0, 400.0);
        for margins in [
            Edges::all(0.0),
            Edges::new(1.0, 2.0, 3.0, 4.0),
            Edges::new(50.0, 0.0, 12.5, 100.0),
        ] {
            let inset = apply_margins(rect, &margins, false);
            let restored = apply_margins(inset, &margins, true);
            assert!(restored.approx_eq(&rect), "{margins:?}");
        }
    }

    #[test]
    fn test_inset_uses_all_four_edges() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inset = apply_paddings(rect, &Edges::new(1.0, 2.0, 3.0, 4.0), false);
        assert!(inset.approx_eq(&Rect::new(4.0, 3.0, 94.0, 96.0)));
    }

    #[test]
    fn test_unset_border_edge_does_not_block_others() {
        let borders = [None, Some(Border::solid(2.0, Color::BLACK)), None, None];
        let rect = apply_border_box(Rect::new(0.0, 0.0, 50.0, 50.0), &borders, false);
        assert!(rect.approx_eq(&Rect::new(0.0, 0.0, 48.0, 50.0)));
    }

    #[test]
    fn test_edge_border_overrides_uniform_border() {
        let model = ModelElement::div()
            .with(
                Property::Border,
                PropertyValue::Border(Some(Border::solid(1.0, Color::BLACK))),
            )
            .with(Property::BorderLeft, PropertyValue::Border(None))
            .with(
                Property::BorderTop,
                PropertyValue::Border(Some(Border::solid(4.0, Color::WHITE))),
            )
            .shared();
        let mut tree = RenderTree::new();
        let id = tree.create_renderer(&model);
        let borders = tree.borders(id);

        assert_eq!(borders[0].map(|b| b.width), Some(4.0));
        assert_eq!(borders[1].map(|b| b.width), Some(1.0));
        assert_eq!(borders[2].map(|b| b.width), Some(1.0));
        assert!(borders[3].is_none());
    }

    #[test]
    fn test_border_box_width_excludes_padding() {
        let model = ModelElement::div()
            .with(Property::Width, PropertyValue::Length(Dimension::Pt(100.0)))
            .with(Property::BoxSizing, PropertyValue::BoxSizing(BoxSizing::BorderBox))
            .with(Property::PaddingLeft, PropertyValue::Length(Dimension::Pt(10.0)))
            .with(Property::PaddingRight, PropertyValue::Length(Dimension::Pt(10.0)))
            .shared();
        let mut tree = RenderTree::new();
        let id = tree.create_renderer(&model);
        assert_eq!(tree.retrieve_width(id, Property::Width, 500.0), Some(80.0));
    }
}
