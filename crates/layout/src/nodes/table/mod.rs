//! Grid of equal-width columns filled row-major with cells.
//!
//! A row is as tall as its tallest cell and every cell is stretched to it.
//! Rows are kept whole when they can move to the next area; only the first
//! row of an area splits its cells.

use crate::LayoutError;
use crate::box_model::{apply_edges, apply_margins};
use crate::interface::{LayoutArea, LayoutContext, LayoutEnvironment, LayoutResult, LayoutStatus};
use crate::model::ElementKind;
use crate::nodes::block::{constrained_width, is_forced};
use crate::nodes::{constrained_height, layout};
use crate::properties::Property;
use crate::tree::{NodeId, RenderTree};
use folio_types::Rect;
use folio_types::geometry::EPSILON;
use itertools::Itertools;

pub fn column_count(tree: &RenderTree, id: NodeId) -> usize {
    let columns = tree
        .node(id)
        .model
        .as_ref()
        .and_then(|model| match model.borrow().kind {
            ElementKind::Table { columns } => Some(columns),
            _ => None,
        })
        .unwrap_or(1);
    columns.max(1)
}

pub fn layout_table(
    tree: &mut RenderTree,
    id: NodeId,
    ctx: &LayoutContext,
    env: &LayoutEnvironment<'_>,
) -> Result<LayoutResult, LayoutError> {
    let forced = is_forced(tree, id, ctx);
    let columns = column_count(tree, id);
    let area = ctx.area.rect;
    let margins = tree.margins(id);
    let border_padding = tree.border_padding(id);
    let mut content = apply_edges(apply_margins(area, &margins, false), &border_padding, false);
    let width = tree
        .retrieve_width(id, Property::Width, area.width)
        .unwrap_or(content.width);
    content.width = constrained_width(tree, id, width, area.width);
    let column_width = content.width / columns as f32;

    let cells = tree.children(id).to_vec();
    let mut cursor = content.top();
    let mut placed = Vec::with_capacity(cells.len());
    let mut remaining = Vec::new();
    let mut cause = None;

    for (row_index, row) in cells.chunks(columns).enumerate() {
        let available = (cursor - content.bottom()).max(0.0);
        let mut outcomes = Vec::with_capacity(row.len());
        for (column, &cell) in row.iter().enumerate() {
            let rect = Rect::new(
                content.x + column as f32 * column_width,
                content.bottom(),
                column_width,
                available,
            );
            let cell_ctx = LayoutContext::new(LayoutArea::new(ctx.area.page_number, rect))
                .forced(forced && row_index == 0);
            outcomes.push((cell, layout(tree, cell, &cell_ctx, env)?));
        }

        let failed = outcomes.iter().find_map(|(cell, result)| {
            (!result.is_full()).then(|| result.cause.unwrap_or(*cell))
        });
        let any_nothing = outcomes.iter().any(|(_, r)| r.is_nothing());
        if failed.is_some() && (any_nothing || row_index > 0) {
            if row_index == 0 {
                return Ok(LayoutResult::nothing(id, failed.unwrap_or(id)));
            }
            remaining.extend_from_slice(&cells[row_index * columns..]);
            cause = failed;
            break;
        }

        let row_cells: Vec<NodeId> = outcomes
            .iter()
            .map(|(cell, result)| match result.status {
                LayoutStatus::Partial => result.split.unwrap_or(*cell),
                _ => *cell,
            })
            .collect();
        let row_height = row_cells
            .iter()
            .filter_map(|cell| tree.occupied(*cell))
            .map(|a| a.rect.height)
            .fold(0.0, f32::max);
        for cell in &row_cells {
            if let Some(occupied) = tree.node_mut(*cell).occupied.as_mut() {
                occupied.rect.y = cursor - row_height;
                occupied.rect.height = row_height;
            }
        }
        placed.extend(row_cells);
        cursor -= row_height;

        if failed.is_some() {
            // Cells that completed continue as empty copies to keep the grid.
            for (cell, result) in &outcomes {
                let continuation = match result.overflow {
                    Some(overflow) => overflow,
                    None => tree.create_copy(*cell),
                };
                remaining.push(continuation);
            }
            remaining.extend_from_slice(&cells[((row_index + 1) * columns).min(cells.len())..]);
            cause = failed;
            break;
        }
    }

    let used = content.top() - cursor;
    let mut content_height = constrained_height(tree, id, used, area.height);
    let frame = border_padding.vertical() + margins.vertical();
    if remaining.is_empty() && content_height + frame > area.height + EPSILON {
        if !forced {
            return Ok(LayoutResult::nothing(id, id));
        }
        log::warn!(
            "Table height {} does not fit the available {} at {:?}; clamping",
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

/// Every column as wide as the widest cell.
pub fn max_content_width(
    tree: &mut RenderTree,
    id: NodeId,
    env: &LayoutEnvironment<'_>,
) -> Result<f32, LayoutError> {
    let columns = column_count(tree, id);
    let widths: Vec<f32> = tree
        .children(id)
        .to_vec()
        .into_iter()
        .map(|cell| crate::nodes::max_content_width(tree, cell, env))
        .try_collect()?;
    let widest = widths.into_iter().fold(0.0, f32::max);
    Ok(widest * columns as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::model::{ModelElement, SharedElement};
    use crate::properties::PropertyValue;
    use crate::test_utils::context;
    use folio_style::Dimension;

    fn cell(content_height: f32) -> SharedElement {
        let content = ModelElement::div().with(
            Property::Height,
            PropertyValue::Length(Dimension::Pt(content_height)),
        );
        ModelElement::cell().with_child(content.shared()).shared()
    }

    fn table(heights: &[f32]) -> SharedElement {
        heights
            .iter()
            .fold(ModelElement::table(2), |table, h| table.with_child(cell(*h)))
            .shared()
    }

    #[test]
    fn test_rows_stack_in_equal_columns() {
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let mut tree = RenderTree::new();
        let id = tree.build(&table(&[20.0, 20.0, 20.0, 20.0]));

        let result = layout_table(&mut tree, id, &context(100.0, 100.0), &env).unwrap();
        assert!(result.is_full());
        // Cells carry 2pt padding and a 0.5pt border on each side.
        assert!(tree.occupied(id).unwrap().rect.approx_eq(&Rect::new(0.0, 50.0, 100.0, 50.0)));
        let cells = tree.children(id).to_vec();
        assert!(tree.occupied(cells[1]).unwrap().rect.approx_eq(&Rect::new(50.0, 75.0, 50.0, 25.0)));
        assert!(tree.occupied(cells[2]).unwrap().rect.approx_eq(&Rect::new(0.0, 50.0, 50.0, 25.0)));
    }

    #[test]
    fn test_cells_stretch_to_the_tallest_in_the_row() {
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let mut tree = RenderTree::new();
        let id = tree.build(&table(&[20.0, 40.0]));

        layout_table(&mut tree, id, &context(100.0, 100.0), &env).unwrap();
        let cells = tree.children(id).to_vec();
        let short = tree.occupied(cells[0]).unwrap().rect;
        assert!((short.height - 45.0).abs() < 1e-4);
        assert!((short.y - 55.0).abs() < 1e-4);
    }

    #[test]
    fn test_rows_that_do_not_fit_move_whole() {
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let mut tree = RenderTree::new();
        let id = tree.build(&table(&[20.0, 20.0, 20.0, 20.0]));

        let result = layout_table(&mut tree, id, &context(100.0, 40.0), &env).unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        let split = result.split.unwrap();
        let overflow = result.overflow.unwrap();
        assert_eq!(tree.children(split).len(), 2);
        assert_eq!(tree.children(overflow).len(), 2);
        assert!((tree.occupied(split).unwrap().rect.height - 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_first_row_that_does_not_fit_is_nothing() {
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let mut tree = RenderTree::new();
        let id = tree.build(&table(&[20.0, 20.0]));

        let result = layout_table(&mut tree, id, &context(100.0, 10.0), &env).unwrap();
        assert!(result.is_nothing());
    }

    #[test]
    fn test_max_content_width_uses_widest_cell() {
        let config = LayoutConfig::default();
        let env = LayoutEnvironment::new(&config);
        let mut tree = RenderTree::new();
        let model = ModelElement::table(3)
            .with_child(
                ModelElement::cell()
                    .with(Property::Width, PropertyValue::Length(Dimension::Pt(30.0)))
                    .shared(),
            )
            .shared();
        let id = tree.build(&model);
        // 30 wide plus 2.5pt of padding and border on each side.
        let width = max_content_width(&mut tree, id, &env).unwrap();
        assert!((width - 105.0).abs() < 1e-4);
    }
}
