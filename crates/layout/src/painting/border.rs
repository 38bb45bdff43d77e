//! Per-edge border painting.
//!
//! Square corners paint each edge as a trapezoid between the outer and
//! inner corners so adjacent edges of different widths and colours meet on
//! the diagonal. Dashed and dotted edges, and every edge of a rounded box,
//! are stroked along the centre line instead.

use super::clip::{CornerRadii, corner_curve, corners, toward};
use folio_style::{Border, BorderStyle};
use folio_traits::Canvas;
use folio_types::{Point, Rect};

fn widths(borders: &[Option<Border>; 4]) -> [f32; 4] {
    borders.each_ref().map(|b| b.as_ref().map(Border::effective_width).unwrap_or(0.0))
}

fn lerp(a: Point, b: Point, t: f32) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Paints the borders of a border box. Edges are top, right, bottom, left.
pub fn draw_borders(canvas: &mut dyn Canvas, rect: Rect, borders: &[Option<Border>; 4], radius: f32) {
    let widths = widths(borders);
    if widths.iter().all(|w| *w <= 0.0) {
        return;
    }
    if rect.is_degenerate() {
        log::warn!("Skipping borders of degenerate box {:?}", rect);
        return;
    }

    let [top, right, bottom, left] = widths;
    let outer = corners(&rect);
    let inner = corners(&rect.apply_edges(top, right, bottom, left, false));
    let radii = CornerRadii::uniform(&rect, radius);

    for (edge, border) in borders.iter().enumerate() {
        let Some(border) = border else {
            continue;
        };
        let width = border.effective_width();
        if width <= 0.0 {
            continue;
        }
        if !radii.is_zero() {
            stroke_rounded_edge(canvas, &rect, &widths, edge, border, radius);
            continue;
        }

        let (o1, o2) = (outer[edge], outer[(edge + 1) % 4]);
        let (i1, i2) = (inner[edge], inner[(edge + 1) % 4]);
        match border.style {
            BorderStyle::Solid => fill_quad(canvas, border, [o1, o2, i2, i1]),
            BorderStyle::Double => {
                let third = 1.0 / 3.0;
                let (m1, m2) = (lerp(o1, i1, third), lerp(o2, i2, third));
                let (n1, n2) = (lerp(o1, i1, 2.0 * third), lerp(o2, i2, 2.0 * third));
                fill_quad(canvas, border, [o1, o2, m2, m1]);
                fill_quad(canvas, border, [n1, n2, i2, i1]);
            }
            BorderStyle::Dashed | BorderStyle::Dotted => {
                stroke_segment(canvas, border, lerp(o1, i1, 0.5), lerp(o2, i2, 0.5));
            }
            BorderStyle::None => {}
        }
    }
}

fn fill_quad(canvas: &mut dyn Canvas, border: &Border, points: [Point; 4]) {
    canvas.set_fill_color(border.color);
    canvas.move_to(points[0].x, points[0].y);
    for p in &points[1..] {
        canvas.line_to(p.x, p.y);
    }
    canvas.close_path();
    canvas.fill();
}

fn begin_stroke(canvas: &mut dyn Canvas, border: &Border) {
    canvas.set_stroke_color(border.color);
    canvas.set_line_width(border.width);
    canvas.set_line_dash(border.style.dash_pattern(border.width));
}

fn end_stroke(canvas: &mut dyn Canvas, border: &Border) {
    canvas.stroke();
    if border.style.dash_pattern(border.width).is_some() {
        canvas.set_line_dash(None);
    }
}

fn stroke_segment(canvas: &mut dyn Canvas, border: &Border, from: Point, to: Point) {
    begin_stroke(canvas, border);
    canvas.move_to(from.x, from.y);
    canvas.line_to(to.x, to.y);
    end_stroke(canvas, border);
}

/// Strokes edge `edge` of a rounded box together with the corner arc that
/// leads into it, so the four edges cover all four corners once.
fn stroke_rounded_edge(
    canvas: &mut dyn Canvas,
    rect: &Rect,
    widths: &[f32; 4],
    edge: usize,
    border: &Border,
    radius: f32,
) {
    let [top, right, bottom, left] = widths.map(|w| w / 2.0);
    let centre = rect.apply_edges(top, right, bottom, left, false);
    let arc = CornerRadii::uniform(&centre, (radius - border.width / 2.0).max(0.0));
    let (h, v) = (arc.horizontal[edge], arc.vertical[edge]);
    let (h_next, v_next) = (arc.horizontal[(edge + 1) % 4], arc.vertical[(edge + 1) % 4]);

    let points = corners(&centre);
    let corner = points[edge];
    let previous = points[(edge + 3) % 4];
    let next = points[(edge + 1) % 4];
    let start = toward(corner, previous, h, v);
    let end = toward(corner, next, h, v);
    let line_end = toward(next, corner, h_next, v_next);

    begin_stroke(canvas, border);
    canvas.move_to(start.x, start.y);
    if h > 0.0 && v > 0.0 {
        corner_curve(canvas, corner, start, end);
    }
    canvas.line_to(line_end.x, line_end.y);
    end_stroke(canvas, border);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::painting::clip::CURVE_FACTOR;
    use folio_traits::{CanvasOp, RecordingCanvas};
    use folio_types::Color;

    #[test]
    fn test_solid_edge_is_a_trapezoid() {
        let mut canvas = RecordingCanvas::new();
        let borders = [Some(Border::solid(2.0, Color::BLACK)), None, None, Some(Border::solid(4.0, Color::BLACK))];
        draw_borders(&mut canvas, Rect::new(0.0, 0.0, 100.0, 50.0), &borders, 0.0);

        let ops = canvas.ops();
        assert_eq!(ops[1], CanvasOp::MoveTo { x: 0.0, y: 50.0 });
        assert_eq!(ops[2], CanvasOp::LineTo { x: 100.0, y: 50.0 });
        assert_eq!(ops[3], CanvasOp::LineTo { x: 100.0, y: 48.0 });
        assert_eq!(ops[4], CanvasOp::LineTo { x: 4.0, y: 48.0 });
        assert_eq!(canvas.count(|op| *op == CanvasOp::Fill), 2);
    }

    #[test]
    fn test_double_edge_fills_two_bands() {
        let mut canvas = RecordingCanvas::new();
        let border = Border {
            width: 3.0,
            style: BorderStyle::Double,
            color: Color::BLACK,
        };
        draw_borders(&mut canvas, Rect::new(0.0, 0.0, 30.0, 30.0), &[Some(border), None, None, None], 0.0);
        assert_eq!(canvas.count(|op| *op == CanvasOp::Fill), 2);
    }

    #[test]
    fn test_dashed_edge_resets_the_dash() {
        let mut canvas = RecordingCanvas::new();
        let border = Border {
            width: 1.0,
            style: BorderStyle::Dashed,
            color: Color::BLACK,
        };
        draw_borders(&mut canvas, Rect::new(0.0, 0.0, 30.0, 30.0), &[None, None, Some(border), None], 0.0);
        assert!(canvas.ops().contains(&CanvasOp::SetLineDash {
            pattern: Some([3.0, 3.0])
        }));
        assert_eq!(canvas.ops().last(), Some(&CanvasOp::SetLineDash { pattern: None }));
        assert!(canvas.ops().contains(&CanvasOp::MoveTo { x: 30.0, y: 0.5 }));
    }

    #[test]
    fn test_rounded_edges_stroke_one_arc_each() {
        let mut canvas = RecordingCanvas::new();
        let borders = [Some(Border::solid(2.0, Color::BLACK)); 4];
        draw_borders(&mut canvas, Rect::new(0.0, 0.0, 100.0, 100.0), &borders, 11.0);

        assert_eq!(canvas.count(|op| *op == CanvasOp::Stroke), 4);
        assert_eq!(canvas.count(|op| matches!(op, CanvasOp::CurveTo { .. })), 4);
        // Centre line of the top-left corner: inset by 1, arc radius 10.
        assert!(canvas.ops().contains(&CanvasOp::MoveTo { x: 1.0, y: 89.0 }));
        let first_curve = canvas.ops().iter().find_map(|op| match op {
            CanvasOp::CurveTo { points } => Some(*points),
            _ => None,
        });
        let points = first_curve.unwrap();
        assert!((points[1] - (99.0 - 10.0 * CURVE_FACTOR)).abs() < 1e-4);
        assert_eq!((points[4], points[5]), (11.0, 99.0));
    }

    #[test]
    fn test_no_borders_no_ops() {
        let mut canvas = RecordingCanvas::new();
        draw_borders(&mut canvas, Rect::new(0.0, 0.0, 10.0, 10.0), &[None; 4], 5.0);
        assert!(canvas.ops().is_empty());
    }
}
