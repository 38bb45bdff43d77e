//! Rounded-corner clip paths.
//!
//! A rounded box is clipped by intersecting four regions, one per corner.
//! Each region is the whole box with that single corner cut along a cubic
//! quarter-ellipse, so corners with a zero radius emit nothing.

use folio_style::{Border, BorderRadius, Dimension};
use folio_traits::Canvas;
use folio_types::{Point, Rect};

/// Control point offset of a quarter circle drawn with one cubic curve,
/// measured from the corner as a fraction of the radius.
pub const CURVE_FACTOR: f32 = 0.4477;

/// Uniform radius in points. Percentages are not supported and count as 0.
pub fn resolve_radius(radius: Option<BorderRadius>, rect: &Rect) -> f32 {
    match radius {
        Some(BorderRadius(Dimension::Pt(value))) => value.max(0.0),
        Some(BorderRadius(Dimension::Percent(value))) => {
            log::error!(
                "Percentage border radius {}% is not supported, using 0 for {:?}",
                value,
                rect
            );
            0.0
        }
        Some(BorderRadius(Dimension::Auto)) | None => 0.0,
    }
}

/// Horizontal and vertical radius of each corner, top-left first, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadii {
    pub horizontal: [f32; 4],
    pub vertical: [f32; 4],
}

impl CornerRadii {
    /// `radius` on every corner, clamped to half the box in each direction.
    pub fn uniform(rect: &Rect, radius: f32) -> Self {
        let h = radius.min(rect.width / 2.0).max(0.0);
        let v = radius.min(rect.height / 2.0).max(0.0);
        Self {
            horizontal: [h; 4],
            vertical: [v; 4],
        }
    }

    /// Radii of the padding edge: each corner shrinks by the widths of the
    /// two borders meeting there.
    pub fn inset(&self, widths: [f32; 4]) -> Self {
        let [top, right, bottom, left] = widths;
        let side = [left, right, right, left];
        let cap = [top, top, bottom, bottom];
        let mut inner = *self;
        for corner in 0..4 {
            inner.horizontal[corner] = (self.horizontal[corner] - side[corner]).max(0.0);
            inner.vertical[corner] = (self.vertical[corner] - cap[corner]).max(0.0);
        }
        inner
    }

    pub fn is_zero(&self) -> bool {
        self.horizontal.iter().chain(&self.vertical).all(|r| *r <= 0.0)
    }
}

/// Corners of `rect` as top-left, top-right, bottom-right, bottom-left.
pub fn corners(rect: &Rect) -> [Point; 4] {
    [
        Point::new(rect.left(), rect.top()),
        Point::new(rect.right(), rect.top()),
        Point::new(rect.right(), rect.bottom()),
        Point::new(rect.left(), rect.bottom()),
    ]
}

/// The point `h`/`v` away from `from` along the axis-aligned edge to `to`.
pub(crate) fn toward(from: Point, to: Point, h: f32, v: f32) -> Point {
    let step = |a: f32, b: f32, d: f32| {
        if b > a {
            d
        } else if b < a {
            -d
        } else {
            0.0
        }
    };
    Point::new(from.x + step(from.x, to.x, h), from.y + step(from.y, to.y, v))
}

/// Cubic arc from `start` to `end` bulging away from `corner`.
pub(crate) fn corner_curve(canvas: &mut dyn Canvas, corner: Point, start: Point, end: Point) {
    let control = |p: Point| {
        Point::new(
            corner.x + (p.x - corner.x) * CURVE_FACTOR,
            corner.y + (p.y - corner.y) * CURVE_FACTOR,
        )
    };
    let (c1, c2) = (control(start), control(end));
    canvas.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
}

/// Clips to `rect` with its corners rounded by `radii`.
pub fn clip_rounded(canvas: &mut dyn Canvas, rect: &Rect, radii: &CornerRadii) {
    let points = corners(rect);
    for i in 0..4 {
        let (h, v) = (radii.horizontal[i], radii.vertical[i]);
        if h <= 0.0 || v <= 0.0 {
            continue;
        }
        let corner = points[i];
        let previous = points[(i + 3) % 4];
        let next = points[(i + 1) % 4];
        let start = toward(corner, previous, h, v);
        let end = toward(corner, next, h, v);

        canvas.move_to(start.x, start.y);
        corner_curve(canvas, corner, start, end);
        canvas.line_to(next.x, next.y);
        canvas.line_to(points[(i + 2) % 4].x, points[(i + 2) % 4].y);
        canvas.line_to(previous.x, previous.y);
        canvas.close_path();
        canvas.clip();
        canvas.end_path();
    }
}

/// Clips to the rounded border box, or to the rounded padding box when
/// `inner` is set so the clip stays inside borders of any width.
pub fn clip_border_area(
    canvas: &mut dyn Canvas,
    rect: &Rect,
    radius: f32,
    borders: &[Option<Border>; 4],
    inner: bool,
) {
    let radii = CornerRadii::uniform(rect, radius);
    if radii.is_zero() {
        return;
    }
    if !inner {
        clip_rounded(canvas, rect, &radii);
        return;
    }
    let widths = borders.each_ref().map(|b| b.as_ref().map(Border::effective_width).unwrap_or(0.0));
    let [top, right, bottom, left] = widths;
    let padding_box = rect.apply_edges(top, right, bottom, left, false);
    clip_rounded(canvas, &padding_box, &radii.inset(widths));
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_traits::{CanvasOp, RecordingCanvas};
    use folio_types::Color;

    #[test]
    fn test_zero_radius_emits_nothing() {
        let mut canvas = RecordingCanvas::new();
        clip_border_area(&mut canvas, &Rect::new(0.0, 0.0, 100.0, 40.0), 0.0, &[None; 4], false);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_radius_is_clamped_to_half_the_box() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        let radii = CornerRadii::uniform(&rect, 50.0);
        assert_eq!(radii.horizontal, [50.0; 4]);
        assert_eq!(radii.vertical, [20.0; 4]);

        let mut canvas = RecordingCanvas::new();
        clip_border_area(&mut canvas, &rect, 50.0, &[None; 4], false);
        assert_eq!(canvas.count(|op| *op == CanvasOp::Clip), 4);
        assert_eq!(canvas.ops()[0], CanvasOp::MoveTo { x: 0.0, y: 20.0 });
        match &canvas.ops()[1] {
            CanvasOp::CurveTo { points } => {
                assert!((points[1] - (40.0 - 20.0 * CURVE_FACTOR)).abs() < 1e-4);
                assert!((points[2] - 50.0 * CURVE_FACTOR).abs() < 1e-4);
                assert_eq!(points[4], 50.0);
                assert_eq!(points[5], 40.0);
            }
            other => panic!("expected a curve, got {other:?}"),
        }
    }

    #[test]
    fn test_percentage_radius_counts_as_zero() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(resolve_radius(Some(BorderRadius(Dimension::Percent(20.0))), &rect), 0.0);
        assert_eq!(resolve_radius(Some(BorderRadius::pt(3.0)), &rect), 3.0);
    }

    #[test]
    fn test_inner_clip_follows_border_widths() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let borders = [
            Some(Border::solid(8.0, Color::BLACK)),
            None,
            None,
            Some(Border::solid(2.0, Color::BLACK)),
        ];
        let mut canvas = RecordingCanvas::new();
        clip_border_area(&mut canvas, &rect, 10.0, &borders, true);
        // Top-left corner: vertical radius 10 - 8, starting at the padding edge.
        assert_eq!(canvas.ops()[0], CanvasOp::MoveTo { x: 2.0, y: 90.0 });
        assert_eq!(canvas.count(|op| *op == CanvasOp::Clip), 4);
    }

    #[test]
    fn test_corner_inset_clamps_at_zero() {
        let radii = CornerRadii::uniform(&Rect::new(0.0, 0.0, 50.0, 50.0), 4.0);
        let inner = radii.inset([10.0, 0.0, 0.0, 0.0]);
        assert_eq!(inner.vertical, [0.0, 0.0, 4.0, 4.0]);
        assert_eq!(inner.horizontal, [4.0; 4]);
    }
}
