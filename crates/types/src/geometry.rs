//! Rectangles, points and affine transforms in page space.
//!
//! Page space follows the output canvas convention: the origin sits in the
//! bottom-left corner of the page and `y` grows upward. A [`Rect`] is anchored
//! at its bottom-left corner.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing layout coordinates.
pub const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// An axis-aligned rectangle with a bottom-left origin.
///
/// Rectangles are plain values: every geometric operation either mutates the
/// receiver in place (the `move_*`/`increase_*` family, which return `&mut Self`
/// for chaining) or produces a new rectangle (`apply_edges`, `intersection`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when either dimension is zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn move_down(&mut self, dy: f32) -> &mut Self {
        self.y -= dy;
        self
    }

    pub fn increase_height(&mut self, dh: f32) -> &mut Self {
        self.height += dh;
        self
    }

    /// Insets the rectangle by four independent edge widths, or outsets it
    /// when `reverse` is set.
    pub fn apply_edges(&self, top: f32, right: f32, bottom: f32, left: f32, reverse: bool) -> Rect {
        let sign = if reverse { -1.0 } else { 1.0 };
        Rect {
            x: self.x + left * sign,
            y: self.y + bottom * sign,
            width: self.width - (left + right) * sign,
            height: self.height - (top + bottom) * sign,
        }
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.left().max(other.left());
        let y = self.bottom().max(other.bottom());
        let right = self.right().min(other.right());
        let top = self.top().min(other.top());
        if right < x || top < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, top - y))
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left() - EPSILON
            && point.x <= self.right() + EPSILON
            && point.y >= self.bottom() - EPSILON
            && point.y <= self.top() + EPSILON
    }

    pub fn approx_eq(&self, other: &Rect) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.width - other.width).abs() < EPSILON
            && (self.height - other.height).abs() < EPSILON
    }
}

/// A 2D affine transform in the `[a b c d e f]` form used by page-description
/// content streams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::identity()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Returns `self` followed by `other`.
    pub fn then(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: self.a * point.x + self.c * point.y + self.e,
            y: self.b * point.x + self.d * point.y + self.f,
        }
    }

    /// Bounding box of the transformed rectangle.
    pub fn apply_to_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.apply(Point::new(rect.left(), rect.bottom())),
            self.apply(Point::new(rect.right(), rect.bottom())),
            self.apply(Point::new(rect.right(), rect.top())),
            self.apply(Point::new(rect.left(), rect.top())),
        ];
        let min_x = corners.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = corners.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = corners.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = corners.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn as_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_round_trip() {
        let rect = Rect::new(10.0, 20.0, 300.0, 400.0);
        let inset = rect.apply_edges(5.0, 7.5, 2.0, 1.25, false);
        assert_eq!(inset, Rect::new(11.25, 22.0, 291.25, 393.0));
        assert_eq!(inset.apply_edges(5.0, 7.5, 2.0, 1.25, true), rect);
    }

    #[test]
    fn test_move_chain() {
        let mut rect = Rect::new(0.0, 100.0, 50.0, 0.0);
        rect.move_down(20.0).increase_height(20.0);
        assert_eq!(rect.top(), 100.0);
        assert_eq!(rect.bottom(), 80.0);
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert!(a.intersection(&b).is_none());
        assert_eq!(
            a.intersection(&Rect::new(5.0, 5.0, 10.0, 10.0)),
            Some(Rect::new(5.0, 5.0, 5.0, 5.0))
        );
    }

    #[test]
    fn test_translation_bbox() {
        let t = AffineTransform::translation(5.0, -5.0);
        let r = t.apply_to_rect(&Rect::new(0.0, 10.0, 4.0, 4.0));
        assert!(r.approx_eq(&Rect::new(5.0, 5.0, 4.0, 4.0)));
    }
}
