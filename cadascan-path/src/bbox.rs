//! Axis-aligned bounding box computation over point sets.

use crate::types::{Point, Scalar};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: Scalar,
    pub min_y: Scalar,
    pub max_x: Scalar,
    pub max_y: Scalar,
}

impl BoundingBox {
    /// An empty (inverted) bounding box.
    pub const EMPTY: Self = Self {
        min_x: Scalar::INFINITY,
        min_y: Scalar::INFINITY,
        max_x: Scalar::NEG_INFINITY,
        max_y: Scalar::NEG_INFINITY,
    };

    /// Construct from two opposite corners, in any order.
    #[must_use]
    pub fn new(x1: Scalar, y1: Scalar, x2: Scalar, y2: Scalar) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// The tight bounding box of a point set.
    #[must_use]
    pub fn of_points(points: &[Point]) -> Self {
        points.iter().fold(Self::EMPTY, |mut bb, p| {
            bb.include_point(*p);
            bb
        })
    }

    /// Check if this bounding box is valid (non-empty).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Width.
    #[must_use]
    pub fn width(&self) -> Scalar {
        if self.is_valid() {
            self.max_x - self.min_x
        } else {
            0.0
        }
    }

    /// Height.
    #[must_use]
    pub fn height(&self) -> Scalar {
        if self.is_valid() {
            self.max_y - self.min_y
        } else {
            0.0
        }
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Expand to include a point.
    pub fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Expand to include another bounding box.
    pub fn union(&mut self, other: &Self) {
        if other.is_valid() {
            self.min_x = self.min_x.min(other.min_x);
            self.min_y = self.min_y.min(other.min_y);
            self.max_x = self.max_x.max(other.max_x);
            self.max_y = self.max_y.max(other.max_y);
        }
    }

    /// Whether a point lies inside (inclusive of edges).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_invalid() {
        let bb = BoundingBox::EMPTY;
        assert!(!bb.is_valid());
        assert_eq!(bb.width(), 0.0);
        assert_eq!(bb.height(), 0.0);
    }

    #[test]
    fn new_normalizes_corners() {
        let bb = BoundingBox::new(5.0, 8.0, 1.0, 2.0);
        assert_eq!(bb.min_x, 1.0);
        assert_eq!(bb.min_y, 2.0);
        assert_eq!(bb.max_x, 5.0);
        assert_eq!(bb.max_y, 8.0);
    }

    #[test]
    fn of_points_and_center() {
        let bb = BoundingBox::of_points(&[
            Point::new(1.0, 2.0),
            Point::new(5.0, 8.0),
            Point::new(3.0, 3.0),
        ]);
        assert!(bb.is_valid());
        assert_eq!(bb.width(), 4.0);
        assert_eq!(bb.height(), 6.0);
        assert_eq!(bb.center(), Point::new(3.0, 5.0));
    }

    #[test]
    fn union_extends() {
        let mut a = BoundingBox::new(0.0, 0.0, 5.0, 5.0);
        a.union(&BoundingBox::new(3.0, 3.0, 10.0, 10.0));
        assert_eq!(a.min_x, 0.0);
        assert_eq!(a.max_x, 10.0);
    }

    #[test]
    fn union_with_empty_is_noop() {
        let mut a = BoundingBox::new(0.0, 0.0, 5.0, 5.0);
        a.union(&BoundingBox::EMPTY);
        assert_eq!(a, BoundingBox::new(0.0, 0.0, 5.0, 5.0));
    }

    #[test]
    fn contains_edges() {
        let bb = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
        assert!(bb.contains(Point::new(0.0, 2.0)));
        assert!(bb.contains(Point::new(1.0, 1.0)));
        assert!(!bb.contains(Point::new(2.1, 1.0)));
    }
}
