//! Point transforms into the target map coordinate space.
//!
//! The recognition engine never projects coordinates itself: a
//! [`PointTransform`] is supplied per document by the caller. The one
//! transform this crate does provide is the [`LinearTransform`] mapping the
//! document's drawing bounding box onto the georeferenced target box that
//! accompanies each cadastre export.

use crate::bbox::BoundingBox;
use crate::types::{Point, Scalar};

// ---------------------------------------------------------------------------
// PointTransform trait
// ---------------------------------------------------------------------------

/// A mapping from drawing coordinates into target map coordinates.
pub trait PointTransform {
    /// Map one point.
    fn apply(&self, p: Point) -> Point;

    /// Map a point slice.
    fn apply_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.apply(*p)).collect()
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// The identity transform, useful for tests and untransformed documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl PointTransform for IdentityTransform {
    #[inline]
    fn apply(&self, p: Point) -> Point {
        p
    }
}

// ---------------------------------------------------------------------------
// LinearTransform
// ---------------------------------------------------------------------------

/// Axis-aligned linear mapping of one bounding box onto another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTransform {
    input_origin: Point,
    output_origin: Point,
    x_factor: Scalar,
    y_factor: Scalar,
}

impl LinearTransform {
    /// Build the transform mapping `input` onto `output`.
    ///
    /// Returns `None` when the input box is degenerate (zero width or
    /// height), which would make the mapping singular.
    #[must_use]
    pub fn between(input: &BoundingBox, output: &BoundingBox) -> Option<Self> {
        if input.width() == 0.0 || input.height() == 0.0 {
            return None;
        }
        Some(Self {
            input_origin: Point::new(input.min_x, input.min_y),
            output_origin: Point::new(output.min_x, output.min_y),
            x_factor: output.width() / input.width(),
            y_factor: output.height() / input.height(),
        })
    }
}

impl PointTransform for LinearTransform {
    #[inline]
    fn apply(&self, p: Point) -> Point {
        Point::new(
            self.x_factor
                .mul_add(p.x - self.input_origin.x, self.output_origin.x),
            self.y_factor
                .mul_add(p.y - self.input_origin.y, self.output_origin.y),
        )
    }
}

// ---------------------------------------------------------------------------
// CompositeTransform
// ---------------------------------------------------------------------------

/// Transforms applied in sequence.
pub struct CompositeTransform {
    stages: Vec<Box<dyn PointTransform + Send + Sync>>,
}

impl CompositeTransform {
    #[must_use]
    pub fn new(stages: Vec<Box<dyn PointTransform + Send + Sync>>) -> Self {
        Self { stages }
    }
}

impl PointTransform for CompositeTransform {
    fn apply(&self, p: Point) -> Point {
        self.stages.iter().fold(p, |p, stage| stage.apply(p))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_maps_corners_and_center() {
        let input = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
        let output = BoundingBox::new(100.0, 200.0, 200.0, 300.0);
        let t = LinearTransform::between(&input, &output).unwrap();

        let low = t.apply(Point::new(0.0, 0.0));
        assert_relative_eq!(low.x, 100.0);
        assert_relative_eq!(low.y, 200.0);

        let high = t.apply(Point::new(10.0, 20.0));
        assert_relative_eq!(high.x, 200.0);
        assert_relative_eq!(high.y, 300.0);

        let mid = t.apply(Point::new(5.0, 10.0));
        assert_relative_eq!(mid.x, 150.0);
        assert_relative_eq!(mid.y, 250.0);
    }

    #[test]
    fn degenerate_input_box_rejected() {
        let flat = BoundingBox::new(0.0, 5.0, 10.0, 5.0);
        let output = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(LinearTransform::between(&flat, &output).is_none());
    }

    #[test]
    fn composite_applies_in_order() {
        let a = LinearTransform::between(
            &BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            &BoundingBox::new(0.0, 0.0, 2.0, 2.0),
        )
        .unwrap();
        let b = LinearTransform::between(
            &BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            &BoundingBox::new(10.0, 10.0, 11.0, 11.0),
        )
        .unwrap();
        let composite = CompositeTransform::new(vec![Box::new(a), Box::new(b)]);
        let p = composite.apply(Point::new(0.5, 0.5));
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, 11.0);
    }

    #[test]
    fn identity_is_a_noop() {
        let p = Point::new(3.5, -2.0);
        assert_eq!(IdentityTransform.apply(p), p);
    }
}
