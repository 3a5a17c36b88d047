//! Angular projection helpers.
//!
//! Text decoding works with projections of points onto a direction: the
//! reading direction of a word. A point's projection is its signed distance
//! along the unit vector at `angle`.

use crate::types::{Point, Scalar};

/// Projection of a point onto the direction `angle` (radians).
#[inline]
#[must_use]
pub fn project(angle: Scalar, p: Point) -> Scalar {
    angle.cos().mul_add(p.x, angle.sin() * p.y)
}

/// Projections of a point slice onto the direction `angle`.
#[must_use]
pub fn project_points(angle: Scalar, points: &[Point]) -> Vec<Scalar> {
    let (sin_a, cos_a) = angle.sin_cos();
    points
        .iter()
        .map(|p| cos_a.mul_add(p.x, sin_a * p.y))
        .collect()
}

/// Extent of a point set along the direction `angle` (max − min projection).
///
/// Returns 0 for an empty slice.
#[must_use]
pub fn extent_along(angle: Scalar, points: &[Point]) -> Scalar {
    let projections = project_points(angle, points);
    let min = projections.iter().copied().fold(Scalar::INFINITY, Scalar::min);
    let max = projections
        .iter()
        .copied()
        .fold(Scalar::NEG_INFINITY, Scalar::max);
    if max >= min {
        max - min
    } else {
        0.0
    }
}

/// Wrap an angle into `(-π, π]`.
#[must_use]
pub fn wrap_angle(mut angle: Scalar) -> Scalar {
    use std::f64::consts::PI;
    while angle <= -PI {
        angle += 2.0 * PI;
    }
    while angle > PI {
        angle -= 2.0 * PI;
    }
    angle
}

/// Absolute difference between two angles, folded into `[0, π]`.
#[must_use]
pub fn angle_difference(a: Scalar, b: Scalar) -> Scalar {
    use std::f64::consts::PI;
    let mut diff = (a - b).abs() % (2.0 * PI);
    if diff > PI {
        diff = 2.0 * PI - diff;
    }
    diff
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
