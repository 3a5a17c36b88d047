//! Canonical shape matching: does a path start with a scaled, rotated,
//! translated copy of another path?
//!
//! Matching compares the two paths in their canonical frames (see
//! [`CanonicalFrame`](crate::path::CanonicalFrame)): both point sets are
//! translated so point 0 is the origin, then rotated and scaled so the
//! reference point — the point of the *candidate* path most distant from
//! its first point — lands at `(1, 0)`. In that frame the comparison is a
//! plain Chebyshev distance check, and the rotation between the two paths
//! falls out as the difference of the two removed angles.

use std::fmt;

use crate::math::wrap_angle;
use crate::path::VectorPath;
use crate::types::Scalar;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Tolerances for one matching context.
///
/// `tolerance` is dimensionless: it bounds the Chebyshev distance between
/// canonicalized point sets, where the reference distance is 1.
/// `min_scale`/`max_scale` bound the accepted size ratio between the
/// subject and the reference path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchParams {
    pub tolerance: Scalar,
    pub min_scale: Scalar,
    pub max_scale: Scalar,
}

impl Default for MatchParams {
    fn default() -> Self {
        Self {
            tolerance: 0.05,
            min_scale: 0.9,
            max_scale: 1.1,
        }
    }
}

impl MatchParams {
    /// Same tolerance with a different scale window.
    #[must_use]
    pub const fn with_scale_window(mut self, min_scale: Scalar, max_scale: Scalar) -> Self {
        self.min_scale = min_scale;
        self.max_scale = max_scale;
        self
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error raised by shape matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    /// The reference path's most distant point coincides with its first
    /// point, so no canonical frame exists. Reference data of this shape
    /// is unusable and the condition is reported rather than guessed
    /// around.
    DegenerateReference,
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateReference => {
                write!(f, "reference path has zero extent from its first point")
            }
        }
    }
}

impl std::error::Error for MatchError {}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

impl VectorPath {
    /// Test whether this path begins with a scaled, rotated, translated
    /// copy of `other`.
    ///
    /// Returns `Ok(Some(angle))` with the rotation from `other` to `self`
    /// wrapped into `(-π, π]` — `Some(0.0)` is a perfectly aligned match,
    /// distinct from `Ok(None)`, the no-match case. The reference path
    /// having zero geometric extent is an error, not a no-match.
    pub fn starts_with(
        &self,
        other: &Self,
        params: &MatchParams,
    ) -> Result<Option<Scalar>, MatchError> {
        if other.points().is_empty() {
            return Err(MatchError::DegenerateReference);
        }
        if self.commands().len() < other.commands().len()
            || self.commands()[..other.commands().len()] != *other.commands()
        {
            return Ok(None);
        }

        let i = other.most_distant_index();
        let reference_distance = other.reference_distance(i);
        if reference_distance == 0.0 {
            return Err(MatchError::DegenerateReference);
        }
        let own_distance = self.reference_distance(i);
        let scale_factor = own_distance / reference_distance;
        if scale_factor < params.min_scale || scale_factor > params.max_scale {
            return Ok(None);
        }

        // A positive scale factor implies both distances are nonzero, so
        // both frames exist.
        let other_frame = other
            .canonical_frame(i)
            .ok_or(MatchError::DegenerateReference)?;
        let Some(self_frame) = self.canonical_frame(i) else {
            return Ok(None);
        };

        let limit = other.points().len();
        let max_difference = self_frame.points[..limit]
            .iter()
            .zip(&other_frame.points)
            .map(|(a, b)| (a.x - b.x).abs().max((a.y - b.y).abs()))
            .fold(0.0, Scalar::max);

        if max_difference < params.tolerance {
            Ok(Some(wrap_angle(self_frame.angle - other_frame.angle)))
        } else {
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;
    use crate::types::{Command, Point};
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn polyline(points: &[(Scalar, Scalar)], closed: bool) -> VectorPath {
        let mut commands: Vec<Command> = std::iter::once(Command::MoveTo)
            .chain(std::iter::repeat(Command::LineTo).take(points.len() - 1))
            .collect();
        if closed {
            commands.push(Command::Close);
        }
        let points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        VectorPath::new(commands, points, Style::default())
    }

    /// An asymmetric five-point test shape.
    fn sample_shape() -> Vec<(Scalar, Scalar)> {
        vec![(0.0, 0.0), (0.0, 4.0), (1.5, 4.0), (1.5, 2.5), (0.5, 0.5)]
    }

    fn transformed(
        points: &[(Scalar, Scalar)],
        theta: Scalar,
        scale: Scalar,
        tx: Scalar,
        ty: Scalar,
    ) -> Vec<(Scalar, Scalar)> {
        let (sin_t, cos_t) = theta.sin_cos();
        points
            .iter()
            .map(|&(x, y)| {
                (
                    scale * cos_t.mul_add(x, -sin_t * y) + tx,
                    scale * sin_t.mul_add(x, cos_t * y) + ty,
                )
            })
            .collect()
    }

    fn loose() -> MatchParams {
        MatchParams::default().with_scale_window(0.4, 2.5)
    }

    #[test]
    fn identical_path_matches_with_zero_angle() {
        let a = polyline(&sample_shape(), true);
        let b = polyline(&sample_shape(), true);
        let angle = a.starts_with(&b, &MatchParams::default()).unwrap();
        assert_eq!(angle, Some(0.0));
    }

    #[test]
    fn rigid_transform_recovers_angle() {
        let reference = polyline(&sample_shape(), true);
        for theta in [0.3, -1.2, FRAC_PI_2, 3.0] {
            for scale in [0.5, 1.0, 2.0] {
                let moved = polyline(&transformed(&sample_shape(), theta, scale, 7.0, -3.0), true);
                let angle = moved
                    .starts_with(&reference, &loose())
                    .unwrap()
                    .unwrap_or_else(|| panic!("no match for theta={theta} scale={scale}"));
                assert_relative_eq!(angle, wrap_angle(theta), epsilon = 0.05);
            }
        }
    }

    #[test]
    fn angle_wraps_into_half_open_interval() {
        let reference = polyline(&sample_shape(), true);
        let moved = polyline(&transformed(&sample_shape(), PI, 1.0, 0.0, 0.0), true);
        let angle = moved.starts_with(&reference, &loose()).unwrap().unwrap();
        assert!(angle > -PI && angle <= PI);
        assert_relative_eq!(angle.abs(), PI, epsilon = 0.05);
    }

    #[test]
    fn command_prefix_mismatch_rejected_regardless_of_points() {
        let subject = polyline(&sample_shape(), false);
        let reference = polyline(&sample_shape(), true);
        // Reference has a trailing Close the subject lacks.
        assert_eq!(
            subject.starts_with(&reference, &loose()).unwrap(),
            None
        );
    }

    #[test]
    fn scale_outside_window_rejected() {
        let reference = polyline(&sample_shape(), true);
        let enlarged = polyline(&transformed(&sample_shape(), 0.0, 3.0, 0.0, 0.0), true);
        assert_eq!(
            enlarged
                .starts_with(&reference, &MatchParams::default())
                .unwrap(),
            None
        );
    }

    #[test]
    fn longer_path_matches_reference_prefix() {
        let mut long_points = sample_shape();
        long_points.push((9.0, 9.0));
        let mut commands: Vec<Command> = std::iter::once(Command::MoveTo)
            .chain(std::iter::repeat(Command::LineTo).take(4))
            .collect();
        commands.push(Command::Close);
        commands.push(Command::LineTo);
        let subject = VectorPath::new(
            commands,
            long_points
                .iter()
                .map(|&(x, y)| Point::new(x, y))
                .collect(),
            Style::default(),
        );
        let reference = polyline(&sample_shape(), true);
        assert_eq!(
            subject.starts_with(&reference, &loose()).unwrap(),
            Some(0.0)
        );
    }

    #[test]
    fn perturbed_geometry_beyond_tolerance_rejected() {
        let mut bent = sample_shape();
        bent[3].0 += 1.0;
        let subject = polyline(&bent, true);
        let reference = polyline(&sample_shape(), true);
        assert_eq!(
            subject
                .starts_with(&reference, &MatchParams::default())
                .unwrap(),
            None
        );
    }

    #[test]
    fn degenerate_reference_is_an_error() {
        let reference = polyline(&[(1.0, 1.0), (1.0, 1.0)], false);
        let subject = polyline(&[(0.0, 0.0), (1.0, 0.0)], false);
        assert_eq!(
            subject.starts_with(&reference, &loose()),
            Err(MatchError::DegenerateReference)
        );
    }

    #[test]
    fn degenerate_subject_is_an_ordinary_no_match() {
        let reference = polyline(&[(0.0, 0.0), (1.0, 0.0)], false);
        let subject = polyline(&[(1.0, 1.0), (1.0, 1.0)], false);
        assert_eq!(subject.starts_with(&reference, &loose()).unwrap(), None);
    }
}
