//! The [`VectorPath`] model: one drawing primitive in canonical form.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::bbox::BoundingBox;
use crate::parser::{parse_path_data, PathError};
use crate::style::Style;
use crate::types::{Command, Point, Scalar};

// ---------------------------------------------------------------------------
// Canonical frame
// ---------------------------------------------------------------------------

/// A path's point set expressed in its canonical frame for a given
/// reference index: translated so point 0 is the origin, then rotated and
/// scaled so the reference point lands at `(1, 0)`.
///
/// `angle` is the rotation that was removed — the direction from point 0
/// to the reference point in the original coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalFrame {
    pub angle: Scalar,
    pub points: Vec<Point>,
}

// ---------------------------------------------------------------------------
// VectorPath
// ---------------------------------------------------------------------------

/// One drawing primitive: canonical commands, absolute points, and the
/// primitive's drawing style.
///
/// A `VectorPath` is immutable once parsed. The most-distant-point index
/// and the canonical frames used by shape matching are computed lazily and
/// cached inside the value, so repeated matching against the same path
/// (the common case for reference glyphs) does no redundant work.
#[derive(Debug)]
pub struct VectorPath {
    commands: Vec<Command>,
    points: Vec<Point>,
    style: Style,
    most_distant: OnceLock<usize>,
    frames: Mutex<HashMap<usize, Arc<CanonicalFrame>>>,
}

impl VectorPath {
    /// Build a path from canonical parts.
    ///
    /// The point count must equal the sum of the command arities.
    #[must_use]
    pub fn new(commands: Vec<Command>, points: Vec<Point>, style: Style) -> Self {
        debug_assert_eq!(
            points.len(),
            commands.iter().map(|c| c.arity()).sum::<usize>(),
            "point count must match command arities"
        );
        Self {
            commands,
            points,
            style,
            most_distant: OnceLock::new(),
            frames: Mutex::new(HashMap::new()),
        }
    }

    /// Parse path data and a style attribute into a `VectorPath`.
    pub fn from_svg(data: &str, style_attribute: &str) -> Result<Self, PathError> {
        let mut path = parse_path_data(data)?;
        path.style = Style::parse(style_attribute);
        Ok(path)
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// The command-code string, e.g. `"MLLLZ"`.
    #[must_use]
    pub fn command_codes(&self) -> String {
        self.commands.iter().map(|c| c.code()).collect()
    }

    /// The command-code string up to (excluding) the first `Close` —
    /// the glyph-database lookup key.
    #[must_use]
    pub fn prefix_signature(&self) -> String {
        self.commands
            .iter()
            .take_while(|c| **c != Command::Close)
            .map(|c| c.code())
            .collect()
    }

    /// Bounding box of all points (curve control points included — a close
    /// enough estimate for label anchoring).
    #[must_use]
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::of_points(&self.points)
    }

    /// Index of the point most distant from point 0 (first occurrence on
    /// ties). Returns 0 for paths with fewer than two points.
    #[must_use]
    pub fn most_distant_index(&self) -> usize {
        *self.most_distant.get_or_init(|| {
            let Some(first) = self.points.first() else {
                return 0;
            };
            let mut max_squared = 0.0;
            let mut max_i = 0;
            for (i, p) in self.points.iter().enumerate().skip(1) {
                let dx = p.x - first.x;
                let dy = p.y - first.y;
                let squared = dx.mul_add(dx, dy * dy);
                if squared > max_squared {
                    max_squared = squared;
                    max_i = i;
                }
            }
            max_i
        })
    }

    /// Distance from point 0 to the point at `i`.
    #[must_use]
    pub fn reference_distance(&self, i: usize) -> Scalar {
        self.points[0].distance(self.points[i])
    }

    /// The canonical frame for reference index `i`, computed once and
    /// cached. Returns `None` when point `i` coincides with point 0
    /// (no frame exists — the caller decides whether that is an error).
    #[must_use]
    pub fn canonical_frame(&self, i: usize) -> Option<Arc<CanonicalFrame>> {
        if let Some(frame) = self.frames.lock().expect("frame cache poisoned").get(&i) {
            return Some(Arc::clone(frame));
        }

        let origin = *self.points.first()?;
        let reference = *self.points.get(i)?;
        let dx = reference.x - origin.x;
        let dy = reference.y - origin.y;
        let radius = dx.hypot(dy);
        if radius == 0.0 {
            return None;
        }
        let angle = dy.atan2(dx);
        let cos_by_r = (-angle).cos() / radius;
        let sin_by_r = (-angle).sin() / radius;
        let points = self
            .points
            .iter()
            .map(|p| {
                let x = p.x - origin.x;
                let y = p.y - origin.y;
                Point::new(
                    cos_by_r.mul_add(x, -sin_by_r * y),
                    sin_by_r.mul_add(x, cos_by_r * y),
                )
            })
            .collect();

        let frame = Arc::new(CanonicalFrame { angle, points });
        self.frames
            .lock()
            .expect("frame cache poisoned")
            .insert(i, Arc::clone(&frame));
        Some(frame)
    }

    /// The remainder of this path after consuming a prefix of
    /// `consumed_commands` commands and `consumed_points` points.
    ///
    /// The style is carried over; caches start fresh.
    #[must_use]
    pub fn suffix(&self, consumed_commands: usize, consumed_points: usize) -> Self {
        Self::new(
            self.commands[consumed_commands..].to_vec(),
            self.points[consumed_points..].to_vec(),
            self.style.clone(),
        )
    }

    /// Ratio of the second segment length to the first (`l2 / l1`), used
    /// to tell apart shape-symmetric glyphs such as `l` and `I`.
    ///
    /// Returns `None` for paths with fewer than three points or a
    /// zero-length first segment.
    #[must_use]
    pub fn segment_ratio(&self) -> Option<Scalar> {
        if self.points.len() < 3 {
            return None;
        }
        let l1 = self.points[0].distance(self.points[1]);
        let l2 = self.points[1].distance(self.points[2]);
        if l1 == 0.0 {
            None
        } else {
            Some(l2 / l1)
        }
    }

    /// Serialize back to path data with absolute commands only.
    #[must_use]
    pub fn to_path_data(&self) -> String {
        let mut out = String::new();
        let mut point = self.points.iter();
        for command in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(command.code());
            for _ in 0..command.arity() {
                let p = point.next().expect("point count matches arities");
                out.push_str(&format!(" {} {}", p.x, p.y));
            }
        }
        out
    }
}

impl Clone for VectorPath {
    fn clone(&self) -> Self {
        Self::new(self.commands.clone(), self.points.clone(), self.style.clone())
    }
}

impl PartialEq for VectorPath {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands
            && self.points == other.points
            && self.style == other.style
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn polyline(points: &[(Scalar, Scalar)]) -> VectorPath {
        let commands = std::iter::once(Command::MoveTo)
            .chain(std::iter::repeat(Command::LineTo).take(points.len() - 1))
            .collect();
        let points = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        VectorPath::new(commands, points, Style::default())
    }

    #[test]
    fn prefix_signature_stops_at_close() {
        let path = VectorPath::from_svg("M 0 0 L 1 0 L 1 1 Z M 2 2 L 3 3 Z", "").unwrap();
        assert_eq!(path.prefix_signature(), "MLL");
        assert_eq!(path.command_codes(), "MLLZMLZ");
    }

    #[test]
    fn most_distant_index_first_occurrence_wins() {
        // Points at distance 5 appear twice; the first (index 1) wins.
        let path = polyline(&[(0.0, 0.0), (5.0, 0.0), (0.0, 5.0), (1.0, 0.0)]);
        assert_eq!(path.most_distant_index(), 1);
    }

    #[test]
    fn canonical_frame_reference_lands_on_unit_x() {
        let path = polyline(&[(2.0, 1.0), (2.0, 5.0), (4.0, 1.0)]);
        let i = path.most_distant_index();
        assert_eq!(i, 1);
        let frame = path.canonical_frame(i).unwrap();
        assert_relative_eq!(frame.angle, FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(frame.points[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(frame.points[0].y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(frame.points[1].x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.points[1].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn canonical_frame_cached_by_index() {
        let path = polyline(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        let a = path.canonical_frame(1).unwrap();
        let b = path.canonical_frame(1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn degenerate_frame_is_none() {
        let path = polyline(&[(1.0, 1.0), (1.0, 1.0)]);
        assert!(path.canonical_frame(1).is_none());
    }

    #[test]
    fn suffix_drops_consumed_prefix() {
        let path = VectorPath::from_svg("M 0 0 L 1 0 Z M 5 5 L 6 5 Z", "fill:#000000").unwrap();
        let rest = path.suffix(3, 2);
        assert_eq!(rest.command_codes(), "MLZ");
        assert_eq!(rest.points()[0], Point::new(5.0, 5.0));
        assert!(rest.style().fill_is("#000000"));
    }

    #[test]
    fn segment_ratio() {
        let path = polyline(&[(0.0, 0.0), (0.0, 2.0), (1.0, 2.0)]);
        assert_relative_eq!(path.segment_ratio().unwrap(), 0.5);
        let short = polyline(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(short.segment_ratio(), None);
    }
}
