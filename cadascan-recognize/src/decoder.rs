//! Greedy text decoding of an unknown path against a glyph database.
//!
//! The decoder walks the unknown path front to back. At each step it looks
//! up the database bucket for the remainder's prefix signature and tries
//! the candidates in priority order; the first one whose geometry matches
//! consumes its prefix of the path and contributes one recognized
//! character. Decoding stops when the remainder has no bucket or no
//! candidate matches; whatever was recognized by then is the result.
//!
//! The first matched character fixes the word's orientation. Because some
//! glyph shapes are rotations of each other (`u` is an upside down `n`),
//! the first match is only accepted when the *next* point of the path lies
//! forward of the matched points along the proposed reading direction —
//! otherwise the candidate is skipped and another orientation gets its
//! turn. Subsequent characters must match within a few degrees of the
//! fixed direction.

use std::sync::Arc;

use cadascan_path::math::{angle_difference, project, project_points};
use cadascan_path::{MatchError, MatchParams, Point, Scalar, Style, VectorPath};

use crate::glyphs::{GlyphDatabase, GlyphEntry};

// ---------------------------------------------------------------------------
// Recognition result
// ---------------------------------------------------------------------------

/// The outcome of recognizing one path as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    /// The recognized characters, with spaces inserted at wide gaps.
    pub text: String,
    /// Anchor position: the center of the original path's bounding box,
    /// in drawing coordinates.
    pub position: Point,
    /// The word's reading direction in radians.
    pub angle: Scalar,
    /// `false` when an unrecognized remainder was left over; such results
    /// need manual review downstream.
    pub complete: bool,
}

// ---------------------------------------------------------------------------
// TextDecoder
// ---------------------------------------------------------------------------

/// A configured text decoder over a shared [`GlyphDatabase`].
pub struct TextDecoder {
    database: Arc<GlyphDatabase>,
    params: MatchParams,
    angle_tolerance_deg: Scalar,
    force_horizontal: bool,
    space_width: Scalar,
    style_filter: Option<fn(&Style) -> bool>,
}

impl TextDecoder {
    /// Decoder with the database's own space width, a 5 degree angle
    /// tolerance, free orientation and no style gate.
    #[must_use]
    pub fn new(database: Arc<GlyphDatabase>, params: MatchParams) -> Self {
        let space_width = database.space_width();
        Self {
            database,
            params,
            angle_tolerance_deg: 5.0,
            force_horizontal: false,
            space_width,
            style_filter: None,
        }
    }

    /// Fix the reading direction to horizontal instead of deriving it from
    /// the first character (used for place names).
    #[must_use]
    pub const fn force_horizontal(mut self, force: bool) -> Self {
        self.force_horizontal = force;
        self
    }

    /// Override how far a character may deviate from the word's fixed
    /// direction (degrees, default 5).
    #[must_use]
    pub const fn with_angle_tolerance(mut self, degrees: Scalar) -> Self {
        self.angle_tolerance_deg = degrees;
        self
    }

    /// Override the inter-glyph gap threshold (used when a database is
    /// reused at a different scale).
    #[must_use]
    pub const fn with_space_width(mut self, space_width: Scalar) -> Self {
        self.space_width = space_width;
        self
    }

    /// Only recognize paths whose style passes the filter.
    #[must_use]
    pub fn with_style_filter(mut self, filter: fn(&Style) -> bool) -> Self {
        self.style_filter = Some(filter);
        self
    }

    #[must_use]
    pub const fn space_width(&self) -> Scalar {
        self.space_width
    }

    /// Decode `path` as text.
    ///
    /// `Ok(None)` means not a single character matched. An
    /// [`Err`](MatchError) can only arise from degenerate reference data.
    pub fn recognize(&self, path: &VectorPath) -> Result<Option<Recognition>, MatchError> {
        if let Some(filter) = self.style_filter {
            if !filter(path.style()) {
                return Ok(None);
            }
        }

        let mut text = String::new();
        let mut fixed_angle: Option<Scalar> = self.force_horizontal.then_some(0.0);
        let mut previous_end: Option<Scalar> = None;
        let mut remaining = path.clone();

        while !remaining.points().is_empty() {
            let signature = remaining.prefix_signature();
            let Some(bucket) = self.database.bucket(&signature) else {
                break;
            };

            let Some((entry, word_angle)) =
                self.match_candidate(bucket, &remaining, &mut fixed_angle)?
            else {
                break;
            };

            let label = choose_alternative(entry, &remaining);

            // A gap wider than a space between the previous glyph's end and
            // this one's start becomes a literal space.
            let consumed_points = entry.path.points().len();
            let positions = project_points(word_angle, &remaining.points()[..consumed_points]);
            let start = positions.iter().copied().fold(Scalar::INFINITY, Scalar::min);
            let end = positions
                .iter()
                .copied()
                .fold(Scalar::NEG_INFINITY, Scalar::max);
            if let Some(previous) = previous_end {
                if start - previous > self.space_width {
                    text.push(' ');
                }
            }
            previous_end = Some(end);

            text.push_str(&label);
            remaining = remaining.suffix(entry.path.commands().len(), consumed_points);
        }

        if text.is_empty() {
            return Ok(None);
        }
        let complete = remaining.points().is_empty();
        if !complete {
            log::debug!("partially recognized text {text:?}: {} points left", remaining.points().len());
        }
        Ok(Some(Recognition {
            text,
            position: path.bbox().center(),
            angle: fixed_angle.unwrap_or(0.0),
            complete,
        }))
    }

    /// Find the first bucket entry matching the remainder, enforcing the
    /// orientation rules. On success the word angle is fixed as a side
    /// effect.
    fn match_candidate<'a>(
        &self,
        bucket: &'a [GlyphEntry],
        remaining: &VectorPath,
        fixed_angle: &mut Option<Scalar>,
    ) -> Result<Option<(&'a GlyphEntry, Scalar)>, MatchError> {
        for entry in bucket {
            let Some(angle) = remaining.starts_with(&entry.path, &self.params)? else {
                continue;
            };

            let word_angle = if let Some(fixed) = *fixed_angle {
                if angle_difference(angle, fixed).to_degrees() > self.angle_tolerance_deg {
                    // Recognized, but not at this word's orientation.
                    continue;
                }
                fixed
            } else {
                if !advances_along(angle, remaining, entry.path.points().len()) {
                    // The rest of the path would run backwards: wrong
                    // orientation choice among near-symmetric shapes.
                    continue;
                }
                *fixed_angle = Some(angle);
                angle
            };

            return Ok(Some((entry, word_angle)));
        }
        Ok(None)
    }
}

/// Whether the first unmatched point projects farther along `angle` than
/// the mean of the matched points. Vacuously true when nothing follows.
fn advances_along(angle: Scalar, remaining: &VectorPath, matched_points: usize) -> bool {
    if remaining.points().len() <= matched_points {
        return true;
    }
    let positions = project_points(angle, &remaining.points()[..matched_points]);
    #[allow(clippy::cast_precision_loss)]
    let mean = positions.iter().sum::<Scalar>() / positions.len() as Scalar;
    let next = project(angle, remaining.points()[matched_points]);
    next >= mean
}

/// Resolve a shape-ambiguous match by comparing second-to-first segment
/// length ratios: the entry or alternative whose reference ratio is
/// closest to the unknown path's wins.
fn choose_alternative(entry: &GlyphEntry, remaining: &VectorPath) -> String {
    if entry.alternatives.is_empty() {
        return entry.label.clone();
    }
    let (Some(current), Some(mut best)) = (remaining.segment_ratio(), entry.path.segment_ratio())
    else {
        return entry.label.clone();
    };
    let mut label = &entry.label;
    for (alternative_label, alternative_path) in &entry.alternatives {
        if let Some(ratio) = alternative_path.segment_ratio() {
            if (current - ratio).abs() < (current - best).abs() {
                label = alternative_label;
                best = ratio;
            }
        }
    }
    label.clone()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
