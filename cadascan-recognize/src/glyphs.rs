//! The reference glyph database.
//!
//! Text in cadastre drawings is not text: every character is an anonymous
//! path. Recognition compares unknown paths against a library of labeled
//! reference glyphs. Building the database once resolves two subtleties:
//!
//! - **Containment.** Some glyphs geometrically start with another glyph —
//!   `é` starts with `e` plus an accent. Trying `e` first would claim the
//!   base letter and leave an unrecognizable accent behind, so glyphs are
//!   ordered topologically: a glyph is only tried after every glyph that
//!   starts with it.
//! - **Ambiguity.** Some pairs match in *both* directions at the same
//!   orientation (`l` and `I` are the same bar with different
//!   proportions). No ordering can separate them; they are recorded as
//!   alternatives of each other and resolved at decode time by segment
//!   proportions.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use cadascan_path::math::extent_along;
use cadascan_path::{MatchError, MatchParams, Scalar, VectorPath};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A reference glyph library that cannot be turned into a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphLibraryError {
    /// The library contains no glyphs at all.
    Empty,
    /// A reference glyph has zero geometric extent.
    DegenerateGlyph { label: String },
    /// The containment relation could not be ordered; the listed glyphs
    /// depend on each other cyclically.
    CyclicDependencies { labels: Vec<String> },
}

impl fmt::Display for GlyphLibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "glyph library contains no glyphs"),
            Self::DegenerateGlyph { label } => {
                write!(f, "reference glyph {label:?} has zero extent")
            }
            Self::CyclicDependencies { labels } => {
                write!(f, "cyclic glyph dependencies among: {}", labels.join(", "))
            }
        }
    }
}

impl std::error::Error for GlyphLibraryError {}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One reference glyph, ready for matching.
#[derive(Debug, Clone)]
pub struct GlyphEntry {
    /// The text this glyph represents.
    pub label: String,
    /// The reference geometry.
    pub path: Arc<VectorPath>,
    /// Shape-ambiguous glyphs to reconsider after this one matches,
    /// in library order.
    pub alternatives: Vec<(String, Arc<VectorPath>)>,
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// The relation between two glyphs with different labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// No geometric containment either way.
    Unrelated,
    /// `container` starts with `contained` and must be tried first.
    Dependency { container: usize, contained: usize },
    /// Both start with each other at (almost) the same orientation:
    /// true ambiguity, resolved at decode time.
    Alternative,
}

// ---------------------------------------------------------------------------
// GlyphDatabase
// ---------------------------------------------------------------------------

/// The prefix-signature-keyed lookup structure used by the text decoder.
///
/// Built once per reference library; read-only afterwards, so it can be
/// shared by decoders working on different documents in parallel.
#[derive(Debug)]
pub struct GlyphDatabase {
    buckets: HashMap<String, Vec<GlyphEntry>>,
    space_width: Scalar,
    glyph_count: usize,
}

impl GlyphDatabase {
    /// Build the database from labeled glyphs.
    ///
    /// `params` is the matching context used to discover containment and
    /// ambiguity between reference glyphs; `angle_tolerance_deg` bounds the
    /// rotation under which a mutual match still counts as an ambiguity
    /// rather than two distinct orientations.
    pub fn build(
        glyphs: Vec<(String, VectorPath)>,
        params: &MatchParams,
        angle_tolerance_deg: Scalar,
    ) -> Result<Self, GlyphLibraryError> {
        if glyphs.is_empty() {
            return Err(GlyphLibraryError::Empty);
        }
        let glyphs: Vec<(String, Arc<VectorPath>)> = glyphs
            .into_iter()
            .map(|(label, path)| (label, Arc::new(path)))
            .collect();

        for (label, path) in &glyphs {
            if path.points().is_empty() || path.reference_distance(path.most_distant_index()) == 0.0
            {
                return Err(GlyphLibraryError::DegenerateGlyph {
                    label: label.clone(),
                });
            }
        }

        let count = glyphs.len();
        let mut dependencies: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];
        let mut alternatives: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); count];

        for i in 0..count {
            for j in (i + 1)..count {
                if glyphs[i].0 == glyphs[j].0 {
                    continue;
                }
                match relate(&glyphs, i, j, params, angle_tolerance_deg)? {
                    Relation::Unrelated => {}
                    Relation::Dependency {
                        container,
                        contained,
                    } => {
                        // The contained glyph waits for its container.
                        dependencies[contained].insert(container);
                    }
                    Relation::Alternative => {
                        alternatives[i].insert(j);
                        alternatives[j].insert(i);
                    }
                }
            }
        }

        let order = layered_topological_sort(&dependencies).map_err(|cycle| {
            GlyphLibraryError::CyclicDependencies {
                labels: cycle.into_iter().map(|i| glyphs[i].0.clone()).collect(),
            }
        })?;

        let mut buckets: HashMap<String, Vec<GlyphEntry>> = HashMap::new();
        for index in order {
            let (label, path) = &glyphs[index];
            let entry = GlyphEntry {
                label: label.clone(),
                path: Arc::clone(path),
                alternatives: alternatives[index]
                    .iter()
                    .map(|&a| (glyphs[a].0.clone(), Arc::clone(&glyphs[a].1)))
                    .collect(),
            };
            buckets
                .entry(path.prefix_signature())
                .or_default()
                .push(entry);
        }

        // The width of a space, estimated as half the mean glyph extent
        // along the horizontal.
        #[allow(clippy::cast_precision_loss)]
        let mean_width = glyphs
            .iter()
            .map(|(_, path)| extent_along(0.0, path.points()))
            .sum::<Scalar>()
            / count as Scalar;

        Ok(Self {
            buckets,
            space_width: mean_width / 2.0,
            glyph_count: count,
        })
    }

    /// The candidate entries for a prefix signature, in priority order.
    #[must_use]
    pub fn bucket(&self, signature: &str) -> Option<&[GlyphEntry]> {
        self.buckets.get(signature).map(Vec::as_slice)
    }

    /// The inter-glyph gap beyond which the decoder emits a space.
    #[must_use]
    pub const fn space_width(&self) -> Scalar {
        self.space_width
    }

    /// Number of reference glyphs.
    #[must_use]
    pub const fn glyph_count(&self) -> usize {
        self.glyph_count
    }
}

/// Classify the relation between glyphs `i` and `j`.
fn relate(
    glyphs: &[(String, Arc<VectorPath>)],
    i: usize,
    j: usize,
    params: &MatchParams,
    angle_tolerance_deg: Scalar,
) -> Result<Relation, GlyphLibraryError> {
    let degenerate = |reference: usize| {
        move |_: MatchError| GlyphLibraryError::DegenerateGlyph {
            label: glyphs[reference].0.clone(),
        }
    };
    let i_starts_with_j = glyphs[i]
        .1
        .starts_with(&glyphs[j].1, params)
        .map_err(degenerate(j))?;
    let j_starts_with_i = glyphs[j]
        .1
        .starts_with(&glyphs[i].1, params)
        .map_err(degenerate(i))?;

    Ok(match (i_starts_with_j, j_starts_with_i) {
        (Some(angle), Some(_)) => {
            if angle.to_degrees().abs() < angle_tolerance_deg {
                Relation::Alternative
            } else {
                // Same shape at a different orientation (`u` is an upside
                // down `n`); the decoder's angle checks tell them apart.
                Relation::Unrelated
            }
        }
        (Some(_), None) => Relation::Dependency {
            container: i,
            contained: j,
        },
        (None, Some(_)) => Relation::Dependency {
            container: j,
            contained: i,
        },
        (None, None) => Relation::Unrelated,
    })
}

/// Layered topological sort over dependency sets.
///
/// Items with no unresolved dependency are emitted in index order, layer
/// by layer. A leftover non-empty remainder is returned as the cycle.
fn layered_topological_sort(dependencies: &[BTreeSet<usize>]) -> Result<Vec<usize>, Vec<usize>> {
    let mut remaining: BTreeMap<usize, BTreeSet<usize>> = dependencies
        .iter()
        .enumerate()
        .map(|(i, deps)| {
            let mut deps = deps.clone();
            deps.remove(&i);
            (i, deps)
        })
        .collect();
    let mut order = Vec::with_capacity(dependencies.len());

    while !remaining.is_empty() {
        let layer: Vec<usize> = remaining
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(&i, _)| i)
            .collect();
        if layer.is_empty() {
            return Err(remaining.into_keys().collect());
        }
        for &i in &layer {
            remaining.remove(&i);
        }
        for deps in remaining.values_mut() {
            for &i in &layer {
                deps.remove(&i);
            }
        }
        order.extend(layer);
    }

    Ok(order)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
