//! Classification of closed straight-segment polylines into map features.
//!
//! Cadastre drawings style every feature kind consistently: parcels are
//! thin black unfilled outlines, buildings are filled `#ffcc33`, water is
//! filled `#98c3d9`, and so on. A path is eligible when its command string
//! matches `(M L L* Z)+` — one or more rings of straight segments — and a
//! category's style predicate accepts its drawing style. Ring points are
//! mapped into target map coordinates *before* validation, because the
//! closure tolerance is expressed in meters.

use std::collections::BTreeMap;

use cadascan_path::style::Paint;
use cadascan_path::types::Command;
use cadascan_path::{Point, PointTransform, Scalar, Style, VectorPath};

use crate::claim::PathClaimer;

/// Maximum distance in map units (meters) between a ring's first and last
/// point for the ring to count as closed.
pub const RING_CLOSURE_TOLERANCE: Scalar = 0.5;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// The map feature kinds recognizable from drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureCategory {
    Parcel,
    Building,
    LightBuilding,
    Water,
    Riverbank,
    Limit,
}

impl FeatureCategory {
    /// Administrative limits are drawn as open polylines; everything else
    /// must form closed rings.
    #[must_use]
    pub const fn requires_closure(self) -> bool {
        !matches!(self, Self::Limit)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Parcel => "parcel",
            Self::Building => "building",
            Self::LightBuilding => "light building",
            Self::Water => "water",
            Self::Riverbank => "riverbank",
            Self::Limit => "limit",
        }
    }

    /// Whether a drawing style selects this category.
    #[must_use]
    pub fn style_matches(self, style: &Style) -> bool {
        match self {
            Self::Parcel => {
                style
                    .stroke_width
                    .is_some_and(|w| w > 0.7 && w < 0.8)
                    && style.fill == Some(Paint::None)
                    && style.stroke_is("#000000")
                    && style.stroke_opacity == Some(1.0)
                    && style.stroke_dasharray == Some(cadascan_path::style::Dash::None)
            }
            Self::Building => style.fill_is("#ffcc33"),
            Self::LightBuilding => style.fill_is("#ffe599"),
            Self::Water => style.fill_is("#98c3d9"),
            Self::Riverbank => style.fill_is("#1979ac"),
            Self::Limit => {
                style.fill == Some(Paint::None)
                    && style.stroke_is("#ffffff")
                    && style.stroke_opacity == Some(1.0)
                    && style.stroke_dasharray == Some(cadascan_path::style::Dash::None)
                    && style
                        .stroke_width
                        .is_some_and(|w| (w > 17.8 && w < 17.9) || (w > 8.4 && w < 8.6))
            }
        }
    }
}

impl std::fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Ring groups
// ---------------------------------------------------------------------------

/// A ring of already-mapped points (not explicitly closed).
pub type Ring = Vec<Point>;

/// One (multi-)polygon feature: an outer ring plus hole rings.
#[derive(Debug, Clone, PartialEq)]
pub struct RingGroup {
    pub outer: Ring,
    pub holes: Vec<Ring>,
}

// ---------------------------------------------------------------------------
// Eligibility grammar
// ---------------------------------------------------------------------------

/// Whether `commands` matches `(M L L* Z)+` — one or more closed rings made
/// only of line segments.
#[must_use]
pub fn is_closed_polyline(commands: &[Command]) -> bool {
    if commands.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < commands.len() {
        if commands[i] != Command::MoveTo {
            return false;
        }
        i += 1;
        let mut segments = 0;
        while i < commands.len() && commands[i] == Command::LineTo {
            segments += 1;
            i += 1;
        }
        if segments == 0 || i >= commands.len() || commands[i] != Command::Close {
            return false;
        }
        i += 1;
    }
    true
}

// ---------------------------------------------------------------------------
// FeatureRecognizer
// ---------------------------------------------------------------------------

/// Classifies eligible paths into an ordered list of categories and
/// accumulates ring groups per category for the lifetime of one document.
pub struct FeatureRecognizer {
    categories: Vec<FeatureCategory>,
    closure_tolerance: Scalar,
    collected: BTreeMap<FeatureCategory, Vec<RingGroup>>,
}

impl FeatureRecognizer {
    /// Recognizer for an explicit category list, tried in the given order.
    #[must_use]
    pub fn new(categories: Vec<FeatureCategory>) -> Self {
        let collected = categories.iter().map(|&c| (c, Vec::new())).collect();
        Self {
            categories,
            closure_tolerance: RING_CLOSURE_TOLERANCE,
            collected,
        }
    }

    /// Override the ring-closure tolerance (map units, default 0.5).
    #[must_use]
    pub const fn with_closure_tolerance(mut self, tolerance: Scalar) -> Self {
        self.closure_tolerance = tolerance;
        self
    }

    /// Parcels only.
    #[must_use]
    pub fn parcels() -> Self {
        Self::new(vec![FeatureCategory::Parcel])
    }

    /// Buildings (solid and light).
    #[must_use]
    pub fn buildings() -> Self {
        Self::new(vec![FeatureCategory::Building, FeatureCategory::LightBuilding])
    }

    /// Water bodies and riverbanks.
    #[must_use]
    pub fn water() -> Self {
        Self::new(vec![FeatureCategory::Water, FeatureCategory::Riverbank])
    }

    /// Administrative limits.
    #[must_use]
    pub fn limits() -> Self {
        Self::new(vec![FeatureCategory::Limit])
    }

    /// The combined set used for a full document pass: buildings, limits
    /// and water.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            FeatureCategory::Building,
            FeatureCategory::LightBuilding,
            FeatureCategory::Limit,
            FeatureCategory::Water,
            FeatureCategory::Riverbank,
        ])
    }

    /// Every category, parcels included.
    #[must_use]
    pub fn all() -> Self {
        Self::new(vec![
            FeatureCategory::Parcel,
            FeatureCategory::Building,
            FeatureCategory::LightBuilding,
            FeatureCategory::Limit,
            FeatureCategory::Water,
            FeatureCategory::Riverbank,
        ])
    }

    /// Classify one path, accumulating its ring group on success.
    pub fn recognize(
        &mut self,
        path: &VectorPath,
        transform: &dyn PointTransform,
    ) -> Option<FeatureCategory> {
        if path.style().is_empty() || !is_closed_polyline(path.commands()) {
            return None;
        }
        for &category in &self.categories {
            if !category.style_matches(path.style()) {
                continue;
            }
            let points = transform.apply_all(path.points());
            let closure_tolerance = category
                .requires_closure()
                .then_some(self.closure_tolerance);
            let Some(group) = split_rings(path.commands(), &points, closure_tolerance) else {
                log::debug!(
                    "{} styled path rejected: ring not closed within {} map units",
                    category,
                    self.closure_tolerance
                );
                continue;
            };
            self.collected
                .entry(category)
                .or_default()
                .push(group);
            return Some(category);
        }
        None
    }

    /// Ring groups accumulated for one category.
    #[must_use]
    pub fn rings(&self, category: FeatureCategory) -> &[RingGroup] {
        self.collected
            .get(&category)
            .map_or(&[], Vec::as_slice)
    }

    /// Hand off everything accumulated for this document.
    #[must_use]
    pub fn into_collected(self) -> BTreeMap<FeatureCategory, Vec<RingGroup>> {
        self.collected
    }
}

impl PathClaimer for FeatureRecognizer {
    fn try_claim(&mut self, path: &VectorPath, transform: &dyn PointTransform) -> bool {
        self.recognize(path, transform).is_some()
    }
}

/// Split mapped points into rings at each `Close`, validating closure when
/// a tolerance is given. Returns `None` if any ring fails closure — the
/// whole path is presumed to be an open polyline that matched the style by
/// accident.
fn split_rings(
    commands: &[Command],
    points: &[Point],
    closure_tolerance: Option<Scalar>,
) -> Option<RingGroup> {
    let mut rings: Vec<Ring> = Vec::new();
    let mut offset = 0;
    let mut ring_len = 0;
    for command in commands {
        match command {
            Command::Close => {
                let ring = &points[offset..offset + ring_len];
                if let Some(tolerance) = closure_tolerance {
                    let first = ring.first()?;
                    let last = ring.last()?;
                    if first.distance(*last) > tolerance {
                        return None;
                    }
                }
                rings.push(ring.to_vec());
                offset += ring_len;
                ring_len = 0;
            }
            _ => ring_len += command.arity(),
        }
    }
    let mut rings = rings.into_iter();
    let outer = rings.next()?;
    Some(RingGroup {
        outer,
        holes: rings.collect(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
