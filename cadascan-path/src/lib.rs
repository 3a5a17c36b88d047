//! Vector path model and canonical shape matching for cadastre drawings.
//!
//! French cadastre exports carry no structured metadata: every parcel
//! boundary, building outline and label character arrives as an anonymous
//! drawing primitive. This crate provides the pieces every recognizer is
//! built on:
//!
//! - [`types`]: scalar and command types shared across the system
//! - [`style`]: the typed drawing-style model parsed from `key:value;...`
//!   attributes
//! - [`parser`]: tokenizer and parser for the path mini-language
//!   (`M L H V C S Q T Z` and relative forms)
//! - [`path`]: the [`VectorPath`](path::VectorPath) model — commands plus
//!   absolute points
//! - [`matching`]: translation/rotation/scale-invariant prefix matching
//! - [`bbox`]: axis-aligned bounding boxes over point sets
//! - [`math`]: angular projection helpers
//! - [`transform`]: point transforms into the target map coordinate space

pub mod bbox;
pub mod math;
pub mod matching;
pub mod parser;
pub mod path;
pub mod style;
pub mod transform;
pub mod types;

pub use bbox::BoundingBox;
pub use matching::{MatchError, MatchParams};
pub use parser::{parse_path_data, PathError};
pub use path::VectorPath;
pub use style::Style;
pub use transform::{IdentityTransform, LinearTransform, PointTransform};
pub use types::{Command, Point, Scalar};
