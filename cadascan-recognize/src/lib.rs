//! Recognition engine for cadastre drawing primitives.
//!
//! A cadastre export is a stream of anonymous [`VectorPath`]s. This crate
//! decides what each one is:
//!
//! - [`features`]: closed straight-segment polylines classified by drawing
//!   style into map feature categories (parcels, buildings, water, limits)
//! - [`glyphs`]: the reference glyph database built once from a labeled
//!   glyph library
//! - [`decoder`]: the greedy text decoder matching an unknown path against
//!   the glyph database, one character at a time
//! - [`names`]: place/street/small-name and house-number recognizers built
//!   on the decoder
//! - [`claim`]: the chain-of-responsibility dispatch — the first recognizer
//!   to claim a path wins
//! - [`document`]: per-document scanning state (bounding-box detection and
//!   transform setup)
//!
//! [`VectorPath`]: cadascan_path::VectorPath

pub mod claim;
pub mod decoder;
pub mod document;
pub mod features;
pub mod glyphs;
pub mod names;

pub use claim::{Dispatcher, PathClaimer};
pub use decoder::{Recognition, TextDecoder};
pub use document::DocumentScanner;
pub use features::{FeatureCategory, FeatureRecognizer, RingGroup};
pub use glyphs::{GlyphDatabase, GlyphEntry, GlyphLibraryError};
pub use names::{HousenumberRecognizer, NameRecognizer, RecognizedText};
