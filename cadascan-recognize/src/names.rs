//! Name and house-number recognizers built on the text decoder.
//!
//! A document carries several kinds of lettering, each drawn at its own
//! size: street names, place names (lieux-dits, always horizontal), the
//! smaller lettering of subdivisions, and house numbers. Each kind gets a
//! decoder with its own scale window; the small-name decoder reuses the
//! street-name database at a reduced scale rather than requiring a second
//! reference library.

use std::sync::Arc;

use cadascan_path::{MatchParams, Point, PointTransform, Scalar, VectorPath};

use crate::claim::PathClaimer;
use crate::decoder::{Recognition, TextDecoder};
use crate::glyphs::GlyphDatabase;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A recognized label with its position mapped into target coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    pub position: Point,
    pub angle: Scalar,
    /// Incomplete recognitions are kept for manual review.
    pub complete: bool,
}

impl RecognizedText {
    fn new(recognition: Recognition, transform: &dyn PointTransform) -> Self {
        Self {
            text: recognition.text,
            position: transform.apply(recognition.position),
            angle: recognition.angle,
            complete: recognition.complete,
        }
    }
}

// ---------------------------------------------------------------------------
// NameRecognizer
// ---------------------------------------------------------------------------

/// Scale window for street and place name glyphs.
const NAME_SCALE: (Scalar, Scalar) = (0.9, 1.1);
/// Scale window for the smaller subdivision lettering.
const SMALL_NAME_SCALE: (Scalar, Scalar) = (0.55, 0.69);
/// Scale window for house-number digits.
const HOUSENUMBER_SCALE: (Scalar, Scalar) = (0.8, 1.2);

/// Recognizes place names, street names and small names from one document.
pub struct NameRecognizer {
    place_decoder: TextDecoder,
    small_decoder: TextDecoder,
    street_decoder: TextDecoder,
    place_names: Vec<RecognizedText>,
    small_names: Vec<RecognizedText>,
    street_names: Vec<RecognizedText>,
}

impl NameRecognizer {
    /// The matching context for street and place name glyphs, also used
    /// when building their databases.
    #[must_use]
    pub fn name_match_params() -> MatchParams {
        MatchParams::default().with_scale_window(NAME_SCALE.0, NAME_SCALE.1)
    }

    /// Build the three decoders from the two reference libraries.
    ///
    /// The street-name database is shared with the small-name decoder,
    /// whose space width shrinks proportionally to its scale window.
    #[must_use]
    pub fn new(street_database: Arc<GlyphDatabase>, place_database: Arc<GlyphDatabase>) -> Self {
        let name_params = Self::name_match_params();
        let small_params =
            MatchParams::default().with_scale_window(SMALL_NAME_SCALE.0, SMALL_NAME_SCALE.1);

        let street_decoder = TextDecoder::new(Arc::clone(&street_database), name_params);
        let small_space_width = street_decoder.space_width()
            * (SMALL_NAME_SCALE.0 + SMALL_NAME_SCALE.1)
            / (NAME_SCALE.0 + NAME_SCALE.1);
        let small_decoder = TextDecoder::new(street_database, small_params)
            .with_space_width(small_space_width);
        let place_decoder = TextDecoder::new(place_database, name_params).force_horizontal(true);

        Self {
            place_decoder,
            small_decoder,
            street_decoder,
            place_names: Vec::new(),
            small_names: Vec::new(),
            street_names: Vec::new(),
        }
    }

    #[must_use]
    pub fn place_names(&self) -> &[RecognizedText] {
        &self.place_names
    }

    #[must_use]
    pub fn small_names(&self) -> &[RecognizedText] {
        &self.small_names
    }

    #[must_use]
    pub fn street_names(&self) -> &[RecognizedText] {
        &self.street_names
    }
}

impl PathClaimer for NameRecognizer {
    fn try_claim(&mut self, path: &VectorPath, transform: &dyn PointTransform) -> bool {
        let decoders = [
            (&self.place_decoder, &mut self.place_names),
            (&self.small_decoder, &mut self.small_names),
            (&self.street_decoder, &mut self.street_names),
        ];
        for (decoder, results) in decoders {
            let recognition = match decoder.recognize(path) {
                Ok(Some(recognition)) => recognition,
                Ok(None) => continue,
                Err(e) => {
                    log::warn!("name recognition failed: {e}");
                    continue;
                }
            };
            // Words starting with a digit belong to the house-number
            // recognizer, whatever library matched them.
            if recognition.text.starts_with(|c: char| c.is_ascii_digit()) {
                continue;
            }
            let recognized = RecognizedText::new(recognition, transform);
            let complete = recognized.complete;
            results.push(recognized);
            if complete {
                return true;
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// HousenumberRecognizer
// ---------------------------------------------------------------------------

/// Recognizes house numbers: black-filled digit paths whose first digit is
/// `1`–`9` (cadastre numbering never starts at 0).
pub struct HousenumberRecognizer {
    decoder: TextDecoder,
    numbers: Vec<RecognizedText>,
}

impl HousenumberRecognizer {
    /// The matching context for house-number digits, also used when
    /// building their database.
    #[must_use]
    pub fn match_params() -> MatchParams {
        MatchParams::default().with_scale_window(HOUSENUMBER_SCALE.0, HOUSENUMBER_SCALE.1)
    }

    #[must_use]
    pub fn new(database: Arc<GlyphDatabase>) -> Self {
        let decoder = TextDecoder::new(database, Self::match_params())
            .with_style_filter(|style| style.fill_is("#000000"));
        Self {
            decoder,
            numbers: Vec::new(),
        }
    }

    #[must_use]
    pub fn numbers(&self) -> &[RecognizedText] {
        &self.numbers
    }
}

impl PathClaimer for HousenumberRecognizer {
    fn try_claim(&mut self, path: &VectorPath, transform: &dyn PointTransform) -> bool {
        let recognition = match self.decoder.recognize(path) {
            Ok(Some(recognition)) => recognition,
            Ok(None) => return false,
            Err(e) => {
                log::warn!("house number recognition failed: {e}");
                return false;
            }
        };
        if !recognition.text.starts_with(|c: char| ('1'..='9').contains(&c)) {
            return false;
        }
        let recognized = RecognizedText::new(recognition, transform);
        let complete = recognized.complete;
        self.numbers.push(recognized);
        complete
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
