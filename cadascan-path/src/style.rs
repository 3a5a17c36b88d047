//! Typed drawing-style model.
//!
//! Cadastre drawing primitives carry a semicolon-delimited attribute such as
//! `fill:none;stroke:#000000;stroke-width:0.76`. Recognizer predicates only
//! ever consult a small closed set of keys, so the attribute is parsed once
//! into typed fields; unknown keys are ignored and malformed numeric values
//! leave the field unset.

use crate::types::Scalar;

// ---------------------------------------------------------------------------
// Paint / Dash
// ---------------------------------------------------------------------------

/// A paint server reference: either explicitly absent or a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paint {
    /// `none` — the element is not painted.
    None,
    /// A color value, kept verbatim (e.g. `#ffcc33`).
    Color(String),
}

impl Paint {
    fn parse(value: &str) -> Self {
        if value == "none" {
            Self::None
        } else {
            Self::Color(value.to_owned())
        }
    }

    /// Returns `true` when this paint is the given color value.
    #[must_use]
    pub fn is_color(&self, color: &str) -> bool {
        matches!(self, Self::Color(c) if c == color)
    }
}

/// A stroke dash pattern: explicitly absent or an opaque pattern string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dash {
    /// `none` — a solid stroke.
    None,
    /// A dash pattern, kept verbatim.
    Pattern(String),
}

impl Dash {
    fn parse(value: &str) -> Self {
        if value == "none" {
            Self::None
        } else {
            Self::Pattern(value.to_owned())
        }
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// The parsed style of one drawing primitive.
///
/// Every field is `None` when the source attribute did not declare it (or
/// declared it with an unparsable value).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub stroke_width: Option<Scalar>,
    pub stroke_opacity: Option<Scalar>,
    pub fill_opacity: Option<Scalar>,
    pub stroke_dasharray: Option<Dash>,
}

impl Style {
    /// Parse a semicolon-delimited `key:value` attribute.
    ///
    /// Whitespace around keys and values is stripped; unknown keys are
    /// ignored.
    #[must_use]
    pub fn parse(attribute: &str) -> Self {
        let mut style = Self::default();
        for declaration in attribute.split(';') {
            let Some((key, value)) = declaration.split_once(':') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            match key {
                "fill" => style.fill = Some(Paint::parse(value)),
                "stroke" => style.stroke = Some(Paint::parse(value)),
                "stroke-width" => style.stroke_width = value.parse().ok(),
                "stroke-opacity" => style.stroke_opacity = value.parse().ok(),
                "fill-opacity" => style.fill_opacity = value.parse().ok(),
                "stroke-dasharray" => style.stroke_dasharray = Some(Dash::parse(value)),
                _ => {}
            }
        }
        style
    }

    /// Returns `true` when no known attribute was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` when the fill is the given color value.
    #[must_use]
    pub fn fill_is(&self, color: &str) -> bool {
        self.fill.as_ref().is_some_and(|p| p.is_color(color))
    }

    /// Returns `true` when the stroke is the given color value.
    #[must_use]
    pub fn stroke_is(&self, color: &str) -> bool {
        self.stroke.as_ref().is_some_and(|p| p.is_color(color))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_typical_parcel_style() {
        let s = Style::parse("fill:none;stroke:#000000;stroke-width:0.76;stroke-opacity:1;stroke-dasharray:none");
        assert_eq!(s.fill, Some(Paint::None));
        assert_eq!(s.stroke, Some(Paint::Color("#000000".into())));
        assert_eq!(s.stroke_width, Some(0.76));
        assert_eq!(s.stroke_opacity, Some(1.0));
        assert_eq!(s.stroke_dasharray, Some(Dash::None));
    }

    #[test]
    fn parse_building_fill() {
        let s = Style::parse("fill:#ffcc33");
        assert!(s.fill_is("#ffcc33"));
        assert!(!s.fill_is("#ffe599"));
        assert_eq!(s.stroke, None);
    }

    #[test]
    fn unknown_keys_ignored() {
        let s = Style::parse("fill:#ffcc33;fill-rule:nonzero;marker-end:none");
        assert!(s.fill_is("#ffcc33"));
        assert_eq!(s, Style::parse("fill:#ffcc33"));
    }

    #[test]
    fn malformed_number_leaves_field_unset() {
        let s = Style::parse("stroke-width:wide");
        assert_eq!(s.stroke_width, None);
    }

    #[test]
    fn whitespace_stripped() {
        let s = Style::parse(" fill : none ; stroke : #ffffff ");
        assert_eq!(s.fill, Some(Paint::None));
        assert!(s.stroke_is("#ffffff"));
    }

    #[test]
    fn empty_attribute() {
        assert!(Style::parse("").is_empty());
        assert!(!Style::parse("fill:none").is_empty());
    }

    #[test]
    fn dash_pattern_kept_verbatim() {
        let s = Style::parse("stroke-dasharray:2.1,0.7");
        assert_eq!(s.stroke_dasharray, Some(Dash::Pattern("2.1,0.7".into())));
    }
}
