//! Core types shared across the `Cadascan` system.

pub use kurbo::{Point, Vec2};

/// Convenience alias. Cadastre PDF coordinates are plain `f64` user-space
/// units until a [`PointTransform`](crate::transform::PointTransform)
/// maps them into meters.
pub type Scalar = f64;

/// Tolerance for floating-point comparisons.
pub const EPSILON: Scalar = 1e-9;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A path command in canonical (absolute) form.
///
/// The parser rewrites the full mini-language down to these five commands:
/// `H`/`V` become [`LineTo`](Command::LineTo), smooth continuations become
/// [`CurveTo`](Command::CurveTo)/[`QuadTo`](Command::QuadTo), and relative
/// forms are converted to absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveTo,
    LineTo,
    CurveTo,
    QuadTo,
    Close,
}

impl Command {
    /// Number of absolute points consumed from the point list.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::MoveTo | Self::LineTo => 1,
            Self::CurveTo => 3,
            Self::QuadTo => 2,
            Self::Close => 0,
        }
    }

    /// Single-letter code used in prefix signatures.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::MoveTo => 'M',
            Self::LineTo => 'L',
            Self::CurveTo => 'C',
            Self::QuadTo => 'Q',
            Self::Close => 'Z',
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
