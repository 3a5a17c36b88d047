//! Tokenizer and parser for the path mini-language.
//!
//! Cadastre drawings describe geometry with a subset of the SVG path data
//! language: `M L H V C S Q T Z` and their lower-case relative forms.
//! The parser rewrites everything down to the five canonical commands of
//! [`Command`] with absolute coordinates:
//!
//! | Input               | Canonical form                                  |
//! |---------------------|-------------------------------------------------|
//! | `M`, `L` (and `m`, `l`) | `MoveTo` / `LineTo`                         |
//! | `H`, `V` (and `h`, `v`) | `LineTo`, reusing the other coordinate      |
//! | `C`, `S` (and `c`, `s`) | `CurveTo`, `S` with a reflected control     |
//! | `Q`, `T` (and `q`, `t`) | `QuadTo`, `T` with a reflected control      |
//! | `Z`, `z`            | `Close`                                         |
//! | `A`, `a`            | rejected: [`PathError::UnsupportedCommand`]     |
//!
//! A command letter repeats implicitly while coordinate groups follow it;
//! repeated `M` groups continue as `LineTo`. Numbers are signed decimals
//! with an optional exponent, separated by whitespace or commas — or by
//! nothing at all when the next number starts with a sign or a dot.

use std::fmt;

use crate::path::VectorPath;
use crate::style::Style;
use crate::types::{Command, Point, Scalar};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An error produced while parsing path data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An elliptical arc command (`A`/`a`) was encountered; arcs never occur
    /// in cadastre exports and are not supported.
    UnsupportedCommand(char),
    /// A byte that is neither a separator, a number, nor a command letter.
    InvalidCharacter { byte: u8, offset: usize },
    /// A numeric token that does not form a valid number (e.g. a lone sign).
    MalformedNumber { offset: usize },
    /// The data ended in the middle of a coordinate group.
    UnexpectedEnd { command: char },
    /// A coordinate appeared with no command letter to consume it.
    ExpectedCommand,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCommand(c) => {
                write!(f, "unsupported path command `{c}` (elliptical arc)")
            }
            Self::InvalidCharacter { byte, offset } => {
                write!(f, "invalid character {byte:#04x} at offset {offset}")
            }
            Self::MalformedNumber { offset } => {
                write!(f, "malformed number at offset {offset}")
            }
            Self::UnexpectedEnd { command } => {
                write!(f, "path data ended inside a `{command}` coordinate group")
            }
            Self::ExpectedCommand => write!(f, "coordinate without a preceding command"),
        }
    }
}

impl std::error::Error for PathError {}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathToken {
    Number(Scalar),
    Letter(char),
}

fn is_separator(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b',')
}

fn is_number_start(c: u8) -> bool {
    c.is_ascii_digit() || matches!(c, b'.' | b'-' | b'+')
}

/// Split path data into numeric and command-letter tokens.
fn tokenize(data: &str) -> Result<Vec<PathToken>, PathError> {
    let bytes = data.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if is_separator(c) {
            i += 1;
        } else if is_number_start(c) {
            let start = i;
            if matches!(bytes[i], b'-' | b'+') {
                i += 1;
            }
            let mut seen_digits = false;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
                seen_digits = true;
            }
            // At most one decimal point per number; a second dot starts the
            // next token.
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                    seen_digits = true;
                }
            }
            if !seen_digits {
                return Err(PathError::MalformedNumber { offset: start });
            }
            if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
                let mark = i;
                i += 1;
                if i < bytes.len() && matches!(bytes[i], b'-' | b'+') {
                    i += 1;
                }
                let mut exponent_digits = false;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                    exponent_digits = true;
                }
                if !exponent_digits {
                    // Not an exponent after all; leave the `e` for the main
                    // loop to reject.
                    i = mark;
                }
            }
            let value = data[start..i]
                .parse()
                .map_err(|_| PathError::MalformedNumber { offset: start })?;
            tokens.push(PathToken::Number(value));
        } else if c.is_ascii_alphabetic() {
            tokens.push(PathToken::Letter(c as char));
            i += 1;
        } else {
            return Err(PathError::InvalidCharacter { byte: c, offset: i });
        }
    }

    Ok(tokens)
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct TokenStream {
    tokens: Vec<PathToken>,
    pos: usize,
}

impl TokenStream {
    fn next(&mut self) -> Option<PathToken> {
        let tok = self.tokens.get(self.pos).copied();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn next_is_number(&self) -> bool {
        matches!(self.tokens.get(self.pos), Some(PathToken::Number(_)))
    }

    fn number(&mut self, command: char) -> Result<Scalar, PathError> {
        match self.next() {
            Some(PathToken::Number(v)) => Ok(v),
            _ => Err(PathError::UnexpectedEnd { command }),
        }
    }

    /// Read an `(x, y)` pair, absolute or relative to `current`.
    fn coordinate(
        &mut self,
        command: char,
        relative: bool,
        current: Point,
    ) -> Result<Point, PathError> {
        let x = self.number(command)?;
        let y = self.number(command)?;
        if relative {
            Ok(Point::new(current.x + x, current.y + y))
        } else {
            Ok(Point::new(x, y))
        }
    }
}

/// Parse path data into a [`VectorPath`] with no style.
///
/// See [`VectorPath::from_svg`] to attach a style attribute as well.
pub fn parse_path_data(data: &str) -> Result<VectorPath, PathError> {
    let mut stream = TokenStream {
        tokens: tokenize(data)?,
        pos: 0,
    };

    let mut commands: Vec<Command> = Vec::new();
    let mut points: Vec<Point> = Vec::new();
    let mut current = Point::ZERO;

    while let Some(token) = stream.next() {
        let letter = match token {
            PathToken::Letter(l) => l,
            PathToken::Number(_) => return Err(PathError::ExpectedCommand),
        };
        let relative = letter.is_ascii_lowercase();

        match letter.to_ascii_uppercase() {
            'M' | 'L' => {
                let mut command = if letter.to_ascii_uppercase() == 'M' {
                    Command::MoveTo
                } else {
                    Command::LineTo
                };
                loop {
                    let p = stream.coordinate(letter, relative, current)?;
                    points.push(p);
                    commands.push(command);
                    current = p;
                    if !stream.next_is_number() {
                        break;
                    }
                    // Implicit repetition of M continues as L.
                    command = Command::LineTo;
                }
            }
            'H' | 'V' => loop {
                let v = stream.number(letter)?;
                let p = match letter {
                    'H' => Point::new(v, current.y),
                    'h' => Point::new(current.x + v, current.y),
                    'V' => Point::new(current.x, v),
                    _ => Point::new(current.x, current.y + v),
                };
                points.push(p);
                commands.push(Command::LineTo);
                current = p;
                if !stream.next_is_number() {
                    break;
                }
            },
            'C' => loop {
                for _ in 0..3 {
                    points.push(stream.coordinate(letter, relative, current)?);
                }
                commands.push(Command::CurveTo);
                current = points[points.len() - 1];
                if !stream.next_is_number() {
                    break;
                }
            },
            'S' => loop {
                points.push(reflected_control(&commands, &points, Command::CurveTo, current));
                for _ in 0..2 {
                    points.push(stream.coordinate(letter, relative, current)?);
                }
                commands.push(Command::CurveTo);
                current = points[points.len() - 1];
                if !stream.next_is_number() {
                    break;
                }
            },
            'Q' => loop {
                for _ in 0..2 {
                    points.push(stream.coordinate(letter, relative, current)?);
                }
                commands.push(Command::QuadTo);
                current = points[points.len() - 1];
                if !stream.next_is_number() {
                    break;
                }
            },
            'T' => loop {
                points.push(reflected_control(&commands, &points, Command::QuadTo, current));
                points.push(stream.coordinate(letter, relative, current)?);
                commands.push(Command::QuadTo);
                current = points[points.len() - 1];
                if !stream.next_is_number() {
                    break;
                }
            },
            'Z' => commands.push(Command::Close),
            'A' => return Err(PathError::UnsupportedCommand(letter)),
            _ => {
                return Err(PathError::InvalidCharacter {
                    byte: letter as u8,
                    offset: 0,
                })
            }
        }
    }

    Ok(VectorPath::new(commands, points, Style::default()))
}

/// The implicit first control point of a smooth continuation (`S`/`T`):
/// the previous control point reflected across the current point — or the
/// current point itself when the previous command is not of the same family.
fn reflected_control(
    commands: &[Command],
    points: &[Point],
    family: Command,
    current: Point,
) -> Point {
    if commands.last() == Some(&family) {
        let previous_control = points[points.len() - 2];
        Point::new(
            2.0 * current.x - previous_control.x,
            2.0 * current.y - previous_control.y,
        )
    } else {
        current
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(d: &str) -> VectorPath {
        parse_path_data(d).expect("valid path data")
    }

    fn codes(path: &VectorPath) -> String {
        path.command_codes()
    }

    // -- tokenizer --

    #[test]
    fn unseparated_signed_numbers() {
        let path = parse("M1-2L-3.5-4");
        assert_eq!(codes(&path), "ML");
        assert_eq!(path.points()[0], Point::new(1.0, -2.0));
        assert_eq!(path.points()[1], Point::new(-3.5, -4.0));
    }

    #[test]
    fn second_dot_starts_a_new_number() {
        let path = parse("M1.5.5L0 0");
        assert_eq!(path.points()[0], Point::new(1.5, 0.5));
    }

    #[test]
    fn exponent_numbers() {
        let path = parse("M1e2 -2.5e-1");
        assert_relative_eq!(path.points()[0].x, 100.0);
        assert_relative_eq!(path.points()[0].y, -0.25);
    }

    #[test]
    fn lone_sign_is_malformed() {
        assert!(matches!(
            parse_path_data("M - 1"),
            Err(PathError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn invalid_character_rejected() {
        assert!(matches!(
            parse_path_data("M 0 0 # 1 1"),
            Err(PathError::InvalidCharacter { byte: b'#', .. })
        ));
    }

    // -- commands --

    #[test]
    fn simple_closed_polyline() {
        let path = parse("M 0 0 L 1 0 L 1 1 L 0 1 Z");
        assert_eq!(codes(&path), "MLLLZ");
        assert_eq!(path.points().len(), 4);
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let path = parse("M 0 0 1 0 1 1");
        assert_eq!(codes(&path), "MLL");
    }

    #[test]
    fn relative_commands_accumulate() {
        let path = parse("m 1 1 l 2 0 l 0 3");
        assert_eq!(codes(&path), "MLL");
        assert_eq!(path.points()[1], Point::new(3.0, 1.0));
        assert_eq!(path.points()[2], Point::new(3.0, 4.0));
    }

    #[test]
    fn horizontal_and_vertical_become_lineto() {
        let path = parse("M 1 2 H 5 V 7 h -1 v -2");
        assert_eq!(codes(&path), "MLLLL");
        assert_eq!(path.points()[1], Point::new(5.0, 2.0));
        assert_eq!(path.points()[2], Point::new(5.0, 7.0));
        assert_eq!(path.points()[3], Point::new(4.0, 7.0));
        assert_eq!(path.points()[4], Point::new(4.0, 5.0));
    }

    #[test]
    fn cubic_and_quadratic_arities() {
        let path = parse("M 0 0 C 1 1 2 1 3 0 Q 4 -1 5 0");
        assert_eq!(codes(&path), "MCQ");
        assert_eq!(path.points().len(), 1 + 3 + 2);
    }

    #[test]
    fn smooth_cubic_reflects_previous_control() {
        let path = parse("M 0 0 C 0 1 2 1 2 0 S 4 -1 4 0");
        assert_eq!(codes(&path), "MCC");
        // Control reflected across (2, 0) from (2, 1):
        assert_eq!(path.points()[4], Point::new(2.0, -1.0));
    }

    #[test]
    fn smooth_cubic_without_previous_cubic_uses_current_point() {
        let path = parse("M 1 1 S 2 2 3 1");
        assert_eq!(codes(&path), "MC");
        assert_eq!(path.points()[1], Point::new(1.0, 1.0));
    }

    #[test]
    fn smooth_quadratic_reflects_previous_control() {
        let path = parse("M 0 0 Q 1 2 2 0 T 4 0");
        assert_eq!(codes(&path), "MQQ");
        // Control reflected across (2, 0) from (1, 2):
        assert_eq!(path.points()[3], Point::new(3.0, -2.0));
    }

    #[test]
    fn implicit_repetition_of_cubic() {
        let path = parse("M 0 0 C 1 1 2 1 3 0 4 -1 5 -1 6 0");
        assert_eq!(codes(&path), "MCC");
        assert_eq!(path.points().len(), 7);
    }

    #[test]
    fn multiple_subpaths() {
        let path = parse("M 0 0 L 1 0 L 1 1 Z M 5 5 L 6 5 L 6 6 Z");
        assert_eq!(codes(&path), "MLLZMLLZ");
    }

    #[test]
    fn arc_is_unsupported() {
        assert_eq!(
            parse_path_data("M 0 0 A 1 1 0 0 0 2 2"),
            Err(PathError::UnsupportedCommand('A'))
        );
        assert_eq!(
            parse_path_data("M 0 0 a 1 1 0 0 0 2 2"),
            Err(PathError::UnsupportedCommand('a'))
        );
    }

    #[test]
    fn truncated_coordinate_group() {
        assert_eq!(
            parse_path_data("M 0 0 L 1"),
            Err(PathError::UnexpectedEnd { command: 'L' })
        );
    }

    #[test]
    fn leading_number_without_command() {
        assert_eq!(parse_path_data("0 0 L 1 1"), Err(PathError::ExpectedCommand));
    }

    #[test]
    fn empty_data_is_an_empty_path() {
        let path = parse("");
        assert!(path.commands().is_empty());
        assert!(path.points().is_empty());
    }

    // -- round-trip (serializer lives on VectorPath) --

    #[test]
    fn round_trip_preserves_absolute_points() {
        let source = "m 10 10 h 5 v 5 l -5 0 z M 0 0 C 1 1 2 1 3 0 S 5 -1 6 0 Q 7 1 8 0 T 10 0";
        let first = parse(source);
        let second = parse(&first.to_path_data());
        assert_eq!(first.command_codes(), second.command_codes());
        assert_eq!(first.points().len(), second.points().len());
        for (a, b) in first.points().iter().zip(second.points()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }
}
