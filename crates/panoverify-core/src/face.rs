//! Cube face identifiers.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One of the six faces of a cubemap.
///
/// The declaration order is the iteration order used by both face-mode and
/// pyramid-mode checks: back, left, front, right, up, down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FaceId {
    Back,
    Left,
    Front,
    Right,
    Up,
    Down,
}

impl FaceId {
    /// All faces in fixed iteration order.
    pub const ALL: [Self; 6] = [
        Self::Back,
        Self::Left,
        Self::Front,
        Self::Right,
        Self::Up,
        Self::Down,
    ];

    /// Single-letter code used in file names and on the tool's command line.
    #[inline]
    #[must_use]
    pub const fn letter(self) -> &'static str {
        match self {
            Self::Back => "b",
            Self::Left => "l",
            Self::Front => "f",
            Self::Right => "r",
            Self::Up => "u",
            Self::Down => "d",
        }
    }

    /// Long name as accepted by the tool.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Left => "left",
            Self::Front => "front",
            Self::Right => "right",
            Self::Up => "top",
            Self::Down => "bottom",
        }
    }

    /// Position in [`FaceId::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for FaceId {
    type Err = Error;

    /// Accepts a letter (`b`), a long name (`back`) or an index (`0`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|face| s == face.letter() || s == face.name() || s == face.index().to_string())
            .ok_or_else(|| Error::UnknownFace(s.to_string()))
    }
}
