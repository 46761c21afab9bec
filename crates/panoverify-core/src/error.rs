//! Error types for face and tile addressing.

use thiserror::Error;

use crate::constants::MAX_LEVEL;

/// Addressing error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Face name matched no letter, name or index.
    #[error("invalid face name \"{0}\", must be one of: b, l, f, r, u, d, back, left, front, right, top, bottom")]
    UnknownFace(String),

    /// Pyramid level outside `1..=MAX_LEVEL`.
    #[error("invalid pyramid level {0}, must be in 1..={max}", max = MAX_LEVEL)]
    InvalidLevel(u32),

    /// Tile coordinate outside the level's grid.
    #[error("tile ({x}, {y}) is outside the {per_axis}x{per_axis} grid of level {level}")]
    TileOutOfRange {
        level: u32,
        x: u32,
        y: u32,
        per_axis: u32,
    },

    /// Layout has nothing to enumerate.
    #[error("empty layout: {0}")]
    EmptyLayout(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
