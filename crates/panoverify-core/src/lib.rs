//! Core types for the pano-projector regression harness.
//!
//! This crate provides the pure addressing layer shared by every check:
//! - Cube face identifiers and their fixed iteration order
//! - Pyramid tile addresses and the per-level tile grid
//! - Relative path derivation for face and tile outputs
//! - Common error types
//!
//! Nothing here touches the filesystem; every path is derived from its
//! inputs alone.

pub mod address;
pub mod error;
pub mod face;
pub mod layout;

pub use address::{face_path, face_relative_path, tile_path, tiles_per_axis, PyramidAddress};
pub use error::{Error, Result};
pub use face::FaceId;
pub use layout::PyramidLayout;

/// Harness-wide constants.
pub mod constants {
    /// File extension of every image the tool writes.
    pub const IMAGE_EXTENSION: &str = "jpg";
    /// Number of pyramid levels the golden set covers.
    pub const DEFAULT_LEVELS: u32 = 2;
    /// Tile size passed to the tool in pyramid mode.
    pub const DEFAULT_TILE_SIZE: u32 = 128;
    /// Deepest level the address scheme accepts (2^15 tiles per axis).
    pub const MAX_LEVEL: u32 = 16;
}
