//! Output addressing for face and pyramid modes.
//!
//! Both modes map a logical output to a path *relative* to some root. The
//! same relative suffix is joined onto the scratch directory to find what
//! the tool produced and onto the golden root to find what it should have
//! produced.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{IMAGE_EXTENSION, MAX_LEVEL};
use crate::error::{Error, Result};
use crate::face::FaceId;

/// Number of tiles along each axis at a pyramid level.
///
/// Level 1 is a single tile; every further level doubles the count.
#[inline]
#[must_use]
pub const fn tiles_per_axis(level: u32) -> u32 {
    debug_assert!(level >= 1 && level <= MAX_LEVEL);
    1 << (level - 1)
}

/// Address of one tile in a face pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PyramidAddress {
    face: FaceId,
    level: u32,
    tile_x: u32,
    tile_y: u32,
}

impl PyramidAddress {
    /// Create an address, checking the tile lies inside the level's grid.
    pub const fn new(face: FaceId, level: u32, tile_x: u32, tile_y: u32) -> Result<Self> {
        if level == 0 || level > MAX_LEVEL {
            return Err(Error::InvalidLevel(level));
        }
        let per_axis = tiles_per_axis(level);
        if tile_x >= per_axis || tile_y >= per_axis {
            return Err(Error::TileOutOfRange {
                level,
                x: tile_x,
                y: tile_y,
                per_axis,
            });
        }
        Ok(Self {
            face,
            level,
            tile_x,
            tile_y,
        })
    }

    /// Caller guarantees `tile_x`, `tile_y < tiles_per_axis(level)`.
    #[inline]
    pub(crate) const fn new_unchecked(face: FaceId, level: u32, tile_x: u32, tile_y: u32) -> Self {
        debug_assert!(tile_x < tiles_per_axis(level) && tile_y < tiles_per_axis(level));
        Self {
            face,
            level,
            tile_x,
            tile_y,
        }
    }

    #[inline]
    #[must_use]
    pub const fn face(self) -> FaceId {
        self.face
    }

    #[inline]
    #[must_use]
    pub const fn level(self) -> u32 {
        self.level
    }

    #[inline]
    #[must_use]
    pub const fn tile_x(self) -> u32 {
        self.tile_x
    }

    #[inline]
    #[must_use]
    pub const fn tile_y(self) -> u32 {
        self.tile_y
    }

    /// Path relative to a pyramid root: `<level>/<face><x>_<y>.jpg`.
    #[must_use]
    pub fn relative_path(self) -> PathBuf {
        Path::new(&self.level.to_string()).join(format!(
            "{}{}_{}.{IMAGE_EXTENSION}",
            self.face, self.tile_x, self.tile_y
        ))
    }
}

impl fmt::Display for PyramidAddress {
    /// Always `/`-separated, so diagnostics read the same on every platform.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}{}_{}.{IMAGE_EXTENSION}",
            self.level, self.face, self.tile_x, self.tile_y
        )
    }
}

/// Path of a face image relative to its root: `<face>.jpg`.
#[must_use]
pub fn face_relative_path(face: FaceId) -> PathBuf {
    PathBuf::from(format!("{face}.{IMAGE_EXTENSION}"))
}

/// Path of a single face image under `root`: `<root>/<face>.jpg`.
#[must_use]
pub fn face_path(root: impl AsRef<Path>, face: FaceId) -> PathBuf {
    root.as_ref().join(face_relative_path(face))
}

/// Path of a pyramid tile under `root`.
#[must_use]
pub fn tile_path(root: impl AsRef<Path>, address: PyramidAddress) -> PathBuf {
    root.as_ref().join(address.relative_path())
}
