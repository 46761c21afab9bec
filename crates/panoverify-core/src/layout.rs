//! The enumerable pyramid address space.

use crate::address::{tiles_per_axis, PyramidAddress};
use crate::constants::{DEFAULT_LEVELS, MAX_LEVEL};
use crate::error::{Error, Result};
use crate::face::FaceId;

/// Which faces and levels a pyramid check walks.
///
/// Addresses are produced face-major, then by level, then `tile_x`, then
/// `tile_y`. Widening the check to more levels or fewer faces is a change
/// to this value only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidLayout {
    faces: Vec<FaceId>,
    levels: u32,
}

impl Default for PyramidLayout {
    fn default() -> Self {
        Self {
            faces: FaceId::ALL.to_vec(),
            levels: DEFAULT_LEVELS,
        }
    }
}

impl PyramidLayout {
    /// Create a layout over `faces` (in the given order) and levels `1..=levels`.
    pub fn new(faces: impl IntoIterator<Item = FaceId>, levels: u32) -> Result<Self> {
        let faces: Vec<FaceId> = faces.into_iter().collect();
        if faces.is_empty() {
            return Err(Error::EmptyLayout("no faces selected".to_string()));
        }
        if levels == 0 || levels > MAX_LEVEL {
            return Err(Error::InvalidLevel(levels));
        }
        Ok(Self { faces, levels })
    }

    /// Same faces, different level count.
    pub fn with_levels(self, levels: u32) -> Result<Self> {
        Self::new(self.faces, levels)
    }

    #[must_use]
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Number of levels, counting from 1.
    #[must_use]
    pub const fn level_count(&self) -> u32 {
        self.levels
    }

    /// Levels in ascending order.
    pub fn levels(&self) -> impl Iterator<Item = u32> {
        1..=self.levels
    }

    /// Tiles one face contributes at `level`.
    #[must_use]
    pub const fn tiles_at(level: u32) -> u64 {
        let n = tiles_per_axis(level) as u64;
        n * n
    }

    /// Total number of addresses [`Self::addresses`] yields.
    #[must_use]
    pub fn tile_count(&self) -> u64 {
        let per_face = self
            .levels()
            .map(Self::tiles_at)
            .fold(0_u64, u64::saturating_add);
        per_face.saturating_mul(self.faces.len() as u64)
    }

    /// Every tile address in the layout, in check order.
    pub fn addresses(&self) -> impl Iterator<Item = PyramidAddress> + '_ {
        self.faces.iter().flat_map(move |&face| {
            self.levels().flat_map(move |level| {
                let n = tiles_per_axis(level);
                (0..n).flat_map(move |x| {
                    (0..n).map(move |y| PyramidAddress::new_unchecked(face, level, x, y))
                })
            })
        })
    }

    /// Number of levels the tool generates for a cube of `cube_size`
    /// pixels cut into `tile_size` tiles, so that the last level is a
    /// single tile.
    #[must_use]
    pub const fn levels_for(cube_size: u32, tile_size: u32) -> u32 {
        if cube_size == 0 || tile_size == 0 {
            return 1;
        }
        let tiles_minus_one = (cube_size - 1) / tile_size;
        let mut levels = u32::BITS - tiles_minus_one.leading_zeros() + 1;
        // Rounding lets slightly larger cubes fit in a given number of levels.
        if levels >= 2 && cube_size >> (levels - 2) == tile_size {
            levels -= 1;
        }
        levels
    }
}
