//! Run configuration and the resolved per-run context.

use std::env::consts::EXE_SUFFIX;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use panoverify_core::constants::DEFAULT_TILE_SIZE;
use panoverify_core::{FaceId, PyramidLayout};
use tracing::info;

use crate::{HarnessError, Result};

/// Harness configuration.
///
/// Paths are relative to the source tree (`input_image`, `expected_dir`)
/// or the build tree (`executable`, `result_dir`). An absolute path is used
/// as is.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Projector executable, relative to the build tree.
    pub executable: PathBuf,
    /// Equirectangular input image, relative to the source tree.
    pub input_image: PathBuf,
    /// Golden outputs, relative to the source tree.
    pub expected_dir: PathBuf,
    /// Scratch directory, relative to the build tree.
    pub result_dir: PathBuf,
    /// Tile size passed in pyramid mode.
    pub tile_size: u32,
    /// Faces and levels to check.
    pub layout: PyramidLayout,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            executable: Path::new("src").join(format!("pano-projector{EXE_SUFFIX}")),
            input_image: Path::new("tests/data/input").join("bass.jpg"),
            expected_dir: PathBuf::from("tests/data/expected"),
            result_dir: PathBuf::from("test-result"),
            tile_size: DEFAULT_TILE_SIZE,
            layout: PyramidLayout::default(),
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the projector executable.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Set the pyramid tile size.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the faces and levels to check.
    pub fn with_layout(mut self, layout: PyramidLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Restrict checks to `faces` and validate `levels` pyramid levels.
    pub fn with_faces_and_levels(
        self,
        faces: impl IntoIterator<Item = FaceId>,
        levels: u32,
    ) -> Result<Self> {
        let layout = PyramidLayout::new(faces, levels)?;
        Ok(self.with_layout(layout))
    }

    /// Resolve against a source tree and a build tree.
    pub fn resolve(
        &self,
        source_dir: impl AsRef<Path>,
        bin_dir: impl AsRef<Path>,
    ) -> Result<TestContext> {
        if self.tile_size == 0 {
            return Err(HarnessError::Config("tile size must be positive".into()));
        }
        let source_dir = source_dir.as_ref();
        let bin_dir = bin_dir.as_ref();
        Ok(TestContext {
            source_dir: source_dir.to_path_buf(),
            bin_dir: bin_dir.to_path_buf(),
            result_dir: bin_dir.join(&self.result_dir),
            executable: bin_dir.join(&self.executable),
            input_image: source_dir.join(&self.input_image),
            expected_dir: source_dir.join(&self.expected_dir),
            tile_size: self.tile_size,
            layout: self.layout.clone(),
        })
    }
}

/// Everything one run needs, passed explicitly to every check.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub source_dir: PathBuf,
    pub bin_dir: PathBuf,
    /// Recreated empty at the start of every run.
    pub result_dir: PathBuf,
    pub executable: PathBuf,
    pub input_image: PathBuf,
    pub expected_dir: PathBuf,
    pub tile_size: u32,
    pub layout: PyramidLayout,
}

impl TestContext {
    /// Faces checked in face mode, in check order.
    pub fn faces(&self) -> &[FaceId] {
        self.layout.faces()
    }

    /// Delete the scratch directory if present and create it empty.
    pub fn prepare_result_dir(&self) -> Result<()> {
        let path = &self.result_dir;
        let setup_err = |source| HarnessError::Setup {
            path: path.clone(),
            source,
        };

        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).map_err(setup_err)?,
            Ok(_) => fs::remove_file(path).map_err(setup_err)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(setup_err(e)),
        }
        fs::create_dir_all(path).map_err(setup_err)?;

        info!("Scratch directory ready: {}", path.display());
        Ok(())
    }
}
