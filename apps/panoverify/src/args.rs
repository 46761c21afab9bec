//! Command line parsing.

use std::path::PathBuf;

use panoverify_core::constants::{DEFAULT_LEVELS, DEFAULT_TILE_SIZE, MAX_LEVEL};
use panoverify_core::{FaceId, PyramidLayout};
use panoverify_test::HarnessConfig;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgsError {
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("invalid value \"{value}\" for {flag}: {reason}")]
    InvalidValue {
        flag: String,
        value: String,
        reason: String,
    },
    #[error("unknown option {0}")]
    UnknownOption(String),
    #[error("expected <SOURCE_DIR> and <BIN_DIR>, got {0} positional argument(s)")]
    Positionals(usize),
    #[error("{0} requires {1}")]
    Requires(&'static str, &'static str),
}

/// How the pyramid level count is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Levels {
    Fixed(u32),
    /// Derived from the cube size, as the tool does.
    Auto,
}

/// What the command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub source_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub executable: Option<PathBuf>,
    pub tile_size: u32,
    pub levels: u32,
    pub faces: Vec<FaceId>,
}

impl Args {
    /// Harness configuration for these arguments.
    pub fn config(&self) -> panoverify_test::Result<HarnessConfig> {
        let mut config = HarnessConfig::new()
            .with_tile_size(self.tile_size)
            .with_faces_and_levels(self.faces.iter().copied(), self.levels)?;
        if let Some(exe) = &self.executable {
            config = config.with_executable(exe);
        }
        Ok(config)
    }
}

fn invalid(flag: &str, value: &str, reason: impl std::fmt::Display) -> ArgsError {
    ArgsError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive(flag: &str, value: &str) -> Result<u32, ArgsError> {
    match value.parse::<u32>() {
        Ok(0) => Err(invalid(flag, value, "must be positive")),
        Ok(n) => Ok(n),
        Err(e) => Err(invalid(flag, value, e)),
    }
}

fn parse_levels(flag: &str, value: &str) -> Result<Levels, ArgsError> {
    if value == "auto" {
        return Ok(Levels::Auto);
    }
    let levels = parse_positive(flag, value)?;
    check_level_range(flag, value, levels)?;
    Ok(Levels::Fixed(levels))
}

fn check_level_range(flag: &str, value: &str, levels: u32) -> Result<(), ArgsError> {
    if levels > MAX_LEVEL {
        return Err(invalid(flag, value, format!("must be in 1..={MAX_LEVEL}")));
    }
    Ok(())
}

/// Parse faces from a list like "b,left,2".
fn parse_faces(flag: &str, value: &str) -> Result<Vec<FaceId>, ArgsError> {
    let mut faces = Vec::new();
    for part in value.split(',') {
        let face: FaceId = part.parse().map_err(|e| invalid(flag, value, e))?;
        if !faces.contains(&face) {
            faces.push(face);
        }
    }
    Ok(faces)
}

/// Parse a full argument vector, program name first.
///
/// Options take their value either as the next argument or after `=`.
pub fn parse_args(args: &[String]) -> Result<Command, ArgsError> {
    let mut positionals = Vec::new();
    let mut executable = None;
    let mut tile_size = DEFAULT_TILE_SIZE;
    let mut levels = Levels::Fixed(DEFAULT_LEVELS);
    let mut cube_size = None;
    let mut faces = FaceId::ALL.to_vec();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if !arg.starts_with('-') || arg == "-" {
            positionals.push(PathBuf::from(arg));
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_string())),
            None => (arg.as_str(), None),
        };
        let mut value = || {
            inline
                .clone()
                .or_else(|| iter.next().cloned())
                .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
        };

        match flag {
            "-h" | "--help" => return Ok(Command::Help),
            "--exe" => executable = Some(PathBuf::from(value()?)),
            "--tile-size" => tile_size = parse_positive(flag, &value()?)?,
            "--levels" => levels = parse_levels(flag, &value()?)?,
            "--cube-size" => cube_size = Some(parse_positive(flag, &value()?)?),
            "--faces" => faces = parse_faces(flag, &value()?)?,
            _ => return Err(ArgsError::UnknownOption(arg.clone())),
        }
    }

    let [source_dir, bin_dir]: [PathBuf; 2] = positionals
        .try_into()
        .map_err(|p: Vec<PathBuf>| ArgsError::Positionals(p.len()))?;

    let levels = match (levels, cube_size) {
        (Levels::Fixed(levels), None) => levels,
        (Levels::Fixed(_), Some(_)) => {
            return Err(ArgsError::Requires("--cube-size", "--levels auto"));
        }
        (Levels::Auto, None) => {
            return Err(ArgsError::Requires("--levels auto", "--cube-size"));
        }
        (Levels::Auto, Some(cube)) => {
            let levels = PyramidLayout::levels_for(cube, tile_size);
            check_level_range("--cube-size", &cube.to_string(), levels)?;
            levels
        }
    };

    Ok(Command::Run(Args {
        source_dir,
        bin_dir,
        executable,
        tile_size,
        levels,
        faces,
    }))
}
