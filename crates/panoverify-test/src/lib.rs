//! Golden-master regression harness for pano-projector.
//!
//! Runs the projector in face mode and pyramid mode, then compares every
//! output it is expected to write against checked-in golden files, byte
//! for byte.

pub mod check;
pub mod context;
pub mod harness;
pub mod oracle;
pub mod process;

pub use check::{
    check_face, check_pyramid, face_invocation, pyramid_invocation, CheckLabel, CheckOutcome,
    CheckResult, Mismatch,
};
pub use context::{HarnessConfig, TestContext};
pub use harness::{Harness, Report};
pub use oracle::{compare_files, files_equal, Comparison};
pub use process::{Invocation, ProcessOutcome, SystemRunner, ToolRunner};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("failed to prepare scratch directory {}: {source}", path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Addressing error: {0}")]
    Address(#[from] panoverify_core::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
