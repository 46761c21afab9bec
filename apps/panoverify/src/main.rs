//! pano-projector regression runner
//!
//! Runs the projector in face mode for every cube face and once in pyramid
//! mode, then compares each output byte for byte against the golden files
//! in the source tree.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p panoverify -- [OPTIONS] <SOURCE_DIR> <BIN_DIR>
//! ```
//!
//! Exits 0 when every check passes, 1 when any check fails or the scratch
//! directory cannot be prepared, and 2 on a usage error.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod args;

use std::process::ExitCode;

use anyhow::Context;
use panoverify_test::{Harness, SystemRunner};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::{parse_args, Command};

fn main() -> anyhow::Result<ExitCode> {
    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_help();
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => return Ok(usage_error(&e)),
    };
    let config = match args.config() {
        Ok(config) => config,
        Err(e) => return Ok(usage_error(&e)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = config
        .resolve(&args.source_dir, &args.bin_dir)
        .context("invalid harness configuration")?;
    info!("Testing {}", ctx.executable.display());

    let mut harness = Harness::new(ctx, SystemRunner);
    let report = harness.run().context("setup failed")?;

    println!("{report}");
    Ok(ExitCode::from(report.exit_code()))
}

fn usage_error(e: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("error: {e}\n");
    eprintln!("Run with --help for usage.");
    ExitCode::from(2)
}

fn print_help() {
    eprintln!(
        "pano-projector regression runner

USAGE:
    panoverify [OPTIONS] <SOURCE_DIR> <BIN_DIR>

ARGUMENTS:
    <SOURCE_DIR>            Source tree with tests/data/input/bass.jpg and
                            golden outputs under tests/data/expected
    <BIN_DIR>               Build tree with src/pano-projector; results are
                            written to <BIN_DIR>/test-result

OPTIONS:
    --exe <PATH>            Projector executable (default: <BIN_DIR>/src/pano-projector)
    --tile-size <N>         Pyramid tile size in pixels (default: 128)
    --levels <N|auto>       Pyramid levels to compare, 1 to 16 (default: 2)
    --cube-size <N>         Cube face size in pixels; with --levels auto, compare
                            as many levels as the projector generates
    --faces <LIST>          Faces to check, e.g. \"b,l,front,3\" (default: all six)
    -h, --help              Print this help message

EXIT STATUS:
    0                       Every check passed
    1                       A check failed, or the scratch directory could not be prepared
    2                       Invalid command line

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log level (e.g., info, debug, trace)"
    );
}
