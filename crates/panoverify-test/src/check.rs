//! Face-mode and pyramid-mode checks.
//!
//! Each check runs the tool exactly once. A failed run fails the check
//! without comparing anything; a successful run is followed by comparisons
//! of every expected output, and every mismatch is recorded.

use std::fmt;

use panoverify_core::{face_path, face_relative_path, tile_path, FaceId};
use tracing::{debug, info, warn};

use crate::context::TestContext;
use crate::oracle::{compare_files, Comparison};
use crate::process::{Invocation, ProcessOutcome, ToolRunner};

/// What a check covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckLabel {
    Face(FaceId),
    Pyramid,
}

impl fmt::Display for CheckLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Face(face) => write!(f, "Face {face}"),
            Self::Pyramid => write!(f, "Pyramid"),
        }
    }
}

/// One output that did not match its golden file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Output path relative to its root, e.g. `2/l1_0.jpg`.
    pub file: String,
    pub comparison: Comparison,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.file, self.comparison)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Passed,
    /// The tool ran and exited non-zero.
    ToolFailed(ProcessOutcome),
    /// The tool could not be started.
    LaunchFailed(String),
    /// The tool succeeded but one or more outputs differ.
    Mismatched(Vec<Mismatch>),
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub label: CheckLabel,
    pub outcome: CheckOutcome,
    /// File comparisons performed.
    pub comparisons: usize,
}

impl CheckResult {
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, CheckOutcome::Passed)
    }

    /// Mismatched outputs, empty unless the outcome is `Mismatched`.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        match &self.outcome {
            CheckOutcome::Mismatched(m) => m.as_slice(),
            _ => &[],
        }
    }

    /// Detail lines for the report.
    #[must_use]
    pub fn details(&self) -> Vec<String> {
        match &self.outcome {
            CheckOutcome::Passed => Vec::new(),
            CheckOutcome::ToolFailed(outcome) => vec![format!("pano-projector {outcome}")],
            CheckOutcome::LaunchFailed(e) => vec![e.clone()],
            CheckOutcome::Mismatched(mismatches) => mismatches
                .iter()
                .map(|m| format!("mismatch: {m}"))
                .collect(),
        }
    }
}

/// Run the tool and stop early if it did not succeed.
fn run_tool(
    runner: &mut dyn ToolRunner,
    label: CheckLabel,
    invocation: &Invocation,
) -> Option<CheckResult> {
    let outcome = match runner.run(invocation) {
        Ok(ProcessOutcome::Success) => return None,
        Ok(outcome) => {
            warn!("{label}: pano-projector {outcome}");
            CheckOutcome::ToolFailed(outcome)
        }
        Err(e) => {
            warn!("{label}: {e}");
            CheckOutcome::LaunchFailed(e.to_string())
        }
    };
    Some(CheckResult {
        label,
        outcome,
        comparisons: 0,
    })
}

/// Command line for extracting one face into the scratch directory.
#[must_use]
pub fn face_invocation(ctx: &TestContext, face: FaceId) -> Invocation {
    Invocation::new(&ctx.executable)
        .arg("face")
        .arg(format!("--face={face}"))
        .arg(&ctx.input_image)
        .arg(face_path(&ctx.result_dir, face))
}

/// Command line for building the full pyramid into the scratch directory.
#[must_use]
pub fn pyramid_invocation(ctx: &TestContext) -> Invocation {
    Invocation::new(&ctx.executable)
        .arg("pyramid")
        .arg(format!("--tile-size={}", ctx.tile_size))
        .arg(&ctx.input_image)
        .arg(&ctx.result_dir)
}

/// Extract one face and compare it with its golden image.
pub fn check_face(ctx: &TestContext, runner: &mut dyn ToolRunner, face: FaceId) -> CheckResult {
    let label = CheckLabel::Face(face);
    if let Some(failed) = run_tool(runner, label, &face_invocation(ctx, face)) {
        return failed;
    }

    let comparison = compare_files(
        face_path(&ctx.result_dir, face),
        face_path(&ctx.expected_dir, face),
    );
    let outcome = if comparison.is_identical() {
        CheckOutcome::Passed
    } else {
        warn!("File comparison mismatch in face {face}: {comparison}");
        CheckOutcome::Mismatched(vec![Mismatch {
            file: face_relative_path(face).display().to_string(),
            comparison,
        }])
    };
    CheckResult {
        label,
        outcome,
        comparisons: 1,
    }
}

/// Build the pyramid once and compare every tile in the layout.
///
/// Mismatches do not stop the walk.
pub fn check_pyramid(ctx: &TestContext, runner: &mut dyn ToolRunner) -> CheckResult {
    let label = CheckLabel::Pyramid;
    if let Some(failed) = run_tool(runner, label, &pyramid_invocation(ctx)) {
        return failed;
    }

    let mut mismatches = Vec::new();
    let mut comparisons = 0;
    for address in ctx.layout.addresses() {
        comparisons += 1;
        let comparison = compare_files(
            tile_path(&ctx.result_dir, address),
            tile_path(&ctx.expected_dir, address),
        );
        if comparison.is_identical() {
            debug!("{address}: identical");
        } else {
            warn!("File comparison mismatch in file {address}: {comparison}");
            mismatches.push(Mismatch {
                file: address.to_string(),
                comparison,
            });
        }
    }
    info!(
        "Pyramid: compared {comparisons} tiles, {} mismatched",
        mismatches.len()
    );

    let outcome = if mismatches.is_empty() {
        CheckOutcome::Passed
    } else {
        CheckOutcome::Mismatched(mismatches)
    };
    CheckResult {
        label,
        outcome,
        comparisons,
    }
}
