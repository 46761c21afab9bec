//! The harness driver.
//!
//! A run has three phases, in order and exactly once each:
//!
//! ```text
//! Setup ──> Execute ──> Report
//!  │          │            │
//!  │          │            └─ one status line per check
//!  │          └─ face checks in face order, then the pyramid check
//!  └─ recreate the scratch directory (the only fatal step)
//! ```

use std::fmt;

use tracing::info;

use crate::check::{check_face, check_pyramid, CheckLabel, CheckResult};
use crate::context::TestContext;
use crate::process::ToolRunner;
use crate::Result;

/// Drives every check against one tool runner.
pub struct Harness<R> {
    ctx: TestContext,
    runner: R,
}

impl<R: ToolRunner> Harness<R> {
    pub fn new(ctx: TestContext, runner: R) -> Self {
        Self { ctx, runner }
    }

    pub fn context(&self) -> &TestContext {
        &self.ctx
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Run all checks.
    ///
    /// Only a failure to prepare the scratch directory is returned as an
    /// error; every check failure is recorded in the report instead.
    pub fn run(&mut self) -> Result<Report> {
        info!("Preparing {}", self.ctx.result_dir.display());
        self.ctx.prepare_result_dir()?;

        let mut results = Vec::with_capacity(self.ctx.faces().len() + 1);
        for &face in self.ctx.faces() {
            results.push(check_face(&self.ctx, &mut self.runner, face));
        }
        results.push(check_pyramid(&self.ctx, &mut self.runner));

        let report = Report::new(results);
        info!("{}", report.summary());
        Ok(report)
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    results: Vec<CheckResult>,
}

impl Report {
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn get(&self, label: CheckLabel) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.label == label)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    /// `true` iff every check passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    /// Process exit status: 0 if every check passed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} of {} checks passed",
            self.passed_count(),
            self.results.len()
        )
    }
}

impl fmt::Display for Report {
    /// One status line per check, each failure followed by its details.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let status = if result.passed() { "OK" } else { "FAILED" };
            write!(f, "{}: {status}", result.label)?;
            for detail in result.details() {
                write!(f, "\n    {detail}")?;
            }
        }
        Ok(())
    }
}
