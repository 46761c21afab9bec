//! Running the projector.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::info;

use crate::{HarnessError, Result};

/// A program and its argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Argument `index` as UTF-8, if present and valid.
    pub fn arg_str(&self, index: usize) -> Option<&str> {
        self.args.get(index).and_then(|a| a.to_str())
    }
}

impl fmt::Display for Invocation {
    /// Shell-like rendering; words containing whitespace are single-quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str));
        for (i, word) in words.enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let word = word.to_string_lossy();
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                write!(f, "'{word}'")?;
            } else {
                f.write_str(&word)?;
            }
        }
        Ok(())
    }
}

/// How a finished tool process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Exit code 0.
    Success,
    /// Non-zero exit code, or `None` if killed by a signal.
    Failed { code: Option<i32> },
}

impl ProcessOutcome {
    #[must_use]
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failed {
                code: status.code(),
            }
        }
    }

    /// Outcome for a raw exit code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failed { code: Some(code) }
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "exited successfully"),
            Self::Failed { code: Some(code) } => write!(f, "exited with return code {code}"),
            Self::Failed { code: None } => write!(f, "was terminated by a signal"),
        }
    }
}

/// Something that can run a tool invocation to completion.
///
/// A non-zero exit is an `Ok` outcome; `Err` is reserved for a tool that
/// could not be started at all.
pub trait ToolRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ProcessOutcome>;
}

/// Runs invocations as child processes, blocking until each exits.
///
/// The child inherits stdout and stderr so the tool's own diagnostics
/// appear inline with the harness output.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<ProcessOutcome> {
        info!("+ {invocation}");
        let status = Command::new(invocation.program())
            .args(invocation.arguments())
            .status()
            .map_err(|source| HarnessError::Launch {
                program: invocation.program().to_path_buf(),
                source,
            })?;
        Ok(ProcessOutcome::from_status(status))
    }
}
