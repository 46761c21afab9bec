//! Byte-exact file comparison.
//!
//! The oracle fails closed: a file that is missing or cannot be read never
//! compares equal, and never aborts the run.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const CHUNK_SIZE: usize = 64 * 1024;

/// Outcome of comparing a produced file against its golden counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Same length, same bytes.
    Identical,
    /// Lengths differ.
    LengthDiffers { actual: u64, expected: u64 },
    /// Same length, first difference at `offset`.
    ContentDiffers { offset: u64 },
    /// Produced file missing or unreadable.
    ActualUnreadable(String),
    /// Golden file missing or unreadable.
    ExpectedUnreadable(String),
}

impl Comparison {
    #[inline]
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => write!(f, "identical"),
            Self::LengthDiffers { actual, expected } => {
                write!(f, "size {actual} bytes, expected {expected} bytes")
            }
            Self::ContentDiffers { offset } => write!(f, "content differs at byte {offset}"),
            Self::ActualUnreadable(e) => write!(f, "result unreadable: {e}"),
            Self::ExpectedUnreadable(e) => write!(f, "expected file unreadable: {e}"),
        }
    }
}

/// Compare two files byte for byte.
pub fn compare_files(actual: impl AsRef<Path>, expected: impl AsRef<Path>) -> Comparison {
    let (actual, expected) = (actual.as_ref(), expected.as_ref());

    let open = |path: &Path| -> io::Result<(File, u64)> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok((file, len))
    };
    let (mut a, a_len) = match open(actual) {
        Ok(v) => v,
        Err(e) => return Comparison::ActualUnreadable(format!("{}: {e}", actual.display())),
    };
    let (mut b, b_len) = match open(expected) {
        Ok(v) => v,
        Err(e) => return Comparison::ExpectedUnreadable(format!("{}: {e}", expected.display())),
    };

    if a_len != b_len {
        return Comparison::LengthDiffers {
            actual: a_len,
            expected: b_len,
        };
    }

    let mut buf_a = vec![0u8; CHUNK_SIZE];
    let mut buf_b = vec![0u8; CHUNK_SIZE];
    let mut offset = 0u64;
    loop {
        let n_a = match fill(&mut a, &mut buf_a) {
            Ok(n) => n,
            Err(e) => return Comparison::ActualUnreadable(format!("{}: {e}", actual.display())),
        };
        let n_b = match fill(&mut b, &mut buf_b) {
            Ok(n) => n,
            Err(e) => {
                return Comparison::ExpectedUnreadable(format!("{}: {e}", expected.display()))
            }
        };

        let common = n_a.min(n_b);
        if let Some(i) = buf_a[..common]
            .iter()
            .zip(&buf_b[..common])
            .position(|(x, y)| x != y)
        {
            return Comparison::ContentDiffers {
                offset: offset + i as u64,
            };
        }
        offset += common as u64;

        // A file changed size while we were reading it.
        if n_a != n_b {
            return Comparison::LengthDiffers {
                actual: offset + (n_a - common) as u64,
                expected: offset + (n_b - common) as u64,
            };
        }
        if n_a < CHUNK_SIZE {
            return Comparison::Identical;
        }
    }
}

/// `true` only if both files exist, are readable, and hold the same bytes.
pub fn files_equal(actual: impl AsRef<Path>, expected: impl AsRef<Path>) -> bool {
    compare_files(actual, expected).is_identical()
}

/// Read until `buf` is full or the reader is exhausted.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
