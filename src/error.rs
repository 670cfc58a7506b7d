//! Error type shared by every stage of huffzip.
//!
//! Generic stream functions report I/O failures without a path, since they only see a
//! `Read` or `Write`. The file-level functions fill the path in with [`Error::locate`]
//! before the error reaches the caller.

use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

use crate::tools::freq_count::Symbol;

/// The operation that was underway when an I/O error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Create,
    Read,
    Write,
}

impl Display for IoOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let verb = match self {
            IoOp::Open => "open",
            IoOp::Create => "create",
            IoOp::Read => "read",
            IoOp::Write => "write",
        };
        write!(f, "{}", verb)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem or stream failure.
    #[error("could not {op} {}: {source}", display_path(.path))]
    Io {
        op: IoOp,
        path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },

    /// There were no symbols to build a tree from.
    #[error("input is empty")]
    EmptyInput,

    /// The container ended before the header or the payload was complete.
    #[error("compressed stream is truncated: {what} ended early")]
    TruncatedStream { what: &'static str },

    /// The container is readable but its contents make no sense.
    #[error("compressed stream is corrupt: {reason}")]
    CorruptStream { reason: String },

    /// The encoder met a symbol that has no code.
    #[error("no code for symbol {symbol:#06x}")]
    MissingCode { symbol: Symbol },

    /// A symbol count does not fit the container's 32-bit signed count field.
    #[error("symbol {symbol:#06x} occurs {count} times, more than the container can record")]
    CountOverflow { symbol: Symbol, count: u64 },

    /// A code would need more than 64 bits.
    #[error("huffman code of depth {depth} exceeds 64 bits")]
    CodeOverflow { depth: usize },

    /// Input and output resolve to the same file. Creating the output would truncate the
    /// input before it was read.
    #[error("{} is both the input and the output", .path.display())]
    SameFile { path: PathBuf },

    /// The source produced a different number of symbols on the encoding pass than on the
    /// counting pass.
    #[error("input changed while compressing: counted {expected} symbols, encoded {found}")]
    InputChanged { expected: u64, found: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "stream".to_string(),
    }
}

impl Error {
    /// Stream read failure, path unknown.
    pub fn read(source: io::Error) -> Self {
        Error::Io {
            op: IoOp::Read,
            path: None,
            source,
        }
    }

    /// Stream write failure, path unknown.
    pub fn write(source: io::Error) -> Self {
        Error::Io {
            op: IoOp::Write,
            path: None,
            source,
        }
    }

    /// Failure tied to a known file.
    pub fn at(op: IoOp, path: &Path, source: io::Error) -> Self {
        Error::Io {
            op,
            path: Some(path.to_path_buf()),
            source,
        }
    }

    pub fn corrupt<S: Into<String>>(reason: S) -> Self {
        Error::CorruptStream {
            reason: reason.into(),
        }
    }

    /// Attach a path to a stream error. Reads came from `src`, writes went to `dst`.
    /// Errors that already carry a path, and non-I/O errors, pass through unchanged.
    pub fn locate(self, src: &Path, dst: &Path) -> Self {
        match self {
            Error::Io {
                op,
                path: None,
                source,
            } => {
                let path = match op {
                    IoOp::Open | IoOp::Read => src,
                    IoOp::Create | IoOp::Write => dst,
                };
                Error::at(op, path, source)
            }
            other => other,
        }
    }
}
