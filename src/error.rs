use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::Symbol;

/// What was being done to a file when an I/O error happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Read,
    Write,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoOp::Read => write!(f, "reading"),
            IoOp::Write => write!(f, "writing"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HuffmanError {
    #[error("I/O error while {op} `{}`", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("frequency table has no symbols to build a tree from")]
    EmptyAlphabet,

    #[error("malformed tree header at bit {bit_offset}: {reason}")]
    MalformedTree { bit_offset: usize, reason: &'static str },

    #[error("symbol {0} has no code in the tree")]
    MissingCode(Symbol),

    #[error("bit sequence ending at bit {bit_offset} matches no code in the tree")]
    InvalidCode { bit_offset: usize },

    #[error("payload ended at bit {bit_offset} before the end-of-stream marker")]
    TruncatedStream { bit_offset: usize },

    #[error("invalid value `{value}` for configuration key `{key}`")]
    Config { key: String, value: String },

    #[error("failed parsing properties file: {0}")]
    Properties(String),

    #[error("failed processing `{}`", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<HuffmanError>,
    },
}

impl HuffmanError {
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::Io { op, path: path.into(), source }
    }

    /// Attaches the file that was being processed.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            e @ (HuffmanError::Io { .. } | HuffmanError::File { .. }) => e,
            e => HuffmanError::File { path: path.into(), source: Box::new(e) },
        }
    }

    /// The innermost codec error, looking through file context.
    pub fn kind(&self) -> &HuffmanError {
        match self {
            HuffmanError::File { source, .. } => source.kind(),
            e => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
