// Copyright (c) 2024 Mike Tsao

//! Errors that the library can report to its caller.
//!
//! Most failures in this crate are deliberately *not* errors: a bad dictionary
//! line, an unknown command, or an unmatched reply degrade to "no effect" plus
//! a log line. [ScpError] covers the few cases that a caller must handle, and
//! the per-line variants that the parser counts before discarding.

use std::path::PathBuf;
use thiserror::Error;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ScpError {
    /// No dictionary exists for the requested console model or path.
    #[error("no parameter dictionary available for {0}")]
    DictionaryUnavailable(String),

    #[error("couldn't read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A double-quoted token never closed.
    #[error("unterminated quote in line: {0}")]
    UnterminatedQuote(String),

    /// The line tokenized, but doesn't fit the schema it was matched against.
    #[error("malformed line ({reason}): {line}")]
    Malformed { line: String, reason: &'static str },

    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),
}

impl ScpError {
    pub(crate) fn malformed(line: &str, reason: &'static str) -> Self {
        Self::Malformed {
            line: line.to_string(),
            reason,
        }
    }
}
