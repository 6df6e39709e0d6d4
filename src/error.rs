use std::path::PathBuf;

use thiserror::Error;

/// Failure to obtain a decision from a disambiguator.
///
/// Human-correctable mistakes (an out-of-range choice, an unrecognised
/// yes/no answer) never surface here; they are re-prompted.
#[derive(Debug, Error)]
pub enum DisambiguationError {
    /// The input stream ended while a decision was pending
    #[error("input closed before a decision was made")]
    InputClosed,

    /// Reading the answer or writing the prompt failed
    #[error("I/O error while prompting: {0}")]
    Io(#[from] std::io::Error),

    /// A scripted disambiguator ran out of answers
    #[error("scripted answers exhausted at {call} call")]
    ScriptExhausted { call: &'static str },

    /// The next scripted answer does not fit the call being made
    #[error("scripted answer mismatch: {call} call received a {found} answer")]
    ScriptMismatch {
        call: &'static str,
        found: &'static str,
    },
}

/// Failure reading or writing one of the file-backed stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("unknown document: {0}")]
    UnknownDocument(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Failure that aborts segmentation of a hearing day.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error(transparent)]
    Disambiguation(#[from] DisambiguationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
