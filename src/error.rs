// src/error.rs
//! Error kinds for the scrape pipeline.
//!
//! Only startup errors (`PairsError`) are fatal. Everything raised inside a fetch
//! attempt ends up as `AttemptError` and is retried; a pair that runs out of attempts
//! becomes `FetchError::Exhausted`, which the batch records and moves past.

use std::path::PathBuf;

use thiserror::Error;

/// The page was loaded but the averages could not be read from it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no average row found")]
    NoAverageRow,

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },
}

/// Browser/page session failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to open session: {0}")]
    Open(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("navigation to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("failed to close session: {0}")]
    Close(String),
}

/// One failed attempt. Both kinds are retried the same way.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {location} after {attempts} attempt(s): {last_error}")]
    Exhausted {
        location: String,
        attempts: u32,
        last_error: String,
    },
}

/// Problems with the input pair list. Reported before any fetching starts.
#[derive(Debug, Error)]
pub enum PairsError {
    #[error("cannot read pair list {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("pair list {path} is not valid JSON: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("pair list is empty")]
    Empty,

    #[error("entry {index} ({source_currency}/{target_currency}): invalid url `{url}`: {reason}")]
    InvalidUrl {
        index: usize,
        source_currency: String,
        target_currency: String,
        url: String,
        reason: String,
    },

    #[error("entry {index}: currency code must not be empty")]
    EmptyCode { index: usize },

    #[error("entry {index}: target currency {key} already used by entry {first}")]
    DuplicateTarget { index: usize, first: usize, key: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("stored batch state at {path} is corrupt: {source}")]
    Corrupt { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export write error: {0}")]
    Csv(#[from] csv::Error),
}
