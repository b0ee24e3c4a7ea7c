// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppOptions {
    pub fetch: FetchOptions,
    pub batch: BatchOptions,
    pub export: ExportOptions,
    pub backend: BackendKind,
}

/* ---------------- Fetch ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Headless Chromium; executes page scripts.
    Chromium,
    /// Plain HTTP GET; only sees server-rendered markup.
    Http,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(feature = "chromium") { BackendKind::Chromium } else { BackendKind::Http }
    }
}

impl BackendKind {
    pub fn label(&self) -> &'static str {
        match self { BackendKind::Chromium => "chromium", BackendKind::Http => "http" }
    }
}

/// How the statistics block is laid out on the page.
/// The site has shipped both layouts; pick one per run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStrategy {
    /// Tab-delimited text rows (`Average\t1.23\t1.25\t1.20`).
    TextRow,
    /// Element rows containing ordered text cells.
    CellRow { row_selector: String, cell_selector: String },
}

impl Default for LayoutStrategy {
    fn default() -> Self { Self::cell_rows() }
}

impl LayoutStrategy {
    pub fn cell_rows() -> Self {
        LayoutStrategy::CellRow {
            row_selector: s!(CELL_ROW_SELECTOR),
            cell_selector: s!(CELL_SELECTOR),
        }
    }

    pub fn label(&self) -> &'static str {
        match self { LayoutStrategy::TextRow => "text-row", LayoutStrategy::CellRow { .. } => "cell-row" }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackoffPolicy {
    /// Same pause after every failed attempt.
    Fixed,
    /// Pause grows by `factor` per failed attempt, capped at `max_ms`.
    Exponential { factor: u32, max_ms: u64 },
}

impl BackoffPolicy {
    /// Delay after the `failed_attempt`-th failure (1-based).
    pub fn delay(&self, base_ms: u64, failed_attempt: u32) -> Duration {
        let ms = match *self {
            BackoffPolicy::Fixed => base_ms,
            BackoffPolicy::Exponential { factor, max_ms } => {
                let exp = failed_attempt.saturating_sub(1);
                let mult = (factor.max(1) as u64).saturating_pow(exp);
                base_ms.saturating_mul(mult).min(max_ms)
            }
        };
        Duration::from_millis(ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub max_attempts: u32,
    pub nav_timeout_ms: u64,
    pub render_wait_ms: u64,
    pub backoff_ms: u64,
    pub backoff: BackoffPolicy,
    pub layout: LayoutStrategy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            nav_timeout_ms: NAV_TIMEOUT_MS,
            render_wait_ms: RENDER_WAIT_MS,
            backoff_ms: BACKOFF_MS,
            backoff: BackoffPolicy::Fixed,
            layout: LayoutStrategy::default(),
        }
    }
}

impl FetchOptions {
    /// At least one attempt is always made.
    pub fn attempts(&self) -> u32 { self.max_attempts.max(1) }

    pub fn nav_timeout(&self) -> Duration { Duration::from_millis(self.nav_timeout_ms) }

    pub fn backoff_after(&self, failed_attempt: u32) -> Duration {
        self.backoff.delay(self.backoff_ms, failed_attempt)
    }
}

/* ---------------- Batch ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    pub chunk_size: usize,
    pub pairs_file: PathBuf,
    /// Continue from persisted state instead of starting over.
    pub resume: bool,
    /// Stop after this many chunks (`None` = run to the end).
    pub max_chunks: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            pairs_file: PathBuf::from(DEFAULT_PAIRS_FILE),
            resume: false,
            max_chunks: None,
        }
    }
}

/* ---------------- Export ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: OutputPath,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_path: OutputPath::default(),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    pub fn out_path(&self) -> PathBuf {
        let mut path = self.out_path.dir.clone();
        let mut name = self.out_path.file_stem.clone();
        name.push(".");
        name.push(self.format.ext());
        path.push(name);
        path
    }

    /// Parse user text into dir + stem. Ignores a typed extension; format controls it.
    pub fn set_path(&mut self, text: &str) {
        let p = Path::new(text.trim());
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
    }

    /// True when neither dir nor stem has been changed by the user.
    pub fn is_default_path(&self) -> bool {
        self.out_path == OutputPath::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}
