// src/cli.rs
//! Headless front-end. Flags map onto `AppOptions`; everything else is `runner`.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use clap::{Parser, ValueEnum, ValueHint};

use crate::config::consts::{DEFAULT_CHUNK_SIZE, DEFAULT_PAIRS_FILE};
use crate::config::options::{
    AppOptions, BackendKind, BackoffPolicy, ExportFormat, LayoutStrategy,
};
use crate::progress::StderrProgress;
use crate::runner;
use crate::store::StateStore;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Backend {
    Chromium,
    Http,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Layout {
    /// `div.flex.flex-row` rows of `span` cells (selectors overridable)
    CellRow,
    /// Tab-separated text lines
    TextRow,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape 7/30/90-day exchange rate averages")]
pub struct Args {
    /// JSON list of {from_currency, to_currency, url}
    #[arg(short, long, value_hint = ValueHint::FilePath, default_value = DEFAULT_PAIRS_FILE)]
    pub input: PathBuf,

    /// Output file (extension follows --format)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Leave out the header row
    #[arg(long)]
    pub no_headers: bool,

    /// Pairs per chunk; state is saved after each chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk: usize,

    /// Stop after this many chunks (resume later with --resume)
    #[arg(long)]
    pub chunks: Option<usize>,

    /// Continue from the saved batch state
    #[arg(long, conflicts_with = "reset")]
    pub resume: bool,

    /// Delete the saved batch state before running
    #[arg(long)]
    pub reset: bool,

    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    #[arg(long, value_enum, default_value_t = Layout::CellRow)]
    pub layout: Layout,

    #[arg(long, requires = "cell_selector")]
    pub row_selector: Option<String>,

    #[arg(long, requires = "row_selector")]
    pub cell_selector: Option<String>,

    /// Attempts per pair
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Navigation timeout (ms)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Wait after load for client-side rendering (ms)
    #[arg(long)]
    pub render_wait_ms: Option<u64>,

    /// Pause between attempts (ms)
    #[arg(long)]
    pub backoff_ms: Option<u64>,

    /// Multiply the pause by this factor after every failed attempt
    #[arg(long)]
    pub backoff_factor: Option<u32>,

    /// Debug logging (FX_SCRAPE_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn to_options(&self) -> AppOptions {
        let mut opts = AppOptions::default();

        opts.batch.pairs_file = self.input.clone();
        opts.batch.chunk_size = self.chunk;
        opts.batch.max_chunks = self.chunks;
        opts.batch.resume = self.resume;

        if let Some(b) = self.backend {
            opts.backend = match b {
                Backend::Chromium => BackendKind::Chromium,
                Backend::Http => BackendKind::Http,
            };
        }

        let f = &mut opts.fetch;
        f.layout = match (self.layout, &self.row_selector, &self.cell_selector) {
            (Layout::TextRow, _, _) => LayoutStrategy::TextRow,
            (Layout::CellRow, Some(row), Some(cell)) => LayoutStrategy::CellRow {
                row_selector: row.clone(),
                cell_selector: cell.clone(),
            },
            (Layout::CellRow, _, _) => LayoutStrategy::cell_rows(),
        };
        if let Some(n) = self.attempts { f.max_attempts = n; }
        if let Some(ms) = self.timeout_ms { f.nav_timeout_ms = ms; }
        if let Some(ms) = self.render_wait_ms { f.render_wait_ms = ms; }
        if let Some(ms) = self.backoff_ms { f.backoff_ms = ms; }
        if let Some(factor) = self.backoff_factor {
            f.backoff = BackoffPolicy::Exponential {
                factor,
                max_ms: crate::config::consts::BACKOFF_MAX_MS,
            };
        }

        let e = &mut opts.export;
        e.format = match self.format {
            Format::Csv => ExportFormat::Csv,
            Format::Tsv => ExportFormat::Tsv,
        };
        e.include_headers = !self.no_headers;
        if let Some(out) = &self.out {
            e.set_path(&out.to_string_lossy());
        }

        opts
    }
}

pub fn run() -> anyhow::Result<()> {
    run_with(Args::parse())
}

pub fn run_with(args: Args) -> anyhow::Result<()> {
    crate::log::init_stderr(if args.verbose { "debug" } else { "info" });

    let opts = args.to_options();
    let store = StateStore::default();
    if args.reset {
        store.clear()?;
    }

    let stop = AtomicBool::new(false);
    let mut progress = StderrProgress;
    let summary = runner::run(&opts, &store, Some(&mut progress), &stop)?;

    for f in &summary.report.failed {
        eprintln!("FAILED {} after {} attempt(s): {}", f.spec, f.attempts, f.reason);
    }
    eprintln!(
        "{} ok, {} failed{}",
        summary.report.succeeded,
        summary.report.failed.len(),
        if summary.stopped { " (paused; rerun with --resume)" } else { "" }
    );
    println!("{}", summary.export_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let args = Args::parse_from([
            "cli", "-i", "pairs.json", "-o", "out/rates.txt", "--format", "tsv", "--no-headers",
            "--chunk", "3", "--chunks", "2", "--backend", "http", "--layout", "text-row",
            "--attempts", "5", "--backoff-factor", "2",
        ]);
        let opts = args.to_options();
        assert_eq!(opts.batch.pairs_file, PathBuf::from("pairs.json"));
        assert_eq!(opts.batch.chunk_size, 3);
        assert_eq!(opts.batch.max_chunks, Some(2));
        assert_eq!(opts.backend, BackendKind::Http);
        assert_eq!(opts.fetch.layout, LayoutStrategy::TextRow);
        assert_eq!(opts.fetch.max_attempts, 5);
        assert!(matches!(opts.fetch.backoff, BackoffPolicy::Exponential { factor: 2, .. }));
        assert_eq!(opts.export.format, ExportFormat::Tsv);
        assert!(!opts.export.include_headers);
        assert_eq!(opts.export.out_path(), PathBuf::from("out").join("rates.tsv"));
    }

    #[test]
    fn custom_selectors_need_each_other() {
        assert!(Args::try_parse_from(["cli", "--row-selector", "tr"]).is_err());
        let args = Args::parse_from(["cli", "--row-selector", "tr", "--cell-selector", "td"]);
        assert_eq!(
            args.to_options().fetch.layout,
            LayoutStrategy::CellRow { row_selector: s!("tr"), cell_selector: s!("td") }
        );
    }

    #[test]
    fn resume_conflicts_with_reset() {
        assert!(Args::try_parse_from(["cli", "--resume", "--reset"]).is_err());
    }
}
