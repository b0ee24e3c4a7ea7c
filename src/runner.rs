// src/runner.rs
//! Wiring shared by the CLI and the GUI worker:
//! load pairs → pick backend → run chunks (persisting after each) → export.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;

use crate::{
    batch::{self, BatchReport, BatchState},
    config::options::AppOptions,
    fetch::{ResilientFetcher, Sleeper},
    file,
    pairs::{self, CurrencyPairSpec},
    progress::Progress,
    session::{AnyBrowser, Browser},
    store::StateStore,
    table::Table,
};

/// Pair list plus the state a run starts from.
pub struct Prepared {
    pub pairs: Vec<CurrencyPairSpec>,
    pub state: BatchState,
}

/// Summary of what was produced.
pub struct RunSummary {
    pub report: BatchReport,
    pub table: Table,
    /// True when the run ended before the end of the list (stop flag or chunk limit).
    pub stopped: bool,
    pub export_path: PathBuf,
}

/// Load and validate the pair list, then the saved state if resuming.
pub fn prepare(opts: &AppOptions, store: &StateStore) -> anyhow::Result<Prepared> {
    let pairs = pairs::load(&opts.batch.pairs_file)
        .with_context(|| format!("loading pairs from {}", opts.batch.pairs_file.display()))?;

    let state = if opts.batch.resume {
        store.load_for(&pairs).context("reading saved batch state")?.unwrap_or_default()
    } else {
        BatchState::default()
    };
    Ok(Prepared { pairs, state })
}

pub fn build_fetcher(opts: &AppOptions) -> anyhow::Result<ResilientFetcher<AnyBrowser>> {
    let browser = AnyBrowser::from_kind(opts.backend)
        .with_context(|| format!("starting the {} backend", opts.backend.label()))?;
    logf!(
        "Runner: backend={} layout={} attempts={}",
        browser.name(),
        opts.fetch.layout.label(),
        opts.fetch.attempts()
    );
    Ok(ResilientFetcher::new(browser, opts.fetch.clone()))
}

/// Run chunks until done or `stop` is set, saving state after each chunk.
/// `on_chunk` runs after the save, e.g. to hand a copy of the state to a UI.
#[allow(clippy::too_many_arguments)]
pub fn run_batch<B, S, C>(
    opts: &AppOptions,
    store: &StateStore,
    pairs: &[CurrencyPairSpec],
    state: &mut BatchState,
    fetcher: &ResilientFetcher<B, S>,
    progress: Option<&mut dyn Progress>,
    stop: &AtomicBool,
    mut on_chunk: C,
) -> BatchReport
where
    B: Browser,
    S: Sleeper,
    C: FnMut(&BatchState, &BatchReport),
{
    batch::run_all(
        state,
        pairs,
        opts.batch.chunk_size,
        fetcher,
        progress,
        || !stop.load(Ordering::Relaxed),
        |state, report| {
            // A failed save only costs resumability, not the run.
            if let Err(e) = store.save(state, pairs) {
                logw!("Runner: {e}");
            }
            on_chunk(state, report);
        },
    )
}

/// Retry the unfinished pairs in chunks until done or `stop` is set,
/// saving state after each chunk.
#[allow(clippy::too_many_arguments)]
pub fn retry_batch<B, S, C>(
    opts: &AppOptions,
    store: &StateStore,
    pairs: &[CurrencyPairSpec],
    state: &mut BatchState,
    fetcher: &ResilientFetcher<B, S>,
    progress: Option<&mut dyn Progress>,
    stop: &AtomicBool,
    mut on_chunk: C,
) -> BatchReport
where
    B: Browser,
    S: Sleeper,
    C: FnMut(&BatchState, &BatchReport),
{
    batch::retry_failed_in_chunks(
        state,
        pairs,
        opts.batch.chunk_size,
        fetcher,
        progress,
        || !stop.load(Ordering::Relaxed),
        |state, report| {
            if let Err(e) = store.save(state, pairs) {
                logw!("Runner: {e}");
            }
            on_chunk(state, report);
        },
    )
}

/// Headless end-to-end run (CLI).
pub fn run(
    opts: &AppOptions,
    store: &StateStore,
    mut progress: Option<&mut dyn Progress>,
    stop: &AtomicBool,
) -> anyhow::Result<RunSummary> {
    let Prepared { pairs, mut state } = prepare(opts, store)?;
    let fetcher = build_fetcher(opts)?;

    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("{} pair(s), starting at {}", pairs.len(), state.cursor));
    }

    let mut chunks = 0usize;
    let limit = opts.batch.max_chunks;
    let report = run_batch(opts, store, &pairs, &mut state, &fetcher, progress, stop, |_, _| {
        chunks += 1;
        if limit.is_some_and(|n| chunks >= n) {
            stop.store(true, Ordering::Relaxed);
        }
    });
    let stopped = !state.is_complete(&pairs);
    if stopped {
        logf!("Runner: paused at {}/{}; resume to continue", state.cursor, pairs.len());
    }

    // A partial table is still a valid export.
    let table = state.snapshot_for(&pairs);
    let export_path = file::write_export(&opts.export, &table)
        .with_context(|| format!("writing {}", opts.export.out_path().display()))?;

    logf!(
        "Runner: {} ok, {} failed, {} column(s)",
        report.succeeded,
        report.failed.len(),
        table.ncols()
    );
    Ok(RunSummary { report, table, stopped, export_path })
}
