// src/batch.rs
//! Batch orchestration: run the fetcher over pair specs and accumulate results.
//!
//! - `BatchState` is a plain value owned by the caller and threaded through calls,
//!   so a run can be split into chunks, stopped between them, persisted and resumed.
//! - One failing pair never stops the batch; it lands in `BatchReport::failed`.
//! - A stored value is never replaced by nulls. Only `forget`/`reset` remove data.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
    error::FetchError,
    fetch::{ResilientFetcher, Sleeper},
    pairs::CurrencyPairSpec,
    progress::Progress,
    session::Browser,
    table::Table,
    types::AverageTriple,
};

/// target-currency key → averages
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultMapping(BTreeMap<String, AverageTriple>);

/// What an upsert did to the mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
    /// Existing data kept because the new triple would have regressed it.
    Kept,
}

impl ResultMapping {
    pub fn get(&self, key: &str) -> Option<&AverageTriple> { self.0.get(key) }
    pub fn contains(&self, key: &str) -> bool { self.0.contains_key(key) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AverageTriple)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store a successful extraction. An all-null triple does not replace data.
    fn record_success(&mut self, key: &str, triple: AverageTriple) -> Upsert {
        match self.0.get_mut(key) {
            None => {
                self.0.insert(s!(key), triple);
                Upsert::Inserted
            }
            Some(old) if triple.is_null() && !old.is_null() => Upsert::Kept,
            Some(old) => {
                *old = triple;
                Upsert::Replaced
            }
        }
    }

    /// Record a pair with no data: placeholder only if nothing is stored yet.
    fn record_failure(&mut self, key: &str) -> Upsert {
        if self.0.contains_key(key) {
            return Upsert::Kept;
        }
        self.0.insert(s!(key), AverageTriple::null());
        Upsert::Inserted
    }

    fn remove(&mut self, key: &str) -> Option<AverageTriple> { self.0.remove(key) }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchState {
    /// Keys whose fetch succeeded at least once.
    pub completed_keys: BTreeSet<String>,
    /// Index into the full pair list of the next pair `run_chunk` will take.
    pub cursor: usize,
    pub results: ResultMapping,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedSpec {
    pub spec: CurrencyPairSpec,
    pub attempts: u32,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: Vec<FailedSpec>,
}

impl BatchReport {
    pub fn processed(&self) -> usize { self.succeeded + self.failed.len() }

    fn absorb(&mut self, other: BatchReport) {
        self.succeeded += other.succeeded;
        self.failed.extend(other.failed);
    }
}

impl BatchState {
    pub fn new() -> Self { Self::default() }

    /// Drop everything: results, completion marks, cursor.
    pub fn reset(&mut self) {
        logf!("Batch: reset ({} result(s) dropped)", self.results.len());
        *self = Self::default();
    }

    /// Forget one key so the next run fetches it from scratch.
    pub fn forget(&mut self, key: &str) {
        self.completed_keys.remove(key);
        self.results.remove(key);
    }

    pub fn is_complete(&self, all: &[CurrencyPairSpec]) -> bool {
        self.cursor >= all.len()
    }

    /// Pairs that have not succeeded yet.
    pub fn failed_specs<'a>(&self, all: &'a [CurrencyPairSpec]) -> Vec<&'a CurrencyPairSpec> {
        all.iter()
            .filter(|s| !self.completed_keys.contains(s.key()))
            .collect()
    }

    /// Snapshot with columns in map order.
    pub fn snapshot(&self) -> Table {
        Table::from_results(&self.results, None)
    }

    /// Snapshot with columns in input-list order.
    pub fn snapshot_for(&self, all: &[CurrencyPairSpec]) -> Table {
        let order: Vec<&str> = all.iter().map(CurrencyPairSpec::key).collect();
        Table::from_results(&self.results, Some(order.as_slice()))
    }
}

/// Fetch every spec in order, recording results into `state`.
/// Never stops early; the returned report lists what failed.
pub fn process_batch<B: Browser, S: Sleeper>(
    state: &mut BatchState,
    specs: &[CurrencyPairSpec],
    fetcher: &ResilientFetcher<B, S>,
    mut progress: Option<&mut dyn Progress>,
) -> BatchReport {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(specs.len());
    }
    let report = process_range(state, specs, 0, specs.len(), fetcher, progress.as_mut().map(|p| &mut **p as &mut dyn Progress));
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    report
}

/// Process the next `chunk_size` pairs of `all` starting at `state.cursor`.
/// Returns `None` once every pair has been visited.
pub fn run_chunk<B: Browser, S: Sleeper>(
    state: &mut BatchState,
    all: &[CurrencyPairSpec],
    chunk_size: usize,
    fetcher: &ResilientFetcher<B, S>,
    mut progress: Option<&mut dyn Progress>,
) -> Option<BatchReport> {
    let start = state.cursor;
    if start >= all.len() {
        return None;
    }
    let end = start.saturating_add(chunk_size.max(1)).min(all.len());

    logf!("Batch: chunk {}..{} of {}", start, end, all.len());
    if let Some(p) = progress.as_deref_mut() {
        p.begin(all.len());
    }

    let report = process_range(state, &all[start..end], start, all.len(), fetcher, progress.as_mut().map(|p| &mut **p as &mut dyn Progress));
    state.cursor = end;

    if end == all.len() {
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
    }
    Some(report)
}

/// Run chunks until the list is exhausted or `keep_going` says stop.
/// `on_chunk` sees the state after every chunk (e.g. to persist it).
pub fn run_all<B, S, K, C>(
    state: &mut BatchState,
    all: &[CurrencyPairSpec],
    chunk_size: usize,
    fetcher: &ResilientFetcher<B, S>,
    mut progress: Option<&mut dyn Progress>,
    mut keep_going: K,
    mut on_chunk: C,
) -> BatchReport
where
    B: Browser,
    S: Sleeper,
    K: FnMut() -> bool,
    C: FnMut(&BatchState, &BatchReport),
{
    let mut total = BatchReport::default();
    while keep_going() {
        let Some(report) = run_chunk(state, all, chunk_size, fetcher, progress.as_mut().map(|p| &mut **p as &mut dyn Progress)) else {
            break;
        };
        on_chunk(state, &report);
        total.absorb(report);
    }
    total
}

/// Re-fetch only the pairs whose key never succeeded.
pub fn retry_failed<B: Browser, S: Sleeper>(
    state: &mut BatchState,
    all: &[CurrencyPairSpec],
    fetcher: &ResilientFetcher<B, S>,
    progress: Option<&mut dyn Progress>,
) -> BatchReport {
    retry_failed_in_chunks(state, all, all.len(), fetcher, progress, || true, |_, _| {})
}

/// `retry_failed`, `chunk_size` pairs at a time. `keep_going` is checked before
/// each chunk and `on_chunk` sees the state after it, as in `run_all`.
/// The cursor is left alone.
pub fn retry_failed_in_chunks<B, S, K, C>(
    state: &mut BatchState,
    all: &[CurrencyPairSpec],
    chunk_size: usize,
    fetcher: &ResilientFetcher<B, S>,
    mut progress: Option<&mut dyn Progress>,
    mut keep_going: K,
    mut on_chunk: C,
) -> BatchReport
where
    B: Browser,
    S: Sleeper,
    K: FnMut() -> bool,
    C: FnMut(&BatchState, &BatchReport),
{
    let pending: Vec<CurrencyPairSpec> = state.failed_specs(all).into_iter().cloned().collect();
    logf!("Batch: retrying {} failed pair(s)", pending.len());
    if let Some(p) = progress.as_deref_mut() {
        p.begin(pending.len());
    }

    let mut total = BatchReport::default();
    let mut start = 0;
    while start < pending.len() && keep_going() {
        let end = start.saturating_add(chunk_size.max(1)).min(pending.len());
        let report = process_range(state, &pending[start..end], start, pending.len(), fetcher, progress.as_mut().map(|p| &mut **p as &mut dyn Progress));
        on_chunk(state, &report);
        total.absorb(report);
        start = end;
    }

    if start == pending.len() {
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
    } else {
        logf!("Batch: retry stopped after {start}/{}", pending.len());
    }
    total
}

fn process_range<B: Browser, S: Sleeper>(
    state: &mut BatchState,
    specs: &[CurrencyPairSpec],
    offset: usize,
    total: usize,
    fetcher: &ResilientFetcher<B, S>,
    mut progress: Option<&mut dyn Progress>,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (i, spec) in specs.iter().enumerate() {
        let label = spec.label();
        let done = offset + i + 1;
        if let Some(p) = progress.as_deref_mut() {
            p.item_started(done - 1, total, &label);
        }

        match fetcher.fetch_averages(spec.location.as_str()) {
            Ok(triple) => {
                let upsert = state.results.record_success(spec.key(), triple);
                state.completed_keys.insert(s!(spec.key()));
                logd!("Batch: {label} → {upsert:?}");
                report.succeeded += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(done, total, &label);
                }
            }
            Err(FetchError::Exhausted { attempts, last_error, .. }) => {
                let upsert = state.results.record_failure(spec.key());
                loge!("Batch: {label} failed after {attempts} attempt(s): {last_error} ({upsert:?})");
                report.failed.push(FailedSpec { spec: spec.clone(), attempts, reason: last_error });
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(done, total, &label);
                }
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(a: &str, b: &str, c: &str) -> AverageTriple { AverageTriple::from_cells(a, b, c) }

    #[test]
    fn success_never_regresses_to_null() {
        let mut m = ResultMapping::default();
        assert_eq!(m.record_success("USD", t("1", "2", "3")), Upsert::Inserted);
        assert_eq!(m.record_success("USD", AverageTriple::null()), Upsert::Kept);
        assert_eq!(m.get("USD"), Some(&t("1", "2", "3")));
        assert_eq!(m.record_success("USD", t("4", "x", "6")), Upsert::Replaced);
        assert_eq!(m.get("USD").unwrap().values(), [Some(4.0), None, Some(6.0)]);
    }

    #[test]
    fn failure_only_fills_empty_slot() {
        let mut m = ResultMapping::default();
        assert_eq!(m.record_failure("JPY"), Upsert::Inserted);
        assert!(m.get("JPY").unwrap().is_null());
        m.record_success("JPY", t("1", "2", "3"));
        assert_eq!(m.record_failure("JPY"), Upsert::Kept);
        assert!(!m.get("JPY").unwrap().is_null());
    }

    #[test]
    fn forget_and_reset() {
        let mut s = BatchState::new();
        s.results.record_success("USD", t("1", "2", "3"));
        s.completed_keys.insert(s!("USD"));
        s.cursor = 1;
        s.forget("USD");
        assert!(!s.results.contains("USD"));
        assert!(s.completed_keys.is_empty());
        assert_eq!(s.cursor, 1);
        s.reset();
        assert_eq!(s, BatchState::default());
    }
}
