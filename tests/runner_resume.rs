// tests/runner_resume.rs
mod common;

use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};

use common::*;
use fx_scrape::batch::BatchState;
use fx_scrape::config::options::AppOptions;
use fx_scrape::fetch::{NoSleep, ResilientFetcher};
use fx_scrape::runner;
use fx_scrape::store::StateStore;

fn write_pairs(dir: &std::path::Path, targets: &[&str]) -> std::path::PathBuf {
    let items: Vec<String> = targets
        .iter()
        .map(|t| format!(r#"{{"from_currency":"SGD","to_currency":"{t}","url":"{}"}}"#, url(t)))
        .collect();
    let path = dir.join("pairs.json");
    fs::write(&path, format!("[{}]", items.join(","))).unwrap();
    path
}

#[test]
fn stopped_run_resumes_where_it_left_off() {
    let dir = tempfile::tempdir().unwrap();
    let targets = ["USD", "JPY", "EUR", "GBP"];
    let mut opts = AppOptions::default();
    opts.batch.pairs_file = write_pairs(dir.path(), &targets);
    opts.batch.chunk_size = 2;
    let store = StateStore::at(dir.path().join("state.json"));

    let urls: Vec<String> = targets.iter().map(|t| url(t)).collect();
    let browser = MockBrowser::new(urls.iter().map(|u| (u.as_str(), vec![avg_page("1", "2", "3")])).collect());
    let fetcher = ResilientFetcher::with_sleeper(browser.clone(), fast_options(1), NoSleep::default());

    // First invocation: one chunk, then stop.
    let prepared = runner::prepare(&opts, &store).unwrap();
    let mut state = prepared.state;
    let stop = AtomicBool::new(false);
    runner::run_batch(&opts, &store, &prepared.pairs, &mut state, &fetcher, None, &stop, |_, _| {
        stop.store(true, Ordering::Relaxed);
    });
    assert_eq!(state.cursor, 2);

    // Second invocation picks up the saved cursor.
    opts.batch.resume = true;
    let prepared = runner::prepare(&opts, &store).unwrap();
    assert_eq!(prepared.state, state);

    let mut state = prepared.state;
    let stop = AtomicBool::new(false);
    runner::run_batch(&opts, &store, &prepared.pairs, &mut state, &fetcher, None, &stop, |_, _| {});
    assert!(state.is_complete(&prepared.pairs));
    assert_eq!(state.completed_keys.len(), 4);
    for u in &urls {
        assert_eq!(browser.calls(u), 1, "{u} fetched more than once");
    }
}

#[test]
fn stop_flag_halts_a_retry_and_keeps_what_it_saved() {
    let dir = tempfile::tempdir().unwrap();
    let targets = ["USD", "JPY", "EUR", "GBP"];
    let mut opts = AppOptions::default();
    opts.batch.pairs_file = write_pairs(dir.path(), &targets);
    opts.batch.chunk_size = 2;
    let store = StateStore::at(dir.path().join("state.json"));

    let urls: Vec<String> = targets.iter().map(|t| url(t)).collect();
    let browser = MockBrowser::new(
        urls.iter().map(|u| (u.as_str(), vec![Outcome::NavFail, avg_page("1", "2", "3")])).collect(),
    );
    let fetcher = ResilientFetcher::with_sleeper(browser.clone(), fast_options(1), NoSleep::default());

    let prepared = runner::prepare(&opts, &store).unwrap();
    let mut state = prepared.state;
    let never = AtomicBool::new(false);
    runner::run_batch(&opts, &store, &prepared.pairs, &mut state, &fetcher, None, &never, |_, _| {});
    assert_eq!(state.failed_specs(&prepared.pairs).len(), 4);

    let stop = AtomicBool::new(false);
    let report = runner::retry_batch(&opts, &store, &prepared.pairs, &mut state, &fetcher, None, &stop, |_, _| {
        stop.store(true, Ordering::Relaxed);
    });
    assert_eq!(report.processed(), 2);
    assert_eq!(report.succeeded, 2);
    assert_eq!(browser.calls(&urls[2]), 1);
    assert_eq!(browser.calls(&urls[3]), 1);
    assert_eq!(state.failed_specs(&prepared.pairs).len(), 2);

    opts.batch.resume = true;
    assert_eq!(runner::prepare(&opts, &store).unwrap().state, state);

    // already stopped: nothing is fetched
    let report = runner::retry_batch(&opts, &store, &prepared.pairs, &mut state, &fetcher, None, &stop, |_, _| {});
    assert_eq!(report.processed(), 0);
    assert_eq!(browser.calls(&urls[2]), 1);
}

#[test]
fn without_resume_saved_state_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = AppOptions::default();
    opts.batch.pairs_file = write_pairs(dir.path(), &["USD"]);
    let store = StateStore::at(dir.path().join("state.json"));

    let pairs = runner::prepare(&opts, &store).unwrap().pairs;
    let mut saved = BatchState::new();
    saved.cursor = 1;
    store.save(&saved, &pairs).unwrap();

    assert_eq!(runner::prepare(&opts, &store).unwrap().state, BatchState::default());
    opts.batch.resume = true;
    assert_eq!(runner::prepare(&opts, &store).unwrap().state.cursor, 1);
}

#[test]
fn bad_pair_list_is_a_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pairs.json");
    fs::write(
        &path,
        r#"[{"from_currency":"SGD","to_currency":"USD","url":"https://a.example/"},
            {"from_currency":"SGD","to_currency":"USD","url":"https://b.example/"}]"#,
    )
    .unwrap();
    let mut opts = AppOptions::default();
    opts.batch.pairs_file = path;

    let err = runner::prepare(&opts, &StateStore::at(dir.path().join("s.json"))).err().unwrap();
    assert!(format!("{err:#}").contains("already used"), "{err:#}");
}
