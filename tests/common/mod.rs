// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use fx_scrape::config::options::FetchOptions;
use fx_scrape::error::SessionError;
use fx_scrape::pairs::{self, CurrencyPairSpec};
use fx_scrape::progress::Progress;
use fx_scrape::session::{Browser, PageContent, Session};

/// What one attempt at a URL does.
#[derive(Clone, Debug)]
pub enum Outcome {
    Page(PageContent),
    NavFail,
    Timeout,
    ContentFail,
    /// Navigation succeeds, then reading the page panics.
    PanicOnContent,
}

/// Page in the default cell-row layout with an Average row.
pub fn avg_page(a7: &str, a30: &str, a90: &str) -> Outcome {
    Outcome::Page(PageContent::html_only(format!(
        r#"<html><body>
            <div class="flex flex-row"><span>Period</span><span>7 days</span><span>30 days</span><span>90 days</span></div>
            <div class="flex flex-row"><span>High</span><span>9</span><span>9</span><span>9</span></div>
            <div class="flex flex-row"><span>Average</span><span>{a7}</span><span>{a30}</span><span>{a90}</span></div>
        </body></html>"#
    )))
}

/// Loads fine but has no Average row.
pub fn no_average_page() -> Outcome {
    Outcome::Page(PageContent::html_only(
        r#"<div class="flex flex-row"><span>High</span><span>1</span><span>2</span><span>3</span></div>"#,
    ))
}

#[derive(Default)]
struct Inner {
    /// url → outcomes per attempt; the last one repeats.
    script: HashMap<String, Vec<Outcome>>,
    calls: RefCell<HashMap<String, usize>>,
    opens: Cell<u32>,
    closes: Cell<u32>,
}

/// Scripted in-memory browser. Unknown URLs fail navigation.
#[derive(Clone, Default)]
pub struct MockBrowser {
    inner: Rc<Inner>,
}

impl MockBrowser {
    pub fn new(script: Vec<(&str, Vec<Outcome>)>) -> Self {
        let script = script.into_iter().map(|(u, o)| (u.to_string(), o)).collect();
        Self { inner: Rc::new(Inner { script, ..Inner::default() }) }
    }

    pub fn opens(&self) -> u32 { self.inner.opens.get() }
    pub fn closes(&self) -> u32 { self.inner.closes.get() }

    pub fn calls(&self, url: &str) -> usize {
        self.inner.calls.borrow().get(url).copied().unwrap_or(0)
    }
}

pub struct MockSession {
    inner: Rc<Inner>,
    loaded: Option<Outcome>,
}

impl Browser for MockBrowser {
    type Session = MockSession;

    fn open(&self) -> Result<MockSession, SessionError> {
        self.inner.opens.set(self.inner.opens.get() + 1);
        Ok(MockSession { inner: Rc::clone(&self.inner), loaded: None })
    }

    fn name(&self) -> &'static str { "mock" }
}

impl Session for MockSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError> {
        let idx = {
            let mut calls = self.inner.calls.borrow_mut();
            let n = calls.entry(url.to_string()).or_insert(0);
            *n += 1;
            *n - 1
        };
        let outcome = self
            .inner
            .script
            .get(url)
            .and_then(|o| o.get(idx).or_else(|| o.last()))
            .cloned()
            .unwrap_or(Outcome::NavFail);

        match outcome {
            Outcome::NavFail => Err(SessionError::Navigation { url: url.into(), reason: "scripted".into() }),
            Outcome::Timeout => Err(SessionError::Timeout { url: url.into(), timeout_ms: timeout.as_millis() as u64 }),
            other => {
                self.loaded = Some(other);
                Ok(())
            }
        }
    }

    fn wait_render_settle(&mut self, _wait: Duration) -> Result<(), SessionError> { Ok(()) }

    fn content(&mut self) -> Result<PageContent, SessionError> {
        match &self.loaded {
            Some(Outcome::Page(p)) => Ok(p.clone()),
            Some(Outcome::PanicOnContent) => panic!("renderer crashed"),
            _ => Err(SessionError::Content("scripted".into())),
        }
    }

    fn close(&mut self) -> Result<(), SessionError> {
        self.inner.closes.set(self.inner.closes.get() + 1);
        self.loaded = None;
        Ok(())
    }
}

pub fn fast_options(max_attempts: u32) -> FetchOptions {
    FetchOptions { max_attempts, backoff_ms: 10, render_wait_ms: 0, ..FetchOptions::default() }
}

/// Pair specs for SGD → each target, at `https://rates.example/<target>`.
pub fn specs(targets: &[&str]) -> Vec<CurrencyPairSpec> {
    let items: Vec<String> = targets
        .iter()
        .map(|t| format!(r#"{{"from_currency":"SGD","to_currency":"{t}","url":"{}"}}"#, url(t)))
        .collect();
    pairs::from_json(&format!("[{}]", items.join(","))).unwrap()
}

pub fn url(target: &str) -> String {
    format!("https://rates.example/{target}")
}

/// Progress sink that records every callback.
#[derive(Default)]
pub struct Recorder {
    pub begins: Vec<usize>,
    pub done: Vec<(usize, usize, String)>,
    pub failed: Vec<(usize, usize, String)>,
    pub finished: u32,
    seq: Vec<usize>,
}

impl Recorder {
    /// `done` counts of every finished item, in callback order.
    pub fn counts(&self) -> Vec<usize> {
        self.seq.clone()
    }
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.begins.push(total); }
    fn item_done(&mut self, done: usize, total: usize, label: &str) {
        self.seq.push(done);
        self.done.push((done, total, label.into()));
    }
    fn item_failed(&mut self, done: usize, total: usize, label: &str) {
        self.seq.push(done);
        self.failed.push((done, total, label.into()));
    }
    fn finish(&mut self) { self.finished += 1; }
}
