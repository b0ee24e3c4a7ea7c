// src/fetch.rs
//! Retry loop around "open session → load page → wait → extract".
//!
//! Every attempt gets a fresh session that is closed before the next one starts.
//! Any failure inside an attempt (session, timeout, missing row) is treated the
//! same: log it, back off, try again. Running out of attempts is reported as
//! `FetchError::Exhausted` and is the caller's "no data", never a crash.

use std::cell::Cell;
use std::time::Duration;

use crate::{
    config::options::FetchOptions,
    error::{AttemptError, FetchError},
    session::{Browser, ScopedSession, Session},
    specs::averages,
    types::AverageTriple,
};

/// Pause between attempts. Swapped out in tests to avoid real waiting.
pub trait Sleeper {
    fn sleep(&self, d: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct NoSleep {
    calls: Cell<u32>,
    total: Cell<Duration>,
}

impl NoSleep {
    pub fn calls(&self) -> u32 { self.calls.get() }
    pub fn total(&self) -> Duration { self.total.get() }
}

impl Sleeper for NoSleep {
    fn sleep(&self, d: Duration) {
        self.calls.set(self.calls.get() + 1);
        self.total.set(self.total.get() + d);
    }
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    fn sleep(&self, d: Duration) {
        (**self).sleep(d)
    }
}

pub struct ResilientFetcher<B: Browser, S: Sleeper = ThreadSleeper> {
    browser: B,
    options: FetchOptions,
    sleeper: S,
}

impl<B: Browser> ResilientFetcher<B, ThreadSleeper> {
    pub fn new(browser: B, options: FetchOptions) -> Self {
        Self { browser, options, sleeper: ThreadSleeper }
    }
}

impl<B: Browser, S: Sleeper> ResilientFetcher<B, S> {
    pub fn with_sleeper(browser: B, options: FetchOptions, sleeper: S) -> Self {
        Self { browser, options, sleeper }
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    pub fn browser(&self) -> &B { &self.browser }

    /// Load `location` and read its averages, retrying per `FetchOptions`.
    pub fn fetch_averages(&self, location: &str) -> Result<AverageTriple, FetchError> {
        let attempts = self.options.attempts();
        let mut last_error = s!();

        for attempt in 1..=attempts {
            logf!("Fetch: attempt {attempt}/{attempts} {location} via {}", self.browser.name());

            match self.attempt(location) {
                Ok(triple) => {
                    logd!("Fetch: ok on attempt {attempt}: {location}");
                    return Ok(triple);
                }
                Err(e) => {
                    logw!("Fetch: attempt {attempt}/{attempts} failed for {location}: {e}");
                    last_error = e.to_string();
                }
            }

            if attempt < attempts {
                self.sleeper.sleep(self.options.backoff_after(attempt));
            }
        }

        loge!("Fetch: giving up on {location} after {attempts} attempt(s)");
        Err(FetchError::Exhausted { location: s!(location), attempts, last_error })
    }

    /// One attempt. The session is released when this returns, on every path.
    fn attempt(&self, location: &str) -> Result<AverageTriple, AttemptError> {
        let mut session = ScopedSession::open(&self.browser)?;

        session.navigate(location, self.options.nav_timeout())?;
        session.wait_render_settle(Duration::from_millis(self.options.render_wait_ms))?;
        let page = session.content()?;
        let triple = averages::extract_page(&page, &self.options.layout)?;

        // Close failures after a good read don't invalidate the data.
        if let Err(e) = session.close() {
            logw!("Fetch: {e}");
        }
        Ok(triple)
    }
}
