// src/session/mod.rs
//! Browser/page session abstraction.
//!
//! The fetcher only needs: open a session, navigate with a timeout, wait for the
//! page to settle, read its content, close. `Browser` opens sessions; `Session`
//! does the rest. `ScopedSession` guarantees `close()` runs once per session on
//! every exit path, including early returns and unwinding.
//!
//! Backends:
//! - `http`: blocking GET, no script execution.
//! - `chromium` (feature `chromium`): headless Chromium driven over CDP.

pub mod http;
#[cfg(feature = "chromium")]
pub mod chromium;

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crate::config::options::BackendKind;
use crate::error::SessionError;

/// What a loaded page exposes to the extractor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Serialized DOM (after scripts ran, for script-capable backends).
    pub html: String,
    /// Rendered text as a browser would copy it (`innerText`), if available.
    pub text: Option<String>,
}

impl PageContent {
    pub fn html_only(html: impl Into<String>) -> Self {
        Self { html: html.into(), text: None }
    }
}

pub trait Browser {
    type Session: Session;

    fn open(&self) -> Result<Self::Session, SessionError>;

    fn name(&self) -> &'static str;
}

pub trait Session {
    /// Load `url`; returns once the document's load signal fired or `timeout` elapsed.
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError>;

    /// Fixed pause for client-side rendering. No readiness polling.
    fn wait_render_settle(&mut self, wait: Duration) -> Result<(), SessionError>;

    fn content(&mut self) -> Result<PageContent, SessionError>;

    /// Release everything the session holds. Must tolerate being called after a failure.
    fn close(&mut self) -> Result<(), SessionError>;
}

/// Owns an open session and closes it exactly once.
pub struct ScopedSession<S: Session> {
    inner: S,
    closed: bool,
}

impl<S: Session> ScopedSession<S> {
    pub fn open<B>(browser: &B) -> Result<Self, SessionError>
    where
        B: Browser<Session = S>,
    {
        let inner = browser.open()?;
        Ok(Self { inner, closed: false })
    }

    /// Close now and surface the error; `Drop` is the silent fallback.
    pub fn close(mut self) -> Result<(), SessionError> {
        self.closed = true;
        self.inner.close()
    }
}

impl<S: Session> Deref for ScopedSession<S> {
    type Target = S;
    fn deref(&self) -> &S { &self.inner }
}

impl<S: Session> DerefMut for ScopedSession<S> {
    fn deref_mut(&mut self) -> &mut S { &mut self.inner }
}

impl<S: Session> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.inner.close() {
            logw!("Session: close failed during cleanup: {e}");
        }
    }
}

/* ---------------- Backend selection ---------------- */

/// Backend picked at runtime from `BackendKind`.
pub enum AnyBrowser {
    Http(http::HttpBrowser),
    #[cfg(feature = "chromium")]
    Chromium(chromium::ChromiumBrowser),
}

pub enum AnySession {
    Http(http::HttpSession),
    #[cfg(feature = "chromium")]
    Chromium(chromium::ChromiumSession),
}

impl AnyBrowser {
    pub fn from_kind(kind: BackendKind) -> Result<Self, SessionError> {
        match kind {
            BackendKind::Http => Ok(AnyBrowser::Http(http::HttpBrowser::new()?)),
            #[cfg(feature = "chromium")]
            BackendKind::Chromium => Ok(AnyBrowser::Chromium(chromium::ChromiumBrowser::locate()?)),
            #[cfg(not(feature = "chromium"))]
            BackendKind::Chromium => Err(SessionError::Open(s!(
                "this build has no Chromium backend (enable feature `chromium`)"
            ))),
        }
    }
}

impl Browser for AnyBrowser {
    type Session = AnySession;

    fn open(&self) -> Result<AnySession, SessionError> {
        match self {
            AnyBrowser::Http(b) => b.open().map(AnySession::Http),
            #[cfg(feature = "chromium")]
            AnyBrowser::Chromium(b) => b.open().map(AnySession::Chromium),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AnyBrowser::Http(b) => b.name(),
            #[cfg(feature = "chromium")]
            AnyBrowser::Chromium(b) => b.name(),
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $call:expr) => {
        match $self {
            AnySession::Http($s) => $call,
            #[cfg(feature = "chromium")]
            AnySession::Chromium($s) => $call,
        }
    };
}

impl Session for AnySession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError> {
        dispatch!(self, s => s.navigate(url, timeout))
    }
    fn wait_render_settle(&mut self, wait: Duration) -> Result<(), SessionError> {
        dispatch!(self, s => s.wait_render_settle(wait))
    }
    fn content(&mut self) -> Result<PageContent, SessionError> {
        dispatch!(self, s => s.content())
    }
    fn close(&mut self) -> Result<(), SessionError> {
        dispatch!(self, s => s.close())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a> { closes: &'a Cell<u32> }

    impl Session for Counting<'_> {
        fn navigate(&mut self, _: &str, _: Duration) -> Result<(), SessionError> { Ok(()) }
        fn wait_render_settle(&mut self, _: Duration) -> Result<(), SessionError> { Ok(()) }
        fn content(&mut self) -> Result<PageContent, SessionError> { Ok(PageContent::default()) }
        fn close(&mut self) -> Result<(), SessionError> {
            self.closes.set(self.closes.get() + 1);
            Ok(())
        }
    }

    struct Opener<'a> { closes: &'a Cell<u32> }

    impl<'a> Browser for Opener<'a> {
        type Session = Counting<'a>;
        fn open(&self) -> Result<Counting<'a>, SessionError> { Ok(Counting { closes: self.closes }) }
        fn name(&self) -> &'static str { "counting" }
    }

    #[test]
    fn scoped_session_closes_on_drop() {
        let closes = Cell::new(0);
        {
            let _s = ScopedSession::open(&Opener { closes: &closes }).unwrap();
        }
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn explicit_close_does_not_double_close() {
        let closes = Cell::new(0);
        let s = ScopedSession::open(&Opener { closes: &closes }).unwrap();
        s.close().unwrap();
        assert_eq!(closes.get(), 1);
    }
}
