// src/session/http.rs
// Plain HTTP GET backend. Pages that fill the statistics block from script will
// not contain it here; use the Chromium backend for those.

use std::time::Duration;

use reqwest::blocking::Client;

use super::{Browser, PageContent, Session};
use crate::config::consts::USER_AGENT;
use crate::error::SessionError;

pub struct HttpBrowser {
    client: Client,
}

impl HttpBrowser {
    pub fn new() -> Result<Self, SessionError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SessionError::Open(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl Browser for HttpBrowser {
    type Session = HttpSession;

    fn open(&self) -> Result<HttpSession, SessionError> {
        // Client is an Arc internally; cloning shares the connection pool.
        Ok(HttpSession { client: self.client.clone(), body: None })
    }

    fn name(&self) -> &'static str { "http" }
}

pub struct HttpSession {
    client: Client,
    body: Option<String>,
}

impl Session for HttpSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError> {
        let resp = self.client.get(url).timeout(timeout).send().map_err(|e| {
            if e.is_timeout() {
                SessionError::Timeout { url: s!(url), timeout_ms: timeout.as_millis() as u64 }
            } else {
                SessionError::Navigation { url: s!(url), reason: e.to_string() }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SessionError::Navigation { url: s!(url), reason: format!("HTTP {status}") });
        }

        let body = resp
            .text()
            .map_err(|e| SessionError::Content(format!("reading body of {url}: {e}")))?;
        logd!("Http: {} → {} bytes", url, body.len());
        self.body = Some(body);
        Ok(())
    }

    fn wait_render_settle(&mut self, _wait: Duration) -> Result<(), SessionError> {
        // Nothing renders after the response; waiting would only slow the batch.
        Ok(())
    }

    fn content(&mut self) -> Result<PageContent, SessionError> {
        self.body
            .clone()
            .map(PageContent::html_only)
            .ok_or_else(|| SessionError::Content(s!("no page loaded")))
    }

    fn close(&mut self) -> Result<(), SessionError> {
        self.body = None;
        Ok(())
    }
}
