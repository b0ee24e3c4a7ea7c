// src/session/chromium.rs
//! Headless Chromium backend (chromiumoxide).
//!
//! Each session launches its own browser process and tab and tears both down on
//! `close()`, so a wedged renderer never leaks into the next attempt. The async
//! CDP client runs on a private one-worker Tokio runtime; callers stay blocking.

use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig, HeadlessMode};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use super::{Browser, PageContent, Session};
use crate::config::consts::CHROMIUM_ENV;
use crate::error::SessionError;

const INNER_TEXT_JS: &str = "document.body ? document.body.innerText : ''";

/// Find the Chromium binary: `FX_SCRAPE_CHROMIUM`, then the usual names on `PATH`.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CHROMIUM_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
        logw!("Chromium: {CHROMIUM_ENV}={p} does not exist, searching PATH");
    }

    ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser", "chrome"]
        .iter()
        .find_map(|name| which::which(name).ok())
}

pub struct ChromiumBrowser {
    executable: PathBuf,
}

impl ChromiumBrowser {
    pub fn locate() -> Result<Self, SessionError> {
        let executable = find_chromium().ok_or_else(|| {
            SessionError::Open(format!("Chromium not found; install it or set {CHROMIUM_ENV}"))
        })?;
        logf!("Chromium: using {}", executable.display());
        Ok(Self { executable })
    }
}

impl Browser for ChromiumBrowser {
    type Session = ChromiumSession;

    fn open(&self) -> Result<ChromiumSession, SessionError> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| SessionError::Open(format!("runtime: {e}")))?;

        let config = BrowserConfig::builder()
            .chrome_executable(&self.executable)
            .headless_mode(HeadlessMode::New)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .build()
            .map_err(|e| SessionError::Open(format!("browser config: {e}")))?;

        let (browser, page, handler) = rt.block_on(async move {
            let (mut browser, mut handler) = CdpBrowser::launch(config)
                .await
                .map_err(|e| SessionError::Open(format!("launch: {e}")))?;

            let task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    let _ = event;
                }
            });

            match browser.new_page("about:blank").await {
                Ok(page) => Ok::<_, SessionError>((browser, page, task)),
                Err(e) => {
                    let _ = browser.close().await;
                    task.abort();
                    Err(SessionError::Open(format!("new page: {e}")))
                }
            }
        })?;

        Ok(ChromiumSession {
            rt,
            browser: Some(browser),
            page: Some(page),
            handler: Some(handler),
        })
    }

    fn name(&self) -> &'static str { "chromium" }
}

pub struct ChromiumSession {
    rt: Runtime,
    browser: Option<CdpBrowser>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, SessionError> {
        self.page.as_ref().ok_or_else(|| SessionError::Content(s!("session already closed")))
    }
}

impl Session for ChromiumSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), SessionError> {
        let page = self.page()?;
        let result = self
            .rt
            .block_on(async { tokio::time::timeout(timeout, page.goto(url)).await });

        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SessionError::Navigation { url: s!(url), reason: e.to_string() }),
            Err(_) => Err(SessionError::Timeout { url: s!(url), timeout_ms: timeout.as_millis() as u64 }),
        }
    }

    fn wait_render_settle(&mut self, wait: Duration) -> Result<(), SessionError> {
        // The CDP handler keeps running on the runtime's worker while we block here.
        std::thread::sleep(wait);
        Ok(())
    }

    fn content(&mut self) -> Result<PageContent, SessionError> {
        let page = self.page()?;
        self.rt.block_on(async {
            let html = page
                .content()
                .await
                .map_err(|e| SessionError::Content(format!("outerHTML: {e}")))?;

            // innerText keeps table cells tab-separated; missing text is not fatal.
            let text = match page.evaluate(INNER_TEXT_JS).await {
                Ok(v) => v.into_value::<String>().ok(),
                Err(e) => {
                    logd!("Chromium: innerText unavailable: {e}");
                    None
                }
            };
            Ok::<_, SessionError>(PageContent { html, text })
        })
    }

    fn close(&mut self) -> Result<(), SessionError> {
        let page = self.page.take();
        let browser = self.browser.take();
        let handler = self.handler.take();

        self.rt.block_on(async move {
            if let Some(page) = page {
                let _ = page.close().await;
            }
            let mut closed = Ok(());
            if let Some(mut browser) = browser {
                if let Err(e) = browser.close().await {
                    closed = Err(SessionError::Close(e.to_string()));
                }
                let _ = browser.wait().await;
            }
            if let Some(h) = handler {
                h.abort();
            }
            closed
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires Chromium to be installed
    fn chromium_reads_rendered_table() {
        let browser = ChromiumBrowser::locate().expect("chromium");
        let mut s = browser.open().expect("open");
        s.navigate(
            "data:text/html,<table><tr><td>Average</td><td>1</td><td>2</td><td>3</td></tr></table>",
            Duration::from_secs(10),
        )
        .expect("navigate");
        let page = s.content().expect("content");
        assert!(page.html.contains("Average"));
        assert!(page.text.unwrap_or_default().contains("Average\t1\t2\t3"));
        s.close().expect("close");
    }
}
