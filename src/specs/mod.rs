//! # Scraping “specs” module
//!
//! Page-specific knowledge: *where the numbers live in the rendered page* and
//! *how to read them robustly*.
//!
//! ## What lives here
//! - **Pure parsing** of already-rendered content (no network, no browser).
//! - **Layout selection**: the statistics block has appeared both as tab-delimited
//!   text rows and as element rows with per-cell spans; `LayoutStrategy` picks one.
//!
//! ## What does **not** live here
//! - Retrying, sessions, timeouts (`fetch`, `session`).
//! - Accumulating results across pairs (`batch`).
//! - Export formatting (`table`, `file`).
//!
//! ## Typical call chain
//! ```text
//! batch::process_batch → fetch::ResilientFetcher → session (navigate + content)
//!                                                ↘ specs::averages::extract_page
//! ```
//!
//! ## Testing notes
//! - Specs are tested offline against inline HTML/text fixtures.
pub mod averages;
