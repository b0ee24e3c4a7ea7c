// src/config/consts.rs

// Input
pub const DEFAULT_PAIRS_FILE: &str = "sgd_exchange_rates.json";

// Fetch
pub const MAX_ATTEMPTS: u32 = 3;
pub const NAV_TIMEOUT_MS: u64 = 60_000;
pub const RENDER_WAIT_MS: u64 = 8_000; // let client-side script populate the stats table
pub const BACKOFF_MS: u64 = 2_000;
pub const BACKOFF_MAX_MS: u64 = 30_000;
pub const USER_AGENT: &str = concat!("fx_scrape/", env!("CARGO_PKG_VERSION"));

// Page layout
pub const AVERAGE_LABEL: &str = "Average";
pub const CELL_ROW_SELECTOR: &str = "div.flex.flex-row";
pub const CELL_SELECTOR: &str = "span";

// Batch
pub const DEFAULT_CHUNK_SIZE: usize = 5;

// Snapshot row labels, in output order
pub const ROW_LABELS: [&str; 3] = ["7days", "30days", "90days"];

// Local state
pub const STORE_DIR: &str = ".store";
pub const BATCH_STATE_FILE: &str = "batch_state.json";
pub const LOG_FILE: &str = "debug.log";
pub const LOG_ENV: &str = "FX_SCRAPE_LOG";
pub const CHROMIUM_ENV: &str = "FX_SCRAPE_CHROMIUM";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "currency_averages_matrix";
