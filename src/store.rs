// src/store.rs
//! Local persistence for resumable runs.
//!
//! The batch state is written as JSON to `.store/batch_state.json` after every
//! chunk. It is tagged with the pair keys it was produced for, so resuming
//! against an edited pair list starts over instead of mixing cursors.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::batch::BatchState;
use crate::config::consts::{BATCH_STATE_FILE, STORE_DIR};
use crate::error::StoreError;
use crate::pairs::CurrencyPairSpec;

#[derive(Debug, Serialize, Deserialize)]
struct StoredRun {
    pairs: Vec<String>,
    state: BatchState,
}

#[derive(Clone, Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::at(PathBuf::from(STORE_DIR).join(BATCH_STATE_FILE))
    }
}

fn pair_keys(all: &[CurrencyPairSpec]) -> Vec<String> {
    all.iter().map(|s| s.label()).collect()
}

impl StateStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }

    /// Saved state for exactly this pair list, if any.
    /// A state saved for a different list is ignored (and logged).
    pub fn load_for(&self, all: &[CurrencyPairSpec]) -> Result<Option<BatchState>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let run: StoredRun = serde_json::from_str(&text)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })?;

        if run.pairs != pair_keys(all) {
            logw!("Store: saved state at {} is for a different pair list; ignoring", self.path.display());
            return Ok(None);
        }
        logf!(
            "Store: resuming at {}/{} with {} result(s)",
            run.state.cursor,
            all.len(),
            run.state.results.len()
        );
        Ok(Some(run.state))
    }

    /// Write through a sibling temp file so a crash mid-write keeps the old state.
    pub fn save(&self, state: &BatchState, all: &[CurrencyPairSpec]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }
        let run = StoredRun { pairs: pair_keys(all), state: state.clone() };
        let json = serde_json::to_string_pretty(&run)
            .map_err(|source| StoreError::Corrupt { path: self.path.clone(), source })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_err(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        logd!("Store: saved state (cursor {}) to {}", state.cursor, self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                logf!("Store: cleared {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_err(e)),
        }
    }
}
