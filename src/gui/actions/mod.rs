// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{run, copy, export, ...}.

mod batch;   // src/gui/actions/batch.rs
mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs

pub use batch::{forget, reset, retry_failed, run, stop};
pub use copy::copy;
pub use export::export;

use crate::gui::app::App;

/// Fold a typed-in output path into the export options.
pub(super) fn sync_out_path(app: &mut App) {
    if app.out_path_dirty {
        app.state.options.export.set_path(&app.out_path_text);
        logf!("Export: Out path set → {}", app.state.options.export.out_path().display());
        app.out_path_dirty = false;
    }
}
