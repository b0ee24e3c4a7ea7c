// src/gui/actions/copy.rs
use eframe::egui;

use crate::{config::options::ExportFormat, file, gui::app::App};

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    if app.table.is_empty() {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but there's nothing to copy");
        return;
    }

    // Spreadsheets paste tab-separated text into cells.
    let include_headers = app.state.options.export.include_headers;
    match file::to_export_string(&app.table, include_headers, ExportFormat::Tsv) {
        Ok(txt) => {
            logf!("Copy: columns={}, headers={}", app.table.ncols(), include_headers);
            ui_ctx.copy_text(txt);
            app.status("Copied to clipboard");
        }
        Err(e) => {
            loge!("Copy: {e}");
            app.status(format!("Copy error: {e}"));
        }
    }
}
