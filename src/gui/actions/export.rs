// src/gui/actions/export.rs
use crate::{file, gui::app::App};

pub fn export(app: &mut App) {
    // normalize out_path first (mutates app) before any &app borrows
    super::sync_out_path(app);

    if app.table.is_empty() {
        logd!("Export: Clicked, but there's nothing to export");
        app.status("Nothing to export");
        return;
    }

    let export = &app.state.options.export;
    logf!(
        "Export: Begin columns={}, format={:?}, headers={}",
        app.table.ncols(),
        export.format,
        export.include_headers
    );

    let msg = match file::write_export(export, &app.table) {
        Ok(path) => {
            logf!("Export: OK → {}", path.display());
            format!("Exported {}", path.display())
        }
        Err(e) => {
            loge!("Export: Error: {e}");
            format!("Export error: {e}")
        }
    };
    app.status(msg);
}
