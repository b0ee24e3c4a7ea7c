// src/gui/components/pair_panel.rs
//
// Left panel: the pair list with per-pair status, plus "Forget" for the selected one.

use eframe::egui::{self, Color32, RichText};

use crate::gui::{
    actions,
    app::{App, PairStatus},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Pairs");

    if let Some(err) = &app.pairs_error {
        ui.colored_label(Color32::from_rgb(220, 30, 30), err);
        return;
    }

    let done = app.batch.completed_keys.len();
    ui.label(format!("{done}/{} extracted", app.pairs.len()));
    ui.separator();

    // Match the scroll bar aesthetics used in the main table
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    let mut clicked: Option<String> = None;
    egui::ScrollArea::vertical()
        .id_salt("pairs_panel_scroll")
        .max_height(ui.available_height() - 32.0)
        .show(ui, |ui| {
            for spec in &app.pairs {
                let (mark, color) = match app.pair_status(spec) {
                    PairStatus::Done => ("✔", Color32::from_rgb(60, 160, 60)),
                    PairStatus::Failed => ("✖", Color32::from_rgb(220, 30, 30)),
                    PairStatus::Pending => ("·", ui.visuals().weak_text_color()),
                };
                let selected = app.state.gui.selected_key.as_deref() == Some(spec.key());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(mark).color(color));
                    let resp = ui
                        .selectable_label(selected, spec.label())
                        .on_hover_text(spec.location.as_str());
                    if resp.clicked() {
                        clicked = Some(s!(spec.key()));
                    }
                });
            }
        });

    if let Some(key) = clicked {
        let gui = &mut app.state.gui;
        gui.selected_key = if gui.selected_key.as_deref() == Some(key.as_str()) { None } else { Some(key) };
    }

    ui.separator();
    let selected = app.state.gui.selected_key.clone();
    let can_forget = !app.running() && selected.as_deref().is_some_and(|k| app.batch.results.contains(k));
    if ui
        .add_enabled(can_forget, egui::Button::new("Forget"))
        .on_hover_text("Drop this pair's values so it is fetched again")
        .clicked()
    {
        if let Some(key) = selected {
            actions::forget(app, &key);
        }
    }
}
