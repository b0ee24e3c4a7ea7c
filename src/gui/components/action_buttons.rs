// src/gui/components/action_buttons.rs
//
// Run / Stop / Retry / Reset, progress bar and status line.

use eframe::egui::{self, ProgressBar, widgets::Spinner};

use crate::gui::{actions, app::App, progress};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let running = app.running();
    let stopping = app.worker.as_ref().is_some_and(|w| w.stop_requested());
    let has_pairs = !app.pairs.is_empty();
    let has_failed = !app.batch.failed_specs(&app.pairs).is_empty();

    ui.horizontal(|ui| {
        let red = egui::Color32::from_rgb(220, 30, 30);
        let black = egui::Color32::BLACK;

        let label = if app.batch.cursor > 0 && !app.batch.is_complete(&app.pairs) { "RESUME" } else { "RUN" };
        let button_run = ui.add_enabled(
            !running && has_pairs,
            egui::Button::new(egui::RichText::new(label).color(black).strong()).fill(red),
        );
        if button_run.clicked() {
            actions::run(app, ui.ctx());
        }

        if ui.add_enabled(running && !stopping, egui::Button::new("Stop")).clicked() {
            actions::stop(app);
        }

        if ui
            .add_enabled(!running && has_failed, egui::Button::new("Retry failed"))
            .on_hover_text("Fetch again every pair without data")
            .clicked()
        {
            actions::retry_failed(app, ui.ctx());
        }

        if ui
            .add_enabled(!running, egui::Button::new("Reset"))
            .on_hover_text("Clear all results and the saved run")
            .clicked()
        {
            actions::reset(app);
        }

        if running {
            ui.add(Spinner::new().size(16.0));
        }
    });

    let view = progress::lock(&app.progress).clone();
    ui.add(
        ProgressBar::new(view.fraction())
            .show_percentage()
            .animate(running),
    );
    ui.label(view.status);

    if !app.failed.is_empty() {
        let names: Vec<String> = app.failed.iter().map(|f| f.spec.label()).collect();
        ui.label(format!("Failed: {}", names.join(", ")))
            .on_hover_text(
                app.failed
                    .iter()
                    .map(|f| format!("{} ({} attempts): {}", f.spec.label(), f.attempts, f.reason))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
    }
}
