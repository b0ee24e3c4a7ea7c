// src/gui/components/data_table.rs
//
// Draws the live averages table: one row per window, one column per currency.
// Purely a view over `app.table`.

use eframe::egui::{self, Align, Layout, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{gui::app::App, types::Rate};

fn cell_text(rate: Option<&Rate>, raw: bool) -> String {
    match rate {
        None => s!("—"),
        Some(r) if raw => r.text.clone(),
        Some(r) => format!("{:.4}", r.value),
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let table = &app.table;
    let raw = app.state.gui.show_raw_text;
    let selected = app.state.gui.selected_key.as_deref();

    if table.is_empty() {
        ui.label("No results yet. Press RUN to extract the averages.");
        return;
    }

    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
    }

    egui::ScrollArea::horizontal()
        .id_salt("averages_table_hscroll")
        .show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::right_to_left(Align::Center))
                .column(Column::exact(70.0));
            for _ in &table.columns {
                builder = builder.column(Column::initial(80.0).at_least(50.0).resizable(true).clip(true));
            }

            builder
                .header(24.0, |mut header| {
                    header.col(|_| {});
                    for key in &table.columns {
                        header.col(|ui| {
                            let mut text = RichText::new(key).strong();
                            if selected == Some(key.as_str()) {
                                text = text.underline();
                            }
                            ui.label(text);
                        });
                    }
                })
                .body(|mut body| {
                    for row in &table.rows {
                        body.row(20.0, |mut tr| {
                            tr.col(|ui| {
                                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                    ui.label(RichText::new(&row.label).strong());
                                });
                            });
                            for cell in &row.cells {
                                tr.col(|ui| {
                                    let resp = ui.label(cell_text(cell.as_ref(), raw));
                                    if cell.is_none() {
                                        resp.on_hover_text("No value on the page");
                                    }
                                });
                            }
                        });
                    }
                });
        });
}
