// src/gui/progress.rs
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use eframe::egui;

use crate::progress::Progress;

/// What the status line and progress bar show. Written by the worker, read by the UI.
#[derive(Clone, Debug, Default)]
pub struct ProgressView {
    pub status: String,
    pub done: usize,
    pub total: usize,
}

impl ProgressView {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 { 0.0 } else { self.done as f32 / self.total as f32 }
    }
}

pub type SharedProgress = Arc<Mutex<ProgressView>>;

/// A panicked worker must not take the status line down with it.
pub fn lock(view: &SharedProgress) -> MutexGuard<'_, ProgressView> {
    view.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct GuiProgress {
    view: SharedProgress,
    ctx: egui::Context,
}

impl GuiProgress {
    pub fn new(view: SharedProgress, ctx: egui::Context) -> Self {
        Self { view, ctx }
    }

    fn update(&self, f: impl FnOnce(&mut ProgressView)) {
        f(&mut lock(&self.view));
        self.ctx.request_repaint();
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.update(|v| v.total = total);
    }
    fn log(&mut self, msg: &str) {
        self.update(|v| v.status = s!(msg));
    }
    fn item_started(&mut self, done: usize, total: usize, label: &str) {
        self.update(|v| {
            v.done = done;
            v.total = total;
            v.status = format!("Extracting {label}... ({}/{total})", done + 1);
        });
    }
    fn item_done(&mut self, done: usize, total: usize, _label: &str) {
        self.update(|v| {
            v.done = done;
            v.total = total;
        });
    }
    fn item_failed(&mut self, done: usize, total: usize, label: &str) {
        self.update(|v| {
            v.done = done;
            v.total = total;
            v.status = format!("{label}: no data ({done}/{total})");
        });
    }
    fn finish(&mut self) {
        self.update(|v| {
            v.status = if v.total == 0 {
                s!("Extraction complete")
            } else {
                format!("Extraction complete ({}/{})", v.done, v.total)
            };
        });
    }
}
