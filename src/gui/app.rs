// src/gui/app.rs
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::{
    batch::{BatchState, FailedSpec},
    config::state::AppState,
    pairs::{self, CurrencyPairSpec},
    store::StateStore,
    table::Table,
};

use super::{
    progress::{self, ProgressView, SharedProgress},
    worker::{Poll, Worker, WorkerMsg},
};

pub fn run(options: eframe::NativeOptions) -> eframe::Result<()> {
    eframe::run_native(
        "FX Averages Scraper",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )
}

/// Where a pair stands in the current batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairStatus {
    Pending,
    Done,
    Failed,
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    pub pairs: Vec<CurrencyPairSpec>,
    pub pairs_error: Option<String>,

    // last state handed back by the worker (or loaded from disk)
    pub batch: BatchState,
    pub table: Table,
    pub failed: Vec<FailedSpec>,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    pub store: StateStore,

    // status/progress (worker writes here)
    pub progress: SharedProgress,
    pub worker: Option<Worker>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        let store = StateStore::default();
        let out_path_text = state.options.export.out_path().to_string_lossy().into();

        let (pairs, pairs_error) = match pairs::load(&state.options.batch.pairs_file) {
            Ok(p) => (p, None),
            Err(e) => {
                loge!("Init: {e}");
                (Vec::new(), Some(e.to_string()))
            }
        };

        let mut status = if pairs_error.is_some() { s!("Pair list not loaded") } else { s!("Idle") };

        // Previous run for the same pair list, if any
        let batch = match store.load_for(&pairs) {
            Ok(Some(b)) => {
                status = format!("Loaded saved run ({}/{})", b.cursor.min(pairs.len()), pairs.len());
                b
            }
            Ok(None) => BatchState::default(),
            Err(e) => {
                loge!("Init: {e}");
                BatchState::default()
            }
        };

        logf!("Init: pairs={}, saved results={}", pairs.len(), batch.results.len());

        let table = batch.snapshot_for(&pairs);
        let progress = Arc::new(Mutex::new(ProgressView {
            status,
            done: batch.cursor.min(pairs.len()),
            total: pairs.len(),
        }));

        Self {
            state,
            pairs,
            pairs_error,
            batch,
            table,
            failed: Vec::new(),
            out_path_text,
            out_path_dirty: false,
            store,
            progress,
            worker: None,
        }
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn running(&self) -> bool { self.worker.is_some() }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        progress::lock(&self.progress).status = msg.into();
    }

    pub fn status_text(&self) -> String {
        progress::lock(&self.progress).status.clone()
    }

    pub fn pair_status(&self, spec: &CurrencyPairSpec) -> PairStatus {
        if self.batch.completed_keys.contains(spec.key()) {
            PairStatus::Done
        } else if self.batch.results.contains(spec.key()) {
            PairStatus::Failed
        } else {
            PairStatus::Pending
        }
    }

    /// Replace the UI copy of the batch and rebuild the table view.
    pub fn set_batch(&mut self, batch: BatchState) {
        self.batch = batch;
        self.table = self.batch.snapshot_for(&self.pairs);
    }

    /// Apply whatever the worker has sent since the last frame.
    fn drain_worker(&mut self) {
        let Some(worker) = self.worker.as_mut() else { return };

        let mut msgs = Vec::new();
        let died = loop {
            match worker.poll() {
                Poll::Idle => break false,
                Poll::Msg(m) => msgs.push(m),
                Poll::Died => break true,
            }
        };

        for msg in msgs {
            match msg {
                WorkerMsg::Chunk(state) => self.set_batch(state),
                WorkerMsg::Finished { state, report, stopped } => {
                    let msg = if stopped {
                        format!(
                            "Stopped: {} ok, {} failed, {} unfinished",
                            report.succeeded,
                            report.failed.len(),
                            state.failed_specs(&self.pairs).len()
                        )
                    } else if report.failed.is_empty() {
                        format!("Done: {} pair(s) extracted", report.succeeded)
                    } else {
                        format!("Done: {} ok, {} failed", report.succeeded, report.failed.len())
                    };
                    self.failed = report.failed;
                    self.set_batch(state);
                    self.worker = None;
                    self.status(msg);
                }
                WorkerMsg::Failed { state, error } => {
                    self.set_batch(state);
                    self.worker = None;
                    self.status(format!("Error: {error}"));
                }
            }
        }

        if died && self.worker.is_some() {
            loge!("Worker: exited without a result");
            self.worker = None;
            self.status("Error: worker stopped unexpectedly");
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_worker();

        egui::SidePanel::left("pairs")
            .resizable(false)
            .show(ctx, |ui| {
                crate::gui::components::pair_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::action_buttons::draw(ui, self);

            ui.separator();

            crate::gui::components::export_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::data_table::draw(ui, self);
        });
    }
}
