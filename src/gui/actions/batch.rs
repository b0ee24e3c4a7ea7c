// src/gui/actions/batch.rs
use eframe::egui;

use crate::gui::{
    app::App,
    progress,
    worker::{Job, JobInput, Worker},
};

fn start(app: &mut App, job: Job, ctx: &egui::Context) {
    if app.running() {
        logd!("Batch: {job:?} clicked while running");
        return;
    }
    if app.pairs.is_empty() {
        app.status(app.pairs_error.clone().unwrap_or_else(|| s!("No pairs to process")));
        return;
    }

    let mut state = app.batch.clone();
    if job == Job::Run && state.is_complete(&app.pairs) {
        // Finished list: go round again; stored values survive failed refetches.
        state.cursor = 0;
    }

    {
        let mut v = progress::lock(&app.progress);
        v.done = state.cursor;
        v.total = app.pairs.len();
        v.status = match job {
            Job::Run => format!("Starting at {}/{}", state.cursor, app.pairs.len()),
            Job::Retry => s!("Retrying failed pairs"),
        };
    }

    logf!("Batch: {job:?} backend={} pairs={}", app.state.options.backend.label(), app.pairs.len());
    let input = JobInput {
        job,
        opts: app.state.options.clone(),
        pairs: app.pairs.clone(),
        state,
        store: app.store.clone(),
    };
    app.failed.clear();
    app.worker = Some(Worker::spawn(input, app.progress.clone(), ctx.clone()));
}

pub fn run(app: &mut App, ctx: &egui::Context) {
    start(app, Job::Run, ctx);
}

pub fn retry_failed(app: &mut App, ctx: &egui::Context) {
    if app.batch.failed_specs(&app.pairs).is_empty() {
        app.status("Nothing to retry");
        return;
    }
    start(app, Job::Retry, ctx);
}

pub fn stop(app: &mut App) {
    if let Some(w) = &app.worker {
        w.request_stop();
        app.status("Stopping after the current chunk...");
    }
}

/// Drop all results and the saved state.
pub fn reset(app: &mut App) {
    if app.running() {
        return;
    }
    let mut batch = std::mem::take(&mut app.batch);
    batch.reset();
    app.set_batch(batch);
    app.failed.clear();

    match app.store.clear() {
        Ok(()) => app.status("Reset"),
        Err(e) => {
            loge!("Batch: {e}");
            app.status(format!("Reset (could not clear saved state: {e})"));
        }
    }
    let mut v = progress::lock(&app.progress);
    v.done = 0;
    v.total = app.pairs.len();
}

/// Forget one pair so the next run or retry fetches it again.
pub fn forget(app: &mut App, key: &str) {
    if app.running() {
        return;
    }
    let mut batch = app.batch.clone();
    batch.forget(key);
    app.set_batch(batch);
    if let Err(e) = app.store.save(&app.batch, &app.pairs) {
        loge!("Batch: {e}");
    }
    logf!("Batch: forgot {key}");
    app.status(format!("Forgot {key}"));
}
