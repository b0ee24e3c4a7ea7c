// src/gui/worker.rs
//! Background batch thread. It owns the `BatchState` while running and hands a
//! copy back after every chunk; the UI only ever sees whole-chunk states.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use eframe::egui;

use crate::{
    batch::{BatchReport, BatchState},
    config::options::AppOptions,
    gui::progress::{GuiProgress, SharedProgress},
    pairs::CurrencyPairSpec,
    runner,
    store::StateStore,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Job {
    /// Continue from the cursor to the end of the list.
    Run,
    /// Only the pairs that have not succeeded yet.
    Retry,
}

pub enum WorkerMsg {
    Chunk(BatchState),
    Finished { state: BatchState, report: BatchReport, stopped: bool },
    Failed { state: BatchState, error: String },
}

pub enum Poll {
    Idle,
    Msg(WorkerMsg),
    /// Channel closed without a final message (the thread panicked).
    Died,
}

pub struct Worker {
    stop: Arc<AtomicBool>,
    rx: Receiver<WorkerMsg>,
    handle: Option<JoinHandle<()>>,
}

pub struct JobInput {
    pub job: Job,
    pub opts: AppOptions,
    pub pairs: Vec<CurrencyPairSpec>,
    pub state: BatchState,
    pub store: StateStore,
}

impl Worker {
    pub fn spawn(input: JobInput, view: SharedProgress, ctx: egui::Context) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let JobInput { job, opts, pairs, mut state, store } = input;
            logf!("Worker: {job:?} start at {}/{}", state.cursor, pairs.len());

            let fetcher = match runner::build_fetcher(&opts) {
                Ok(f) => f,
                Err(e) => {
                    loge!("Worker: {e:#}");
                    let _ = tx.send(WorkerMsg::Failed { state, error: format!("{e:#}") });
                    ctx.request_repaint();
                    return;
                }
            };

            let mut progress = GuiProgress::new(view, ctx.clone());
            let send_chunk = |s: &BatchState, _: &BatchReport| {
                let _ = tx.send(WorkerMsg::Chunk(s.clone()));
                ctx.request_repaint();
            };
            let (report, stopped) = match job {
                Job::Run => {
                    let report = runner::run_batch(
                        &opts, &store, &pairs, &mut state, &fetcher, Some(&mut progress), &stop_flag, send_chunk,
                    );
                    (report, !state.is_complete(&pairs))
                }
                Job::Retry => {
                    let pending = state.failed_specs(&pairs).len();
                    let report = runner::retry_batch(
                        &opts, &store, &pairs, &mut state, &fetcher, Some(&mut progress), &stop_flag, send_chunk,
                    );
                    let stopped = report.processed() < pending;
                    (report, stopped)
                }
            };

            logf!("Worker: {job:?} done ok={} failed={} stopped={stopped}", report.succeeded, report.failed.len());
            let _ = tx.send(WorkerMsg::Finished { state, report, stopped });
            ctx.request_repaint();
        });

        Self { stop, rx, handle: Some(handle) }
    }

    /// Ask the worker to stop after the current chunk.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub fn poll(&mut self) -> Poll {
        match self.rx.try_recv() {
            Ok(msg) => Poll::Msg(msg),
            Err(TryRecvError::Empty) => Poll::Idle,
            Err(TryRecvError::Disconnected) => {
                if let Some(h) = self.handle.take() {
                    let _ = h.join();
                }
                Poll::Died
            }
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        self.request_stop();
    }
}
