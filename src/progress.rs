// src/progress.rs
/// Progress reporting for long-running batch work.
/// Frontends (GUI/CLI) implement this to surface status to users.
///
/// Counts are passed explicitly on every call so a sink can be attached to any
/// chunk of a resumed run without keeping its own tally. For each processed pair
/// exactly one of `item_done` / `item_failed` is called, with `done` increasing.
pub trait Progress {
    /// Called at the start of a batch or chunk with the size of the whole run.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A pair is about to be fetched; `done` pairs are finished before it.
    fn item_started(&mut self, _done: usize, _total: usize, _label: &str) {}

    /// A pair was fetched and its averages recorded.
    fn item_done(&mut self, _done: usize, _total: usize, _label: &str) {}

    /// A pair ran out of attempts.
    fn item_failed(&mut self, _done: usize, _total: usize, _label: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Writes one line per pair to stderr (CLI).
pub struct StderrProgress;

impl Progress for StderrProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_started(&mut self, done: usize, total: usize, label: &str) {
        eprintln!("Extracting {label}... ({}/{total})", done + 1);
    }
    fn item_failed(&mut self, done: usize, total: usize, label: &str) {
        eprintln!("  {label}: no data ({done}/{total})");
    }
}
