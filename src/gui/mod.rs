// src/gui/mod.rs
pub mod app;
pub mod progress;
pub mod worker;

mod actions;
mod components;

pub use app::run;
