// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod specs;
pub mod types;

pub mod batch;
pub mod fetch;
pub mod pairs;
pub mod session;
pub mod table;

pub mod file;
pub mod progress;
pub mod runner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;
