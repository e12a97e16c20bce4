//! # CLI Layer
//!
//! One UI client for envdeck. This is the only place that parses
//! arguments, prints to the terminal or sets up logging.
//!
//! - `setup`: clap definitions
//! - `commands`: context setup and per-command handlers
//! - `render`: terminal output

mod commands;
mod render;
mod setup;

pub use commands::run;
