//! # Envdeck Architecture
//!
//! Envdeck keeps a list of named backend environments (name, url,
//! description), remembers which one is active, and stores one markdown
//! document per environment. It is a library first; the `envdeck` binary is
//! one client of it, a desktop shell is another.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Workflows spanning both stores (create, remove, edit)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - EnvironmentStore, DocumentStore                          │
//! │  - StorageBackend trait: FsBackend, MemBackend              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! - Environment names are unique, and so are urls.
//! - At most one environment is active after any completed operation.
//! - At most one document per environment name.
//! - A rejected operation writes nothing.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Workflows over both stores
//! - [`store`]: Stores and storage backends
//! - [`model`]: `Environment`, `Document`, patches and staged edits
//! - [`validation`]: URL shape and required-field checks
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod validation;
