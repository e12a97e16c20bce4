//! # Storage Layer
//!
//! Two stores sit on top of one [`StorageBackend`]:
//!
//! - [`EnvironmentStore`]: environment records, uniqueness on name and url,
//!   at most one active record.
//! - [`DocumentStore`]: one markdown document per environment name.
//!
//! The stores own the rules; the backend only moves whole collections in
//! and out of storage.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: JSON files under a data root
//! - [`mem_backend::MemBackend`]: in-memory, for tests
//!
//! ## Storage Format
//!
//! For `FsBackend`:
//! ```text
//! <root>/
//! ├── settings/environments.json   # { "environments": [...] }
//! ├── docs/documentations.json     # { "documentations": [...] }
//! └── modify.json                  # staged edit, only while an edit is open
//! ```

pub mod backend;
pub mod documents;
pub mod environments;
pub mod fs_backend;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use documents::DocumentStore;
pub use environments::EnvironmentStore;
