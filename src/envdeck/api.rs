//! # API Facade
//!
//! The single entry point for every envdeck operation, whatever the UI.
//! A desktop shell, the bundled CLI and tests all talk to [`EnvDeckApi`].
//!
//! The facade dispatches to `commands/*.rs` and returns `Result<CmdResult>`.
//! It holds no business rules and does no terminal I/O.
//!
//! ## Generic Over StorageBackend
//!
//! - Production: `EnvDeckApi<FsBackend>`
//! - Testing: `EnvDeckApi<MemBackend>`
//!
//! ## Caller contract
//!
//! Environments and documents are kept in step by going through the
//! workflow methods here (`create_environment`, `remove_environment`,
//! `begin_edit`/`commit_edit`) rather than the raw stores.

use crate::commands::{self, Stores};
use crate::error::Result;
use crate::model::{EnvironmentEdit, EnvironmentPatch, StagedEdit};
use crate::store::{DocumentStore, EnvironmentStore, StorageBackend};
use std::path::PathBuf;

/// The main API facade for envdeck operations.
pub struct EnvDeckApi<B: StorageBackend> {
    stores: Stores<B>,
    config_dir: PathBuf,
}

impl<B: StorageBackend + Clone> EnvDeckApi<B> {
    pub fn new(backend: B, config_dir: PathBuf) -> Self {
        Self {
            stores: Stores::new(backend),
            config_dir,
        }
    }
}

impl<B: StorageBackend> EnvDeckApi<B> {
    pub fn init(&self) -> Result<commands::CmdResult> {
        commands::init::run(&self.stores)
    }

    pub fn list(&self) -> Result<commands::CmdResult> {
        commands::list::run(&self.stores)
    }

    pub fn create_environment(
        &self,
        url: &str,
        name: &str,
        active: bool,
        description: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::create::run_with_description(&self.stores, url, name, active, description)
    }

    pub fn remove_environment(&self, name: &str) -> Result<commands::CmdResult> {
        commands::remove::run(&self.stores, name)
    }

    pub fn switch_active(&self, name: &str) -> Result<commands::CmdResult> {
        commands::switch::set(&self.stores, name)
    }

    pub fn clear_active(&self) -> Result<commands::CmdResult> {
        commands::switch::unset(&self.stores)
    }

    pub fn active(&self) -> Result<commands::CmdResult> {
        commands::switch::active(&self.stores)
    }

    pub fn update_environment(
        &self,
        name: &str,
        patch: EnvironmentPatch,
    ) -> Result<commands::CmdResult> {
        commands::update::run(&self.stores, name, patch)
    }

    pub fn begin_edit(&self, name: &str) -> Result<commands::CmdResult> {
        commands::edit::begin(&self.stores, name)
    }

    pub fn resume_edit(&self) -> Result<commands::CmdResult> {
        commands::edit::resume(&self.stores)
    }

    pub fn commit_edit(
        &self,
        staged: &StagedEdit,
        replacement: EnvironmentEdit,
        content: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::edit::commit(&self.stores, staged, replacement, content)
    }

    pub fn show_document(&self, name: &str) -> Result<commands::CmdResult> {
        commands::docs::show(&self.stores, name)
    }

    pub fn set_document(&self, name: &str, content: &str) -> Result<commands::CmdResult> {
        commands::docs::set(&self.stores, name, content)
    }

    pub fn list_documents(&self) -> Result<commands::CmdResult> {
        commands::docs::list(&self.stores)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    pub fn environments(&self) -> &EnvironmentStore<B> {
        &self.stores.environments
    }

    pub fn documents(&self) -> &DocumentStore<B> {
        &self.stores.documents
    }

    pub fn location(&self) -> PathBuf {
        self.stores.environments.backend().location()
    }
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};
