//! # Command Layer
//!
//! Each module here implements one step of the workflow a UI drives:
//! creating an environment together with its document, removing both,
//! switching the active environment, the two-phase edit, and so on.
//!
//! Commands keep the two stores in step. The stores themselves know
//! nothing about each other.

use crate::config::EnvDeckConfig;
use crate::model::{Document, Environment, StagedEdit};
use crate::store::{DocumentStore, EnvironmentStore, StorageBackend};

pub mod config;
pub mod create;
pub mod docs;
pub mod edit;
pub mod init;
pub mod list;
pub mod remove;
pub mod switch;
pub mod update;

/// Both stores over one data root.
pub struct Stores<B: StorageBackend> {
    pub environments: EnvironmentStore<B>,
    pub documents: DocumentStore<B>,
}

impl<B: StorageBackend + Clone> Stores<B> {
    pub fn new(backend: B) -> Self {
        Self {
            environments: EnvironmentStore::with_backend(backend.clone()),
            documents: DocumentStore::with_backend(backend),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_environments: Vec<Environment>,
    pub listed_environments: Vec<Environment>,
    pub documents: Vec<Document>,
    pub staged: Option<StagedEdit>,
    pub config: Option<EnvDeckConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, environments: Vec<Environment>) -> Self {
        self.affected_environments = environments;
        self
    }

    pub fn with_listed(mut self, environments: Vec<Environment>) -> Self {
        self.listed_environments = environments;
        self
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = documents;
        self
    }

    pub fn with_staged(mut self, staged: StagedEdit) -> Self {
        self.staged = Some(staged);
        self
    }

    pub fn with_config(mut self, config: EnvDeckConfig) -> Self {
        self.config = Some(config);
        self
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Stores;
    use crate::store::mem_backend::MemBackend;

    pub fn stores() -> Stores<MemBackend> {
        let stores = Stores::new(MemBackend::new());
        super::init::run(&stores).unwrap();
        stores
    }
}
