use super::backend::StorageBackend;
use crate::error::{EnvDeckError, Result};
use crate::model::{Document, Environment, StagedEdit};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct MemState {
    environments: Option<Vec<Environment>>,
    documents: Option<Vec<Document>>,
    marker: Option<StagedEdit>,
}

/// In-memory storage backend for testing.
///
/// Clones share the same state, so an `EnvironmentStore` and a
/// `DocumentStore` built from clones of one backend see one data root.
#[derive(Clone, Default)]
pub struct MemBackend {
    state: Arc<Mutex<MemState>>,
    simulate_write_error: Arc<AtomicBool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    fn state(&self) -> Result<MutexGuard<'_, MemState>> {
        self.state
            .lock()
            .map_err(|_| EnvDeckError::Store("Memory backend lock poisoned".to_string()))
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(EnvDeckError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn has_environments(&self) -> Result<bool> {
        Ok(self.state()?.environments.is_some())
    }

    fn load_environments(&self) -> Result<Vec<Environment>> {
        Ok(self.state()?.environments.clone().unwrap_or_default())
    }

    fn save_environments(&self, environments: &[Environment]) -> Result<()> {
        self.check_write()?;
        self.state()?.environments = Some(environments.to_vec());
        Ok(())
    }

    fn has_documents(&self) -> Result<bool> {
        Ok(self.state()?.documents.is_some())
    }

    fn load_documents(&self) -> Result<Vec<Document>> {
        Ok(self.state()?.documents.clone().unwrap_or_default())
    }

    fn save_documents(&self, documents: &[Document]) -> Result<()> {
        self.check_write()?;
        self.state()?.documents = Some(documents.to_vec());
        Ok(())
    }

    fn load_marker(&self) -> Result<Option<StagedEdit>> {
        Ok(self.state()?.marker.clone())
    }

    fn save_marker(&self, staged: &StagedEdit) -> Result<()> {
        self.check_write()?;
        self.state()?.marker = Some(staged.clone());
        Ok(())
    }

    fn clear_marker(&self) -> Result<bool> {
        Ok(self.state()?.marker.take().is_some())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://envdeck")
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;

    /// Builds a `MemBackend` with environments already in place.
    pub struct BackendFixture {
        pub backend: MemBackend,
    }

    impl Default for BackendFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BackendFixture {
        pub fn new() -> Self {
            Self {
                backend: MemBackend::new(),
            }
        }

        pub fn with_environments(self, count: usize) -> Self {
            let mut envs = self.backend.load_environments().unwrap();
            for i in 0..count {
                envs.push(Environment::new(
                    format!("env-{}", i + 1),
                    format!("https://env-{}.example.com", i + 1),
                ));
            }
            self.backend.save_environments(&envs).unwrap();
            self
        }

        pub fn with_active(self, name: &str, url: &str) -> Self {
            let mut envs = self.backend.load_environments().unwrap();
            for env in envs.iter_mut() {
                env.active = false;
            }
            envs.push(Environment::new(name, url).with_active(true));
            self.backend.save_environments(&envs).unwrap();
            self
        }

        pub fn with_document(self, name: &str, content: &str) -> Self {
            let mut docs = self.backend.load_documents().unwrap();
            docs.push(Document::new(name, content));
            self.backend.save_documents(&docs).unwrap();
            self
        }

        pub fn with_marker(self, item: Environment) -> Self {
            self.backend.save_marker(&StagedEdit { item }).unwrap();
            self
        }
    }
}
