use super::backend::StorageBackend;
use crate::error::{EnvDeckError, Result};
use crate::model::Document;
use crate::validation::require;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// One markdown document per environment name.
pub struct DocumentStore<B: StorageBackend> {
    backend: B,
    lock: Mutex<()>,
}

impl<B: StorageBackend> DocumentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| EnvDeckError::Store("Document store lock poisoned".to_string()))
    }

    pub fn initialize(&self) -> Result<()> {
        let _guard = self.guard()?;
        if !self.backend.has_documents()? {
            self.backend.save_documents(&[])?;
            info!(location = %self.backend.location().display(), "created documents collection");
        }
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Document>> {
        let _guard = self.guard()?;
        self.backend.load_documents()
    }

    pub fn get(&self, name: &str) -> Result<Option<Document>> {
        Ok(self.list()?.into_iter().find(|d| d.name == name))
    }

    pub fn add(&self, name: &str, content: &str) -> Result<Document> {
        require("name", name)?;

        let _guard = self.guard()?;
        let mut entries = self.backend.load_documents()?;
        if entries.iter().any(|d| d.name == name) {
            return Err(EnvDeckError::conflict(format!(
                "\"{}\" already has a document; there is one document per environment",
                name
            )));
        }

        let doc = Document::new(name, content);
        entries.push(doc.clone());
        self.backend.save_documents(&entries)?;

        info!(name, "added document");
        Ok(doc)
    }

    /// Rewrites the document for `name`.
    ///
    /// With `renaming` false, `value` becomes the new content. With
    /// `renaming` true, `value` becomes the new name and the content is kept.
    /// The rewritten entry moves to the end; `created_at` is preserved.
    pub fn update(&self, name: &str, value: &str, renaming: bool) -> Result<Document> {
        require("name", name)?;
        if renaming {
            require("name", value)?;
        }

        let _guard = self.guard()?;
        let mut entries = self.backend.load_documents()?;
        let pos = entries
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| EnvDeckError::not_found(format!("No document for \"{}\"", name)))?;
        let found = entries.remove(pos);

        let target = if renaming { value } else { name };
        if entries.iter().any(|d| d.name == target) {
            return Err(EnvDeckError::conflict(format!(
                "A document for \"{}\" already exists",
                target
            )));
        }

        let doc = Document {
            name: target.to_string(),
            content: if renaming {
                found.content
            } else {
                value.to_string()
            },
            created_at: found.created_at,
            updated_at: Utc::now(),
        };
        entries.push(doc.clone());
        self.backend.save_documents(&entries)?;

        if renaming {
            info!(from = name, to = target, "renamed document");
        } else {
            info!(name, "updated document content");
        }
        Ok(doc)
    }

    /// Removes the document for `name`. Absent names are not an error.
    pub fn delete(&self, name: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut entries = self.backend.load_documents()?;
        let before = entries.len();
        entries.retain(|d| d.name != name);
        if entries.len() == before {
            debug!(name, "delete: no such document");
            return Ok(());
        }
        self.backend.save_documents(&entries)?;
        info!(name, "deleted document");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::fixtures::BackendFixture;
    use crate::store::mem_backend::MemBackend;

    fn store() -> DocumentStore<MemBackend> {
        let store = DocumentStore::with_backend(MemBackend::new());
        store.initialize().unwrap();
        store
    }

    #[test]
    fn add_sets_both_timestamps() {
        let store = store();
        let doc = store.add("A", "").unwrap();
        assert_eq!(doc.created_at, doc.updated_at);
        assert_eq!(store.list().unwrap(), vec![doc]);
    }

    #[test]
    fn one_document_per_environment() {
        let store = store();
        store.add("A", "").unwrap();
        assert!(matches!(
            store.add("A", "x"),
            Err(EnvDeckError::Conflict(_))
        ));
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.get("A").unwrap().unwrap().content, "");
    }

    #[test]
    fn add_requires_name() {
        let store = store();
        assert!(matches!(store.add("", "x"), Err(EnvDeckError::Validation(_))));
    }

    #[test]
    fn update_content_keeps_created_at() {
        let store = store();
        let original = store.add("A", "old").unwrap();
        let updated = store.update("A", "# new", false).unwrap();

        assert_eq!(updated.content, "# new");
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[test]
    fn rename_keeps_content() {
        let store = store();
        store.add("A", "body").unwrap();
        store.add("B", "").unwrap();

        let renamed = store.update("A", "A2", true).unwrap();
        assert_eq!(renamed.name, "A2");
        assert_eq!(renamed.content, "body");

        let names: Vec<_> = store.list().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["B", "A2"]);
    }

    #[test]
    fn rename_onto_existing_conflicts() {
        let store = store();
        store.add("A", "a").unwrap();
        store.add("B", "b").unwrap();
        assert!(matches!(
            store.update("A", "B", true),
            Err(EnvDeckError::Conflict(_))
        ));
        assert_eq!(store.get("A").unwrap().unwrap().content, "a");
    }

    #[test]
    fn update_missing_is_not_found() {
        let store = store();
        assert!(matches!(
            store.update("A", "x", false),
            Err(EnvDeckError::NotFound(_))
        ));
        assert!(matches!(
            store.update("", "x", false),
            Err(EnvDeckError::Validation(_))
        ));
    }

    #[test]
    fn delete_is_idempotent() {
        let fixture = BackendFixture::new()
            .with_document("A", "a")
            .with_document("B", "b");
        let store = DocumentStore::with_backend(fixture.backend);

        store.delete("A").unwrap();
        let after_first = store.list().unwrap();
        store.delete("A").unwrap();
        store.delete("never-existed").unwrap();

        assert_eq!(store.list().unwrap(), after_first);
        assert_eq!(after_first.len(), 1);
    }
}
