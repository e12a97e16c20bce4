use super::backend::StorageBackend;
use crate::error::{EnvDeckError, Result};
use crate::model::{Document, DocumentationsFile, Environment, EnvironmentsFile, StagedEdit};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

pub const ENVIRONMENTS_FILE: &str = "settings/environments.json";
pub const DOCUMENTS_FILE: &str = "docs/documentations.json";
pub const MARKER_FILE: &str = "modify.json";

#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn environments_path(&self) -> PathBuf {
        self.root.join(ENVIRONMENTS_FILE)
    }

    pub fn documents_path(&self) -> PathBuf {
        self.root.join(DOCUMENTS_FILE)
    }

    pub fn marker_path(&self) -> PathBuf {
        self.root.join(MARKER_FILE)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(EnvDeckError::Io)?;
        }
        Ok(())
    }

    fn read_json<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        if !path.exists() {
            return Ok(T::default());
        }
        debug!(path = %path.display(), "reading collection");
        let content = fs::read_to_string(path).map_err(EnvDeckError::Io)?;
        // A freshly created but never written file reads as an empty collection.
        if content.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&content).map_err(EnvDeckError::Serialization)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| EnvDeckError::Store(format!("No parent for {}", path.display())))?;
        self.ensure_dir(dir)?;

        let content = to_tab_indented_json(value)?;

        // Atomic write
        let tmp_path = dir.join(format!(".envdeck-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(EnvDeckError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(EnvDeckError::Io(e));
        }
        debug!(path = %path.display(), "wrote collection");
        Ok(())
    }
}

/// Pretty-prints with one tab per nesting level, matching the files the
/// desktop shell writes.
fn to_tab_indented_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut ser)
        .map_err(EnvDeckError::Serialization)?;
    out.push(b'\n');
    Ok(out)
}

impl StorageBackend for FsBackend {
    fn has_environments(&self) -> Result<bool> {
        Ok(self.environments_path().exists())
    }

    fn load_environments(&self) -> Result<Vec<Environment>> {
        let file: EnvironmentsFile = self.read_json(&self.environments_path())?;
        Ok(file.environments)
    }

    fn save_environments(&self, environments: &[Environment]) -> Result<()> {
        let file = EnvironmentsFile {
            environments: environments.to_vec(),
        };
        self.write_json(&self.environments_path(), &file)
    }

    fn has_documents(&self) -> Result<bool> {
        Ok(self.documents_path().exists())
    }

    fn load_documents(&self) -> Result<Vec<Document>> {
        let file: DocumentationsFile = self.read_json(&self.documents_path())?;
        Ok(file.documentations)
    }

    fn save_documents(&self, documents: &[Document]) -> Result<()> {
        let file = DocumentationsFile {
            documentations: documents.to_vec(),
        };
        self.write_json(&self.documents_path(), &file)
    }

    fn load_marker(&self) -> Result<Option<StagedEdit>> {
        let path = self.marker_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(EnvDeckError::Io)?;
        let staged: StagedEdit =
            serde_json::from_str(&content).map_err(EnvDeckError::Serialization)?;
        Ok(Some(staged))
    }

    fn save_marker(&self, staged: &StagedEdit) -> Result<()> {
        self.write_json(&self.marker_path(), staged)
    }

    fn clear_marker(&self) -> Result<bool> {
        let path = self.marker_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(EnvDeckError::Io)?;
        Ok(true)
    }

    fn location(&self) -> PathBuf {
        self.root.clone()
    }
}
