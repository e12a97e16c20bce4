use crate::error::Result;
use crate::model::{Document, Environment, StagedEdit};
use std::path::PathBuf;

/// Abstract interface for raw collection I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `EnvironmentStore` and `DocumentStore` handle the "what" (validation,
/// uniqueness, the active flag).
///
/// Every load returns the full collection and every save replaces it
/// whole. Implementations must not cache: a load after an external edit
/// has to observe that edit.
pub trait StorageBackend: Send + Sync {
    // --- Environments ---

    /// Whether the environments collection has been created.
    fn has_environments(&self) -> Result<bool>;

    /// Load the environments collection. A missing collection reads as empty.
    fn load_environments(&self) -> Result<Vec<Environment>>;

    /// Replace the environments collection.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_environments(&self, environments: &[Environment]) -> Result<()>;

    // --- Documents ---

    fn has_documents(&self) -> Result<bool>;

    fn load_documents(&self) -> Result<Vec<Document>>;

    /// Replace the documents collection. Same atomicity rule as environments.
    fn save_documents(&self, documents: &[Document]) -> Result<()>;

    // --- Staged edit marker ---

    /// Returns Ok(None) if no edit is staged.
    fn load_marker(&self) -> Result<Option<StagedEdit>>;

    fn save_marker(&self, staged: &StagedEdit) -> Result<()>;

    /// Remove the marker. Returns true if one was present.
    fn clear_marker(&self) -> Result<bool>;

    // --- Paths ---

    /// Where the data lives. For FsBackend the data root, for MemBackend a virtual path.
    fn location(&self) -> PathBuf;
}
