//! Two-phase edit of an environment.
//!
//! `begin` captures the record as it is now and persists it as the edit
//! marker, so an edit survives the caller moving between views (or
//! processes). `commit` applies the replacement against the captured name,
//! clears the marker and carries the document over to the new name.
//!
//! Only one edit can be staged at a time; a second `begin` replaces the
//! first.

use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::{EnvDeckError, Result};
use crate::model::{EnvironmentEdit, StagedEdit};
use crate::store::StorageBackend;
use tracing::info;

pub fn begin<B: StorageBackend>(stores: &Stores<B>, name: &str) -> Result<CmdResult> {
    let item = stores
        .environments
        .list()?
        .into_iter()
        .find(|e| e.name == name)
        .ok_or_else(|| EnvDeckError::not_found(format!("No environment named \"{}\"", name)))?;

    let staged = StagedEdit { item };
    stores.environments.backend().save_marker(&staged)?;
    info!(name, "staged edit");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Editing {}", name)));
    Ok(result.with_staged(staged))
}

/// The edit left staged by an earlier `begin`, if any.
pub fn resume<B: StorageBackend>(stores: &Stores<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match stores.environments.backend().load_marker()? {
        Some(staged) => Ok(result.with_staged(staged)),
        None => {
            result.add_message(CmdMessage::info("No edit in progress"));
            Ok(result)
        }
    }
}

/// Applies `replacement` to the staged environment.
///
/// `content`, when given, becomes the document body under the (possibly
/// new) name. When omitted the existing body is kept. A rename onto a name
/// that already has a document is a `Conflict` and leaves the edit staged.
pub fn commit<B: StorageBackend>(
    stores: &Stores<B>,
    staged: &StagedEdit,
    replacement: EnvironmentEdit,
    content: Option<&str>,
) -> Result<CmdResult> {
    let old_name = staged.name();
    let docs = &stores.documents;

    // The document rename must not fail once the environment is saved.
    if replacement.name != old_name && docs.get(&replacement.name)?.is_some() {
        return Err(EnvDeckError::conflict(format!(
            "A document for \"{}\" already exists",
            replacement.name
        )));
    }

    let edited = stores.environments.edit(old_name, replacement)?;
    stores.environments.backend().clear_marker()?;

    if edited.name != old_name {
        if docs.get(old_name)?.is_some() {
            docs.update(old_name, &edited.name, true)?;
        } else {
            docs.add(&edited.name, "")?;
        }
    } else if docs.get(&edited.name)?.is_none() {
        docs.add(&edited.name, "")?;
    }
    if let Some(content) = content {
        docs.update(&edited.name, content, false)?;
    }

    let mut result = CmdResult::default();
    if edited.name != old_name {
        result.add_message(CmdMessage::success(format!(
            "Environment renamed: {} -> {}",
            old_name, edited.name
        )));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Environment edited: {}",
            edited.name
        )));
    }
    Ok(result.with_affected(vec![edited]))
}
