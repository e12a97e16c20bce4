use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::{EnvDeckError, Result};
use crate::store::StorageBackend;

/// Deletes an environment and its document.
///
/// If the removed environment was active, the last remaining one takes
/// over so there is still an active environment while any exist.
pub fn run<B: StorageBackend>(stores: &Stores<B>, name: &str) -> Result<CmdResult> {
    let removed = stores
        .environments
        .delete(name)?
        .ok_or_else(|| EnvDeckError::not_found(format!("No environment named \"{}\"", name)))?;
    stores.documents.delete(name)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Environment deleted: {}",
        removed.name
    )));

    if removed.active {
        if let Some(last) = stores.environments.list()?.last() {
            let promoted = stores.environments.set(&last.name, false)?;
            result.add_message(CmdMessage::info(format!(
                "Active environment is now {}",
                promoted.name
            )));
        }
    }

    Ok(result.with_affected(vec![removed]))
}
