use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::Result;
use crate::model::EnvironmentPatch;
use crate::store::StorageBackend;

/// Patches the metadata of one environment.
///
/// A name change here does not carry the document along; renames that
/// should keep documentation go through the edit flow.
pub fn run<B: StorageBackend>(
    stores: &Stores<B>,
    name: &str,
    patch: EnvironmentPatch,
) -> Result<CmdResult> {
    let updated = stores.environments.update(name, patch)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Environment updated: {}",
        updated.name
    )));
    Ok(result.with_affected(vec![updated]))
}
