use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::Result;
use crate::store::StorageBackend;

/// Prepares both collections. Safe to run on every start.
pub fn run<B: StorageBackend>(stores: &Stores<B>) -> Result<CmdResult> {
    stores.environments.initialize()?;
    stores.documents.initialize()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Data root: {}",
        stores.environments.backend().location().display()
    )));
    Ok(result)
}
