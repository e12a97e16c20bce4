use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::Result;
use crate::store::StorageBackend;
use tracing::warn;

/// Adds an environment and its empty document.
pub fn run<B: StorageBackend>(
    stores: &Stores<B>,
    url: &str,
    name: &str,
    active: bool,
) -> Result<CmdResult> {
    run_with_description(stores, url, name, active, None)
}

pub fn run_with_description<B: StorageBackend>(
    stores: &Stores<B>,
    url: &str,
    name: &str,
    active: bool,
    description: Option<&str>,
) -> Result<CmdResult> {
    let created = stores
        .environments
        .add_with_description(url, name, active, description)?;

    let mut result = CmdResult::default();
    // A document left behind by an earlier crash is adopted rather than
    // failing after the environment was already written.
    if stores.documents.get(name)?.is_some() {
        warn!(name, "document already present, keeping it");
        result.add_message(CmdMessage::warning(format!(
            "Kept existing documentation for {}",
            name
        )));
    } else {
        stores.documents.add(name, "")?;
    }

    result.add_message(CmdMessage::success(format!(
        "Environment created: {} ({})",
        created.name, created.url
    )));
    Ok(result.with_affected(vec![created]))
}
