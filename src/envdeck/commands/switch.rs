use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::Result;
use crate::store::StorageBackend;

/// Makes `name` the active environment.
pub fn set<B: StorageBackend>(stores: &Stores<B>, name: &str) -> Result<CmdResult> {
    let target = stores.environments.set(name, true)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Active environment: {} ({})",
        target.name, target.url
    )));
    Ok(result.with_affected(vec![target]))
}

/// Leaves no environment active.
pub fn unset<B: StorageBackend>(stores: &Stores<B>) -> Result<CmdResult> {
    let previous = stores.environments.active()?;
    let entries = stores.environments.unset()?;

    let mut result = CmdResult::default();
    match previous {
        Some(env) => result.add_message(CmdMessage::success(format!(
            "{} is no longer active",
            env.name
        ))),
        None => result.add_message(CmdMessage::info("No environment was active")),
    }
    Ok(result.with_listed(entries))
}

/// Reports the active environment, if any.
pub fn active<B: StorageBackend>(stores: &Stores<B>) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match stores.environments.active()? {
        Some(env) => Ok(result.with_listed(vec![env])),
        None => {
            result.add_message(CmdMessage::info("No active environment"));
            Ok(result)
        }
    }
}
