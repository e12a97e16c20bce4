use crate::commands::{CmdMessage, CmdResult, Stores};
use crate::error::{EnvDeckError, Result};
use crate::store::StorageBackend;

/// The document attached to `name`.
pub fn show<B: StorageBackend>(stores: &Stores<B>, name: &str) -> Result<CmdResult> {
    let doc = stores
        .documents
        .get(name)?
        .ok_or_else(|| EnvDeckError::not_found(format!("No documentation for \"{}\"", name)))?;
    Ok(CmdResult::default().with_documents(vec![doc]))
}

/// Replaces the document content for an existing environment.
pub fn set<B: StorageBackend>(stores: &Stores<B>, name: &str, content: &str) -> Result<CmdResult> {
    if !stores.environments.list()?.iter().any(|e| e.name == name) {
        return Err(EnvDeckError::not_found(format!(
            "No environment named \"{}\"",
            name
        )));
    }

    let doc = if stores.documents.get(name)?.is_some() {
        stores.documents.update(name, content, false)?
    } else {
        stores.documents.add(name, content)?
    };

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Documentation saved for {}",
        name
    )));
    Ok(result.with_documents(vec![doc]))
}

pub fn list<B: StorageBackend>(stores: &Stores<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_documents(stores.documents.list()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::test_support::stores;

    #[test]
    fn set_and_show() {
        let stores = stores();
        create::run(&stores, "https://a.com", "A", false).unwrap();
        set(&stores, "A", "# A\n\nStaging box").unwrap();

        let shown = show(&stores, "A").unwrap();
        assert_eq!(shown.documents[0].content, "# A\n\nStaging box");
    }

    #[test]
    fn set_recreates_missing_document() {
        let stores = stores();
        create::run(&stores, "https://a.com", "A", false).unwrap();
        stores.documents.delete("A").unwrap();

        set(&stores, "A", "again").unwrap();
        assert_eq!(list(&stores).unwrap().documents.len(), 1);
    }

    #[test]
    fn set_requires_environment() {
        let stores = stores();
        assert!(matches!(
            set(&stores, "ghost", "x"),
            Err(EnvDeckError::NotFound(_))
        ));
        assert!(matches!(show(&stores, "ghost"), Err(EnvDeckError::NotFound(_))));
    }
}
