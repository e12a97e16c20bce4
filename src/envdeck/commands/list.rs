use crate::commands::{CmdResult, Stores};
use crate::error::Result;
use crate::store::StorageBackend;

/// All environments in stored order, with their documents.
pub fn run<B: StorageBackend>(stores: &Stores<B>) -> Result<CmdResult> {
    let environments = stores.environments.list()?;
    let documents = stores.documents.list()?;
    Ok(CmdResult::default()
        .with_listed(environments)
        .with_documents(documents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::commands::test_support::stores;

    #[test]
    fn lists_in_stored_order() {
        let stores = stores();
        create::run(&stores, "https://b.com", "B", false).unwrap();
        create::run(&stores, "https://a.com", "A", false).unwrap();

        let result = run(&stores).unwrap();
        let names: Vec<_> = result
            .listed_environments
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(result.documents.len(), 2);
    }
}
