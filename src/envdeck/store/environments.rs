use super::backend::StorageBackend;
use crate::error::{EnvDeckError, Result};
use crate::model::{Environment, EnvironmentEdit, EnvironmentPatch};
use crate::validation::{self, require, require_url};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// CRUD and active-selection over the environments collection.
///
/// Every operation is a full load → mutate → save cycle against the backend.
/// The internal lock serializes those cycles, so one store can be shared
/// across threads without lost updates.
pub struct EnvironmentStore<B: StorageBackend> {
    backend: B,
    lock: Mutex<()>,
}

impl<B: StorageBackend> EnvironmentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| EnvDeckError::Store("Environment store lock poisoned".to_string()))
    }

    /// Creates the collection if missing and drops any stale edit marker.
    /// Safe to call on every start.
    pub fn initialize(&self) -> Result<()> {
        let _guard = self.guard()?;
        if !self.backend.has_environments()? {
            self.backend.save_environments(&[])?;
            info!(location = %self.backend.location().display(), "created environments collection");
        }
        if self.backend.clear_marker()? {
            warn!("removed stale edit marker");
        }
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Environment>> {
        let _guard = self.guard()?;
        self.backend.load_environments()
    }

    pub fn add(&self, url: &str, name: &str, active: bool) -> Result<Environment> {
        self.add_with_description(url, name, active, None)
    }

    /// Like [`add`](Self::add), with the description written in the same save.
    pub fn add_with_description(
        &self,
        url: &str,
        name: &str,
        active: bool,
        description: Option<&str>,
    ) -> Result<Environment> {
        require_url(url)?;
        require("name", name)?;

        let _guard = self.guard()?;
        let mut entries = self.backend.load_environments()?;
        check_unique(&entries, Some(name), Some(url), None)?;

        if active && !entries.is_empty() {
            clear_active(&mut entries);
        }

        let mut entry = Environment::new(name, url).with_active(active);
        entry.description = description.map(str::to_string);
        entries.push(entry.clone());
        self.backend.save_environments(&entries)?;

        info!(name, url, active, "added environment");
        Ok(entry)
    }

    /// Applies `patch` to the record named `search_name`, in place.
    ///
    /// Omitted fields keep their current value. Turning `active` on clears
    /// it everywhere else.
    pub fn update(&self, search_name: &str, patch: EnvironmentPatch) -> Result<Environment> {
        if !patch.has_key_fields() {
            return Err(EnvDeckError::validation(
                "Please provide one of the parameters \"url\", \"name\" or \"active\".",
            ));
        }
        if let Some(url) = patch.url.as_deref() {
            require_url(url)?;
        }
        if let Some(name) = patch.name.as_deref() {
            require("name", name)?;
        }

        let _guard = self.guard()?;
        let mut entries = self.backend.load_environments()?;
        let pos = position(&entries, search_name)?;
        check_unique(
            &entries,
            patch.name.as_deref(),
            patch.url.as_deref(),
            Some(pos),
        )?;

        if patch.active == Some(true) {
            for (i, entry) in entries.iter_mut().enumerate() {
                if i != pos {
                    entry.active = false;
                }
            }
        }

        let entry = &mut entries[pos];
        if let Some(name) = patch.name {
            entry.name = name;
        }
        if let Some(url) = patch.url {
            entry.url = url;
        }
        if let Some(active) = patch.active {
            entry.active = active;
        }
        if let Some(description) = patch.description {
            entry.description = description;
        }
        let updated = entry.clone();

        self.backend.save_environments(&entries)?;
        info!(search_name, name = %updated.name, "updated environment");
        Ok(updated)
    }

    /// Removes the record named `name`. Returns it, or `None` if there was none.
    pub fn delete(&self, name: &str) -> Result<Option<Environment>> {
        require("name", name)?;

        let _guard = self.guard()?;
        let mut entries = self.backend.load_environments()?;
        let Some(pos) = entries.iter().position(|e| e.name == name) else {
            debug!(name, "delete: no such environment");
            return Ok(None);
        };
        let removed = entries.remove(pos);
        self.backend.save_environments(&entries)?;

        info!(name, "deleted environment");
        Ok(Some(removed))
    }

    pub fn active(&self) -> Result<Option<Environment>> {
        let _guard = self.guard()?;
        let entries = self.backend.load_environments()?;
        Ok(entries.into_iter().find(|e| e.active))
    }

    /// Clears the active flag. Returns the resulting collection.
    pub fn unset(&self) -> Result<Vec<Environment>> {
        let _guard = self.guard()?;
        let mut entries = self.backend.load_environments()?;
        if clear_active(&mut entries) {
            self.backend.save_environments(&entries)?;
            info!("cleared active environment");
        }
        Ok(entries)
    }

    /// Makes `name` the active environment and moves it to the end.
    ///
    /// With `unset_first` the previously active record is cleared (and moved
    /// to the end ahead of the target). Without it no reordering of the old
    /// record happens, but no second active flag is ever persisted.
    pub fn set(&self, name: &str, unset_first: bool) -> Result<Environment> {
        let _guard = self.guard()?;
        let mut entries = self.backend.load_environments()?;
        position(&entries, name)?;

        if unset_first {
            clear_active(&mut entries);
        }
        for entry in entries.iter_mut().filter(|e| e.name != name) {
            entry.active = false;
        }

        let pos = position(&entries, name)?;
        let mut target = entries.remove(pos);
        target.active = true;
        entries.push(target.clone());

        self.backend.save_environments(&entries)?;
        info!(name, "switched active environment");
        Ok(target)
    }

    /// Replaces name, url and description of `name`, keeping its active flag.
    /// The edited record moves to the end of the collection.
    pub fn edit(&self, name: &str, replacement: EnvironmentEdit) -> Result<Environment> {
        require("name", &replacement.name)?;
        require_url(&replacement.url)?;

        let _guard = self.guard()?;
        let mut entries = self.backend.load_environments()?;
        let pos = position(&entries, name)?;
        check_unique(
            &entries,
            Some(replacement.name.as_str()),
            Some(replacement.url.as_str()),
            Some(pos),
        )?;

        let old = entries.remove(pos);
        let edited = Environment {
            name: replacement.name,
            url: replacement.url,
            active: old.active,
            description: replacement.description,
        };
        entries.push(edited.clone());
        self.backend.save_environments(&entries)?;

        info!(old_name = name, new_name = %edited.name, "edited environment");
        Ok(edited)
    }

    pub fn empty(&self) -> Result<bool> {
        Ok(self.list()?.is_empty())
    }

    pub fn is_url_valid(url: &str) -> bool {
        validation::is_url_valid(url)
    }
}

fn position(entries: &[Environment], name: &str) -> Result<usize> {
    entries
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| EnvDeckError::not_found(format!("No environment named \"{}\"", name)))
}

/// Name and url are each unique across the collection. `skip` excludes the
/// record being rewritten.
fn check_unique(
    entries: &[Environment],
    name: Option<&str>,
    url: Option<&str>,
    skip: Option<usize>,
) -> Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        if Some(i) == skip {
            continue;
        }
        if name == Some(entry.name.as_str()) {
            return Err(EnvDeckError::conflict(format!(
                "An environment named \"{}\" already exists",
                entry.name
            )));
        }
        if url == Some(entry.url.as_str()) {
            return Err(EnvDeckError::conflict(format!(
                "The url {} is already used by \"{}\"",
                entry.url, entry.name
            )));
        }
    }
    Ok(())
}

/// Clears the active record and moves it to the end. Returns false if
/// nothing was active.
fn clear_active(entries: &mut Vec<Environment>) -> bool {
    let Some(pos) = entries.iter().position(|e| e.active) else {
        return false;
    };
    let mut previous = entries.remove(pos);
    previous.active = false;
    for entry in entries.iter_mut() {
        entry.active = false;
    }
    entries.push(previous);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::fixtures::BackendFixture;
    use crate::store::mem_backend::MemBackend;
    use std::sync::Arc;
    use std::thread;

    fn store() -> EnvironmentStore<MemBackend> {
        let store = EnvironmentStore::with_backend(MemBackend::new());
        store.initialize().unwrap();
        store
    }

    fn names(store: &EnvironmentStore<MemBackend>) -> Vec<String> {
        store.list().unwrap().into_iter().map(|e| e.name).collect()
    }

    fn active_count(store: &EnvironmentStore<MemBackend>) -> usize {
        store.list().unwrap().iter().filter(|e| e.active).count()
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        store.initialize().unwrap();
        assert_eq!(names(&store), vec!["A"]);
    }

    #[test]
    fn initialize_removes_stale_marker() {
        let fixture = BackendFixture::new().with_marker(Environment::new("A", "https://a.com"));
        let store = EnvironmentStore::with_backend(fixture.backend.clone());
        store.initialize().unwrap();
        assert!(fixture.backend.load_marker().unwrap().is_none());
        assert!(store.empty().unwrap());
    }

    #[test]
    fn add_then_list() {
        let store = store();
        let created = store.add("https://a.com", "A", false).unwrap();
        assert_eq!(created.description, None);
        assert_eq!(store.list().unwrap(), vec![created]);
    }

    #[test]
    fn add_with_description_saves_once() {
        let store = store();
        store
            .add_with_description("https://a.com", "A", false, Some("shared"))
            .unwrap();

        store.backend().set_simulate_write_error(true);
        assert!(store
            .add_with_description("https://b.com", "B", false, Some("lost"))
            .is_err());
        store.backend().set_simulate_write_error(false);

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description.as_deref(), Some("shared"));
    }

    #[test]
    fn fixture_environments_are_listed_in_order() {
        let fixture = BackendFixture::new()
            .with_environments(2)
            .with_active("prod", "https://prod.example.com");
        let store = EnvironmentStore::with_backend(fixture.backend.clone());
        store.initialize().unwrap();

        assert_eq!(names(&store), vec!["env-1", "env-2", "prod"]);
        assert_eq!(store.active().unwrap().unwrap().name, "prod");
        assert!(matches!(
            store.add("https://env-1.example.com", "other", false),
            Err(EnvDeckError::Conflict(_))
        ));
    }

    #[test]
    fn add_rejects_missing_fields_and_bad_url() {
        let store = store();
        assert!(matches!(
            store.add("", "A", false),
            Err(EnvDeckError::Validation(_))
        ));
        assert!(matches!(
            store.add("https://a.com", "", false),
            Err(EnvDeckError::Validation(_))
        ));
        assert!(matches!(
            store.add("not a url", "A", false),
            Err(EnvDeckError::Validation(_))
        ));
        assert!(store.empty().unwrap());
    }

    #[test]
    fn add_rejects_duplicate_name_or_url() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        let before = store.list().unwrap();

        assert!(matches!(
            store.add("https://other.com", "A", false),
            Err(EnvDeckError::Conflict(_))
        ));
        assert!(matches!(
            store.add("https://a.com", "B", false),
            Err(EnvDeckError::Conflict(_))
        ));
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = store();
        store.add("https://a.com", "prod", false).unwrap();
        store.add("https://b.com", "Prod", false).unwrap();
        assert_eq!(names(&store), vec!["prod", "Prod"]);
    }

    #[test]
    fn adding_active_moves_the_flag() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", true).unwrap();

        assert_eq!(store.active().unwrap().unwrap().name, "B");
        let a = store
            .list()
            .unwrap()
            .into_iter()
            .find(|e| e.name == "A")
            .unwrap();
        assert!(!a.active);
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn update_requires_a_key_field() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        let patch = EnvironmentPatch::default().description(Some("only this".into()));
        assert!(matches!(
            store.update("A", patch),
            Err(EnvDeckError::Validation(_))
        ));
    }

    #[test]
    fn update_replaces_in_place() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        store.add("https://b.com", "B", false).unwrap();

        let patch = EnvironmentPatch::default()
            .url("https://a2.com")
            .description(Some("staging".into()));
        let updated = store.update("A", patch).unwrap();

        assert_eq!(updated.name, "A");
        assert_eq!(updated.url, "https://a2.com");
        assert_eq!(updated.description.as_deref(), Some("staging"));
        assert_eq!(names(&store), vec!["A", "B"]);
    }

    #[test]
    fn update_keeps_own_values_but_rejects_others() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        store.add("https://b.com", "B", false).unwrap();

        // Re-stating its own url is not a conflict.
        store
            .update("A", EnvironmentPatch::default().url("https://a.com"))
            .unwrap();

        assert!(matches!(
            store.update("A", EnvironmentPatch::default().name("B")),
            Err(EnvDeckError::Conflict(_))
        ));
        assert!(matches!(
            store.update("A", EnvironmentPatch::default().url("https://b.com")),
            Err(EnvDeckError::Conflict(_))
        ));
    }

    #[test]
    fn update_missing_and_bad_url() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        assert!(matches!(
            store.update("Z", EnvironmentPatch::default().active(true)),
            Err(EnvDeckError::NotFound(_))
        ));
        assert!(matches!(
            store.update("A", EnvironmentPatch::default().url("bad url")),
            Err(EnvDeckError::Validation(_))
        ));
    }

    #[test]
    fn update_active_keeps_single_active() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", false).unwrap();
        store
            .update("B", EnvironmentPatch::default().active(true))
            .unwrap();
        assert_eq!(store.active().unwrap().unwrap().name, "B");
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn update_can_clear_description() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        store
            .update(
                "A",
                EnvironmentPatch::default()
                    .active(false)
                    .description(Some("x".into())),
            )
            .unwrap();
        let cleared = store
            .update("A", EnvironmentPatch::default().active(false).description(None))
            .unwrap();
        assert_eq!(cleared.description, None);
    }

    #[test]
    fn delete_returns_removed_record() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        store.add("https://b.com", "B", false).unwrap();

        let removed = store.delete("A").unwrap().unwrap();
        assert_eq!(removed.url, "https://a.com");
        assert_eq!(names(&store), vec!["B"]);

        assert_eq!(store.delete("A").unwrap(), None);
        assert!(matches!(store.delete(""), Err(EnvDeckError::Validation(_))));
    }

    #[test]
    fn unset_without_active_is_noop() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        let entries = store.unset().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(store.active().unwrap().is_none());
    }

    #[test]
    fn unset_clears_and_moves_to_end() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", false).unwrap();
        store.unset().unwrap();
        assert!(store.active().unwrap().is_none());
        assert_eq!(names(&store), vec!["B", "A"]);
    }

    #[test]
    fn set_switches_and_moves_to_end() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", false).unwrap();
        store.add("https://c.com", "C", false).unwrap();

        let target = store.set("B", true).unwrap();
        assert!(target.active);
        assert_eq!(names(&store), vec!["C", "A", "B"]);
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn set_without_unset_never_leaves_two_active() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", false).unwrap();
        store.set("B", false).unwrap();
        assert_eq!(active_count(&store), 1);
        assert_eq!(store.active().unwrap().unwrap().name, "B");
        assert_eq!(names(&store), vec!["A", "B"]);
    }

    #[test]
    fn set_missing_is_not_found() {
        let store = store();
        assert!(matches!(
            store.set("nope", true),
            Err(EnvDeckError::NotFound(_))
        ));
    }

    #[test]
    fn edit_renames_and_preserves_active() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", false).unwrap();

        let edited = store
            .edit(
                "A",
                EnvironmentEdit::new("A2", "https://a2.com")
                    .with_description(Some("renamed".into())),
            )
            .unwrap();

        assert!(edited.active);
        assert_eq!(names(&store), vec!["B", "A2"]);
        assert_eq!(store.active().unwrap().unwrap().name, "A2");
    }

    #[test]
    fn edit_checks_target_and_clashes() {
        let store = store();
        store.add("https://a.com", "A", false).unwrap();
        store.add("https://b.com", "B", false).unwrap();

        assert!(matches!(
            store.edit("Z", EnvironmentEdit::new("Z", "https://z.com")),
            Err(EnvDeckError::NotFound(_))
        ));
        assert!(matches!(
            store.edit("A", EnvironmentEdit::new("B", "https://a.com")),
            Err(EnvDeckError::Conflict(_))
        ));
        // Keeping its own name and url is fine.
        store
            .edit("A", EnvironmentEdit::new("A", "https://a.com"))
            .unwrap();
    }

    #[test]
    fn failed_write_leaves_collection_unchanged() {
        let backend = MemBackend::new();
        let store = EnvironmentStore::with_backend(backend.clone());
        store.initialize().unwrap();
        store.add("https://a.com", "A", true).unwrap();

        backend.set_simulate_write_error(true);
        assert!(store.add("https://b.com", "B", true).is_err());
        backend.set_simulate_write_error(false);

        assert_eq!(names(&store), vec!["A"]);
        assert_eq!(store.active().unwrap().unwrap().name, "A");
    }

    #[test]
    fn active_flag_survives_mixed_sequence() {
        let store = store();
        store.add("https://a.com", "A", true).unwrap();
        store.add("https://b.com", "B", false).unwrap();
        store.add("https://c.com", "C", true).unwrap();
        store.set("A", false).unwrap();
        store.set("B", true).unwrap();
        store.add("https://d.com", "D", true).unwrap();
        assert_eq!(active_count(&store), 1);
        assert_eq!(store.active().unwrap().unwrap().name, "D");
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .add(&format!("https://env{}.example.com", i), &format!("env{}", i), i % 2 == 0)
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.list().unwrap().len(), 8);
        assert_eq!(active_count(&store), 1);
    }

    #[test]
    fn url_check_is_exposed_on_store() {
        assert!(EnvironmentStore::<MemBackend>::is_url_valid("https://example.com"));
        assert!(!EnvironmentStore::<MemBackend>::is_url_valid("not a url"));
    }
}
