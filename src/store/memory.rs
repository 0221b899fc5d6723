//! In-memory group store.

use std::collections::HashMap;

use lexner_core::GroupRecord;

use super::{validate_scope, GroupStore};
use crate::error::Result;
use crate::sync::{lock, Mutex};

/// Scoped record vectors behind a mutex.
///
/// ```rust
/// use lexner::store::{GroupStore, InMemoryGroupStore};
///
/// let store = InMemoryGroupStore::new();
/// assert!(store.load_groups("docs").unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    scopes: Mutex<HashMap<String, Vec<GroupRecord>>>,
}

impl InMemoryGroupStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records saved under `scope`.
    #[must_use]
    pub fn len(&self, scope: &str) -> usize {
        lock(&self.scopes).get(scope).map_or(0, Vec::len)
    }

    /// Whether nothing has been saved under `scope`.
    #[must_use]
    pub fn is_empty(&self, scope: &str) -> bool {
        self.len(scope) == 0
    }
}

impl GroupStore for InMemoryGroupStore {
    fn load_groups(&self, scope: &str) -> Result<Vec<GroupRecord>> {
        validate_scope(scope)?;
        Ok(lock(&self.scopes).get(scope).cloned().unwrap_or_default())
    }

    fn save(&self, scope: &str, group: &GroupRecord) -> Result<()> {
        validate_scope(scope)?;
        lock(&self.scopes)
            .entry(scope.to_string())
            .or_default()
            .push(group.clone());
        Ok(())
    }

    fn save_destinations(&self, scope: &str, destinations: &[GroupRecord]) -> Result<()> {
        validate_scope(scope)?;
        lock(&self.scopes)
            .entry(scope.to_string())
            .or_default()
            .extend_from_slice(destinations);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexner_core::{EntityRecord, NamedEntity, NamedEntityType};
    use std::sync::Arc;

    fn record(name: &str) -> GroupRecord {
        let top = EntityRecord::from_entity(&NamedEntity::new(NamedEntityType::Person, name), &[]);
        GroupRecord {
            entity_type: NamedEntityType::Person,
            name: name.to_string(),
            entities: vec![top.clone()],
            top_relevance_entity: top,
            segment: None,
        }
    }

    #[test]
    fn test_scopes_are_isolated() {
        let store = InMemoryGroupStore::new();
        store.save("a", &record("Ana Ruiz")).unwrap();
        store.save_destinations("b", &[record("x"), record("y")]).unwrap();

        assert_eq!(store.len("a"), 1);
        assert_eq!(store.len("b"), 2);
        assert!(store.is_empty("c"));
        assert_eq!(store.load_groups("a").unwrap()[0].name, "Ana Ruiz");
    }

    #[test]
    fn test_invalid_scope() {
        let store = InMemoryGroupStore::new();
        assert!(store.save("no/slash", &record("x")).is_err());
        assert!(store.load_groups("").is_err());
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(InMemoryGroupStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        store.save("shared", &record(&format!("{i}-{j}"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len("shared"), 100);
    }
}
