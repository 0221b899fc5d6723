//! Persistence of groups across documents.
//!
//! A store is an append-only log of [`GroupRecord`]s per *scope* (a
//! namespace such as a collection or tenant). Grouping loads the scope once
//! before a batch and appends after it; nothing is ever deleted.
//!
//! | Store | Backing | Use |
//! |-------|---------|-----|
//! | [`InMemoryGroupStore`] | `Vec` per scope | tests, single process |
//! | [`JsonLinesGroupStore`] | `<root>/<scope>.jsonl` | durable, multi-session |

mod jsonl;
mod memory;

pub use jsonl::JsonLinesGroupStore;
pub use memory::InMemoryGroupStore;

use lexner_core::GroupRecord;

use crate::error::{Error, Result};

/// Load/save contract for persisted groups.
///
/// Implementations must tolerate concurrent writers.
pub trait GroupStore: Send + Sync {
    /// Every record saved under `scope`, oldest first.
    fn load_groups(&self, scope: &str) -> Result<Vec<GroupRecord>>;

    /// Append one group.
    fn save(&self, scope: &str, group: &GroupRecord) -> Result<()>;

    /// Append reference destinations.
    fn save_destinations(&self, scope: &str, destinations: &[GroupRecord]) -> Result<()> {
        for destination in destinations {
            self.save(scope, destination)?;
        }
        Ok(())
    }
}

/// Reject empty scopes and anything outside `[A-Za-z0-9_-]`.
pub fn validate_scope(scope: &str) -> Result<()> {
    if scope.is_empty() {
        return Err(Error::invalid_input("scope must not be empty"));
    }
    if let Some(bad) = scope
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(Error::invalid_input(format!(
            "scope '{}' contains '{}'",
            scope, bad
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_scope() {
        assert!(validate_scope("court-2024_v1").is_ok());
        assert!(matches!(validate_scope(""), Err(Error::InvalidInput(_))));
        assert!(validate_scope("../etc").is_err());
        assert!(validate_scope("a b").is_err());
        assert!(validate_scope("año").is_err());
    }
}
