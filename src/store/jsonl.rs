//! Append-only JSON-lines group store.
//!
//! One file per scope, one [`GroupRecord`] per line:
//!
//! ```text
//! <root>/court-2024.jsonl
//!   {"type":"PERSON","name":"María Diaz","entities":[...],...}
//!   {"type":"REFERENCE_DESTINATION","name":"4. Results",...}
//! ```

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use lexner_core::GroupRecord;
use once_cell::sync::Lazy;

use super::{validate_scope, GroupStore};
use crate::error::{Error, Result};
use crate::sync::{lock, Mutex};

/// Serializes appends from every store instance in the process.
static APPEND_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Group store backed by `<root>/<scope>.jsonl` files.
#[derive(Debug, Clone)]
pub struct JsonLinesGroupStore {
    root: PathBuf,
}

impl JsonLinesGroupStore {
    /// Store rooted at `root`. The directory is created on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `scope`.
    pub fn scope_path(&self, scope: &str) -> Result<PathBuf> {
        validate_scope(scope)?;
        Ok(self.root.join(format!("{}.jsonl", scope)))
    }

    fn append(&self, scope: &str, records: &[GroupRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let path = self.scope_path(scope)?;

        let mut buf = String::new();
        for record in records {
            buf.push_str(&serde_json::to_string(record)?);
            buf.push('\n');
        }

        let _guard = lock(&APPEND_LOCK);
        std::fs::create_dir_all(&self.root).map_err(|e| {
            Error::store_unavailable(format!("{}: {}", self.root.display(), e))
        })?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| Error::store_unavailable(format!("{}: {}", path.display(), e)))?;
        file.write_all(buf.as_bytes())
            .map_err(|e| Error::store_unavailable(format!("{}: {}", path.display(), e)))?;

        log::debug!(
            "[store] appended {} record(s) to {}",
            records.len(),
            path.display()
        );
        Ok(())
    }
}

impl GroupStore for JsonLinesGroupStore {
    fn load_groups(&self, scope: &str) -> Result<Vec<GroupRecord>> {
        let path = self.scope_path(scope)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::store_unavailable(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: GroupRecord = serde_json::from_str(line).map_err(|e| {
                Error::parse(format!("{}:{}: {}", path.display(), idx + 1, e))
            })?;
            records.push(record);
        }
        Ok(records)
    }

    fn save(&self, scope: &str, group: &GroupRecord) -> Result<()> {
        self.append(scope, std::slice::from_ref(group))
    }

    fn save_destinations(&self, scope: &str, destinations: &[GroupRecord]) -> Result<()> {
        self.append(scope, destinations)
    }
}
