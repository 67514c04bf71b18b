//! Entry module discovery.
//!
//! Every TypeScript file directly under the `exports` directory of the
//! source root is one public entry of the package. Discovery lists that
//! directory once per run and derives a stable, lexicographically ordered
//! entry map from it; the umbrella module re-exports each entry in that
//! order.

use std::path::Path;
use tokio::fs;

use crate::pipeline::error::{Error, Result};

/// Name of the synthesized umbrella module every entry is re-exported from.
pub const UMBRELLA_MODULE: &str = "declx";

/// Directory under the source root that holds the entry modules.
pub const ENTRY_DIR: &str = "exports";

/// One public entry module of the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Entry name, `declx.<stem>`
    pub name: String,
    /// Module specifier relative to the source root, `exports/<stem>`
    pub module_path: String,
}

/// Ordered collection of discovered entries.
///
/// Insertion order is preserved; inserting a name that is already present
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMap {
    entries: Vec<SourceEntry>,
}

impl EntryMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any existing entry with the same name.
    pub fn insert(&mut self, entry: SourceEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceEntry> {
        self.entries.iter()
    }
}

/// Scans `<root>/exports` for entry modules.
///
/// Only regular files with a `.ts` extension (compared case-insensitively)
/// count; everything else is skipped. File names are ordered
/// lexicographically before the map is built, so the result does not depend
/// on directory enumeration order.
///
/// # Errors
///
/// Returns [`Error::EntryDirUnreadable`] when the directory cannot be
/// listed. This aborts the whole run: without the entry listing there is
/// nothing to bundle for any target.
pub async fn discover_entries(root: &Path) -> Result<EntryMap> {
    let exports_dir = root.join(ENTRY_DIR);
    let mut reader = fs::read_dir(&exports_dir)
        .await
        .map_err(|source| Error::EntryDirUnreadable {
            path: exports_dir.clone(),
            source,
        })?;

    let mut names = Vec::new();
    loop {
        let next = reader
            .next_entry()
            .await
            .map_err(|source| Error::EntryDirUnreadable {
                path: exports_dir.clone(),
                source,
            })?;
        let Some(dir_entry) = next else { break };
        match dir_entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => {
                log::debug!("Skipping entry with non-UTF-8 name {name:?}");
            }
        }
    }
    names.sort();

    let mut entries = EntryMap::new();
    for name in names {
        let file_name = Path::new(&name);
        let is_ts = file_name
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ts"));
        if !is_ts {
            log::debug!("Skipping non-TypeScript entry {name}");
            continue;
        }
        let metadata = fs::metadata(exports_dir.join(&name)).await;
        if !metadata.map(|m| m.is_file()).unwrap_or(false) {
            log::debug!("Skipping non-file entry {name}");
            continue;
        }
        let Some(stem) = file_name.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        entries.insert(SourceEntry {
            name: format!("{UMBRELLA_MODULE}.{stem}"),
            module_path: format!("{ENTRY_DIR}/{stem}"),
        });
    }

    log::debug!("Discovered {} entry module(s)", entries.len());
    Ok(entries)
}
