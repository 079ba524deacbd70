use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::models::history::HistoryRecord;

/// Durable record of videos already processed, keyed by video id and backed
/// by a single JSON file.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: BTreeMap<String, HistoryRecord>,
}

impl HistoryStore {
    /// Loads persisted history. A missing file is a first run, not an error.
    /// An unreadable or unparseable file degrades to an empty store so a bad
    /// history can never block downloads.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "history file {} is corrupt, starting empty: {e}",
                        path.display()
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(
                    "could not read history file {}, starting empty: {e}",
                    path.display()
                );
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.entries.contains_key(video_id)
    }

    pub fn get(&self, video_id: &str) -> Option<&HistoryRecord> {
        self.entries.get(video_id)
    }

    /// Adds or replaces the record for a video id.
    pub fn insert(&mut self, video_id: impl Into<String>, record: HistoryRecord) {
        self.entries.insert(video_id.into(), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HistoryRecord)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the full mapping, replacing prior content. Goes through a
    /// sibling temp file and a rename so a crash mid-write cannot leave a
    /// truncated file for the next load.
    pub fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| HistoryError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|source| HistoryError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
