// imgforge/src/history.rs
use crate::core::{Operation, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Most recent entries kept on disk; older ones are dropped on save.
pub const HISTORY_LIMIT: usize = 100;

/// One completed processing action, as persisted in the history file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub operation: String,
    pub input: String,
    pub output: String,
    pub parameters: serde_json::Value,
}

impl HistoryEntry {
    /// Builds an entry for one processed file. A whole operation
    /// sequence is recorded as a single entry: the `+`-joined names
    /// plus the serialized descriptors under `parameters.operations`.
    pub fn new(input: &Path, output: &Path, ops: &[Operation]) -> Self {
        let names: Vec<&str> = ops.iter().map(Operation::name).collect();
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            operation: names.join("+"),
            input: input.display().to_string(),
            output: output.display().to_string(),
            parameters: serde_json::json!({
                "operations": serde_json::to_value(ops).unwrap_or_default(),
            }),
        }
    }
}

/// Append-only bounded log of past operations, persisted as a JSON
/// array. Load failures degrade to an empty history and save failures
/// to a logged warning; neither ever aborts processing.
pub struct HistoryLog {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "History file {} is unreadable, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                log::warn!(
                    "Could not read history file {}, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        };
        Self { path, entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Appends and flushes immediately, so a crash mid-batch loses at
    /// most the in-flight file's entry.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if let Err(e) = self.save() {
            log::warn!("Failed to save history to {}: {}", self.path.display(), e);
        }
    }

    /// Truncates to the newest [`HISTORY_LIMIT`] entries and persists.
    /// Writes a sibling temp file first and renames it into place, so
    /// a failed write never leaves a partial history file.
    fn save(&mut self) -> Result<()> {
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
        let data = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operation;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry::new(
            Path::new(&format!("in/{n}.png")),
            Path::new(&format!("out/{n}.png")),
            &[Operation::Resize {
                width: 10,
                height: 10,
            }],
        )
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::load(dir.path().join("history.json"));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn garbage_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();
        let log = HistoryLog::load(&path);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn record_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut log = HistoryLog::load(&path);
        log.record(entry(0));
        drop(log);

        let reloaded = HistoryLog::load(&path);
        assert_eq!(reloaded.entries().len(), 1);
        assert_eq!(reloaded.entries()[0].operation, "resize");
        assert_eq!(reloaded.entries()[0].input, "in/0.png");
    }

    #[test]
    fn persisted_history_never_exceeds_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut log = HistoryLog::load(&path);
        for n in 0..HISTORY_LIMIT + 20 {
            log.record(entry(n));
        }
        drop(log);

        let reloaded = HistoryLog::load(&path);
        assert_eq!(reloaded.entries().len(), HISTORY_LIMIT);
        // Oldest entries are the ones dropped.
        assert_eq!(reloaded.entries()[0].input, "in/20.png");
        assert_eq!(
            reloaded.entries().last().unwrap().input,
            format!("in/{}.png", HISTORY_LIMIT + 19)
        );
    }

    #[test]
    fn no_partial_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut log = HistoryLog::load(&path);
        log.record(entry(0));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
