//! BMI history persistence.
//!
//! History is a JSON array of records in insertion order. The store keeps
//! the list in memory and rewrites the whole file after every mutation:
//! 1. Serialize to a temp file in the same directory (exclusively locked)
//! 2. Sync to disk
//! 3. Rename over the original
//!
//! A missing, empty, unreadable or malformed file loads as empty history.

use crate::metrics::round_to;
use crate::{Error, HistoryEntry, HistoryStatistics, Result};
use fs2::FileExt;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Append-only BMI history backed by a JSON file
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the store at `path`, loading whatever history it holds
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_history(&path);
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-read the history file, replacing the in-memory list
    pub fn load(&mut self) -> &[HistoryEntry] {
        self.entries = load_history(&self.path);
        &self.entries
    }

    /// Append an entry and persist the full log
    ///
    /// On a write failure the entry stays in memory and the error is
    /// returned so the caller can tell the user.
    /// Entries with non-finite numbers are rejected up front since JSON
    /// cannot represent them.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        if ![entry.weight_kg, entry.height_cm, entry.bmi]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(Error::InvalidInput(format!(
                "History entry for {} has a non-finite value",
                entry.name
            )));
        }

        self.entries.push(entry);
        save_history(&self.path, &self.entries)?;
        tracing::info!(
            "Appended history entry ({} total) to {:?}",
            self.entries.len(),
            self.path
        );
        Ok(())
    }

    /// Delete every entry and persist the empty history
    ///
    /// Confirmation is the caller's job; this always clears.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        save_history(&self.path, &self.entries)?;
        tracing::info!("Cleared history at {:?}", self.path);
        Ok(())
    }

    pub fn statistics(&self) -> HistoryStatistics {
        statistics(&self.entries)
    }
}

/// Count, average, minimum and maximum BMI over `entries`
pub fn statistics(entries: &[HistoryEntry]) -> HistoryStatistics {
    if entries.is_empty() {
        return HistoryStatistics::default();
    }

    let count = entries.len();
    let sum: f64 = entries.iter().map(|e| e.bmi).sum();
    let min = entries.iter().map(|e| e.bmi).fold(f64::INFINITY, f64::min);
    let max = entries
        .iter()
        .map(|e| e.bmi)
        .fold(f64::NEG_INFINITY, f64::max);

    HistoryStatistics {
        count,
        avg_bmi: Some(round_to(sum / count as f64, 2)),
        min_bmi: Some(min),
        max_bmi: Some(max),
    }
}

/// Read history from a file with shared locking
///
/// Never fails: problems are logged and produce an empty list. Records that
/// do not match the schema are skipped individually.
pub fn load_history(path: &Path) -> Vec<HistoryEntry> {
    if !path.exists() {
        tracing::debug!("No history file at {:?}", path);
        return Vec::new();
    }

    let contents = match read_locked(path) {
        Ok(contents) => contents,
        Err(e) => {
            tracing::warn!(
                "Failed to read history file {:?}: {}. Starting with empty history.",
                path,
                e
            );
            return Vec::new();
        }
    };

    if contents.trim().is_empty() {
        return Vec::new();
    }

    let records: Vec<serde_json::Value> = match serde_json::from_str(&contents) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(
                "Failed to parse history file {:?}: {}. Starting with empty history.",
                path,
                e
            );
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<HistoryEntry>(record) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Skipping history record {}: {}", index, e);
            }
        }
    }

    tracing::debug!("Loaded {} history entries from {:?}", entries.len(), path);
    entries
}

fn read_locked(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let result = std::io::BufReader::new(&file).read_to_string(&mut contents);
    let _ = file.unlock();
    result.map(|_| contents)
}

/// Atomically replace the history file with `entries`
pub fn save_history(path: &Path, entries: &[HistoryEntry]) -> Result<()> {
    write_atomic(path, entries).map_err(|e| match e {
        Error::Io(source) => Error::storage(path, source),
        other => other,
    })?;
    tracing::debug!("Saved {} history entries to {:?}", entries.len(), path);
    Ok(())
}

fn write_atomic(path: &Path, entries: &[HistoryEntry]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        entries.serialize(&mut serializer)?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BmiCategory;
    use chrono::NaiveDate;

    fn entry(name: &str, day: u32, bmi: f64) -> HistoryEntry {
        HistoryEntry {
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            weight_kg: 70.0,
            height_cm: 175.0,
            bmi,
            category: crate::classify_bmi(bmi).category,
        }
    }

    #[test]
    fn test_append_then_reopen_preserves_order() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");

        let mut store = HistoryStore::open(&path);
        assert!(store.is_empty());
        store.append(entry("Ann", 1, 22.86)).unwrap();
        store.append(entry("Bo", 2, 31.2)).unwrap();
        store.append(entry("Ann", 3, 22.1)).unwrap();

        let reopened = HistoryStore::open(&path);
        assert_eq!(reopened.entries(), store.entries());
        let names: Vec<_> = reopened.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Bo", "Ann"]);
        assert_eq!(reopened.entries()[1].category, BmiCategory::Obese);
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");

        let mut store = HistoryStore::open(&path);
        store.append(entry("Ann", 1, 22.0)).unwrap();
        store.clear().unwrap();

        assert!(store.is_empty());
        assert!(store.load().is_empty());
        assert!(HistoryStore::open(&path).is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
    }

    #[test]
    fn test_load_picks_up_external_changes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");

        let mut viewer = HistoryStore::open(&path);
        let mut writer = HistoryStore::open(&path);
        writer.append(entry("Ann", 1, 22.0)).unwrap();

        assert!(viewer.is_empty());
        assert_eq!(viewer.load().len(), 1);
    }

    #[test]
    fn test_file_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");

        let mut store = HistoryStore::open(&path);
        store.append(entry("Ann", 1, 22.86)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n        \"name\": \"Ann\""));
        assert!(contents.contains("\"date\": \"2024-01-01 09:30\""));
        assert!(contents.contains("\"category\": \"Normal Weight\""));
    }

    #[test]
    fn test_missing_empty_and_corrupt_files() {
        let temp_dir = tempfile::tempdir().unwrap();

        assert!(load_history(&temp_dir.path().join("missing.json")).is_empty());

        let empty = temp_dir.path().join("empty.json");
        std::fs::write(&empty, "").unwrap();
        assert!(load_history(&empty).is_empty());

        let corrupt = temp_dir.path().join("corrupt.json");
        std::fs::write(&corrupt, "[{ invalid json").unwrap();
        assert!(load_history(&corrupt).is_empty());

        let wrong_shape = temp_dir.path().join("object.json");
        std::fs::write(&wrong_shape, r#"{"name": "Ann"}"#).unwrap();
        assert!(load_history(&wrong_shape).is_empty());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");
        std::fs::write(
            &path,
            r#"[
                {"name":"Ann","date":"2024-01-01 09:30","weight_kg":70,"height_cm":175,"bmi":22.86,"category":"Normal Weight"},
                {"name":"Bad","date":"yesterday","weight_kg":70,"height_cm":175,"bmi":22.86,"category":"Normal Weight"},
                {"name":"Cy","date":"2024-01-02 10:00","weight_kg":50,"height_cm":170,"bmi":17.3,"category":"Underweight"}
            ]"#,
        )
        .unwrap();

        let entries = load_history(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Ann");
        assert_eq!(entries[1].name, "Cy");
    }

    #[test]
    fn test_append_failure_is_storage_error_and_kept_in_memory() {
        let temp_dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = temp_dir.path().join("not_a_dir");
        std::fs::write(&blocker, "x").unwrap();
        let path = blocker.join("bmi_history.json");

        let mut store = HistoryStore::open(&path);
        let err = store.append(entry("Ann", 1, 22.0)).unwrap_err();

        assert!(err.is_storage());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_non_finite_entry_rejected_before_persisting() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");

        let mut store = HistoryStore::open(&path);
        store.append(entry("Ann", 1, 22.0)).unwrap();

        let err = store.append(entry("Huge", 2, f64::INFINITY)).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(store.len(), 1);

        let reopened = HistoryStore::open(&path);
        assert_eq!(reopened.entries(), store.entries());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bmi_history.json");

        let mut store = HistoryStore::open(&path);
        store.append(entry("Ann", 1, 22.0)).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "bmi_history.json")
            .collect();
        assert!(extras.is_empty(), "Unexpected files: {:?}", extras);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = statistics(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_bmi, None);
        assert_eq!(stats.min_bmi, None);
        assert_eq!(stats.max_bmi, None);
        assert_eq!(HistoryStatistics::display_value(stats.avg_bmi), "N/A");
    }

    #[test]
    fn test_statistics_values() {
        let entries = vec![entry("a", 1, 20.0), entry("b", 2, 22.0), entry("c", 3, 24.0)];
        let stats = statistics(&entries);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.avg_bmi, Some(22.0));
        assert_eq!(stats.min_bmi, Some(20.0));
        assert_eq!(stats.max_bmi, Some(24.0));
        assert_eq!(HistoryStatistics::display_value(stats.avg_bmi), "22.00");
        assert_eq!(HistoryStatistics::display_value(stats.max_bmi), "24.00");
    }

    #[test]
    fn test_statistics_average_is_rounded() {
        let entries = vec![entry("a", 1, 20.0), entry("b", 2, 21.0), entry("c", 3, 21.0)];
        assert_eq!(statistics(&entries).avg_bmi, Some(20.67));
    }
}
