//! Per-item record persistence.
//!
//! Each identified item has at most one record file in the store directory,
//! named `mkks_item_<identifier>.json` and holding the three editable fields.
//! Loads are tolerant: a missing file is absent, and a corrupt file is logged
//! and treated as absent so that one bad record never breaks startup.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Prefix for record file names, concatenated directly with the identifier.
///
/// There is no delimiter escaping; identifiers are expected to be plain
/// filename-safe tokens (the default layout uses `[a-z0-9-]`).
pub const KEY_PREFIX: &str = "mkks_item_";

/// Persisted field set for one item. All fields optional: a field absent
/// from the record leaves the layout default in place on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pj: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spek: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// File-backed store of item records, one JSON file per identifier.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: &Path) -> Self {
        RecordStore {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for an identifier.
    pub fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}{}.json", KEY_PREFIX, id))
    }

    /// Load the record for an identifier, tolerating absence and corruption.
    pub fn load(&self, id: &str) -> Option<ItemRecord> {
        let path = self.record_path(id);
        if !path.exists() {
            return None;
        }
        let mut buf = String::new();
        match File::open(&path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(record) => Some(record),
                Err(e) => {
                    eprintln!("Error parsing record for '{}', ignoring it: {e}", id);
                    None
                }
            },
            Err(e) => {
                eprintln!("Error reading record for '{}', ignoring it: {e}", id);
                None
            }
        }
    }

    /// Save a record, overwriting any previous one. Atomic via temp + rename.
    pub fn save(&self, id: &str, record: &ItemRecord) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.record_path(id);
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// All record file paths currently in the store, for backup.
    pub fn record_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.dir.exists() {
            return Ok(files);
        }
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if path.is_file() && name.starts_with(KEY_PREFIX) && name.ends_with(".json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> RecordStore {
        let dir = std::env::temp_dir().join(format!(
            "mkks_store_test_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        RecordStore::new(&dir)
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = temp_store("roundtrip");
        let record = ItemRecord {
            pj: Some("Pak Dedi".into()),
            spek: Some("2 PK inverter".into()),
            status: Some("Baik".into()),
        };
        store.save("ac-1", &record).unwrap();

        let loaded = store.load("ac-1").expect("record should exist");
        assert_eq!(loaded.pj.as_deref(), Some("Pak Dedi"));
        assert_eq!(loaded.spek.as_deref(), Some("2 PK inverter"));
        assert_eq!(loaded.status.as_deref(), Some("Baik"));
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_missing_record_is_absent() {
        let store = temp_store("missing");
        assert!(store.load("nothing-here").is_none());
    }

    #[test]
    fn test_corrupt_record_is_treated_as_absent() {
        let store = temp_store("corrupt");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(store.record_path("bad"), "{not json at all").unwrap();
        assert!(store.load("bad").is_none());
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_key_derivation() {
        let store = RecordStore::new(Path::new("/tmp/mkks"));
        assert_eq!(
            store.record_path("r-server"),
            PathBuf::from("/tmp/mkks/mkks_item_r-server.json")
        );
    }

    #[test]
    fn test_save_overwrites_unconditionally() {
        let store = temp_store("overwrite");
        let first = ItemRecord {
            pj: Some("A".into()),
            spek: Some("old".into()),
            status: Some("Rusak".into()),
        };
        let second = ItemRecord {
            pj: Some("B".into()),
            spek: None,
            status: Some("Baik".into()),
        };
        store.save("x", &first).unwrap();
        store.save("x", &second).unwrap();

        let loaded = store.load("x").unwrap();
        assert_eq!(loaded.pj.as_deref(), Some("B"));
        // No per-field merge on save: the old spek is gone.
        assert!(loaded.spek.is_none());
        assert_eq!(loaded.status.as_deref(), Some("Baik"));
        let _ = fs::remove_dir_all(store.dir());
    }
}
