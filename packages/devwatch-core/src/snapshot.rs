//! Snapshot store: the last persisted device table per family.
//!
//! Each run compares the freshly fetched table against the previous
//! snapshot, then overwrites it so the next run has a baseline.

use crate::controller::DeviceFamily;
use crate::inventory::DeviceTable;
use crate::table;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, family: DeviceFamily) -> PathBuf {
        self.dir.join(family.snapshot_file())
    }

    /// Load the previous snapshot for `family`, or `None` on the first run.
    pub fn load(&self, family: DeviceFamily) -> Result<Option<DeviceTable>> {
        let path = self.path_for(family);
        if !path.exists() {
            tracing::debug!("No previous {} snapshot at {:?}", family.label(), path);
            return Ok(None);
        }
        let rows = table::read_rows(&path)
            .with_context(|| format!("Failed to read {} snapshot", family.label()))?;
        Ok(Some(rows))
    }

    /// Overwrite the snapshot for `family` with a fresh table.
    pub fn save(&self, family: DeviceFamily, rows: &DeviceTable) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create snapshot directory {:?}", self.dir))?;
        table::write_rows(rows, &self.path_for(family))
            .with_context(|| format!("Failed to write {} snapshot", family.label()))
    }

    /// Modification time of the stored snapshot, if one exists.
    pub fn last_written(&self, family: DeviceFamily) -> Option<SystemTime> {
        fs::metadata(self.path_for(family))
            .and_then(|m| m.modified())
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SnapshotStore {
        SnapshotStore::new(
            std::env::temp_dir().join(format!("devwatch-snap-{}-{}", std::process::id(), name)),
        )
    }

    fn sample_table() -> DeviceTable {
        vec![
            vec!["hostname".to_string(), "upTime".to_string()],
            vec!["sw-01".to_string(), "0day,5 hrs".to_string()],
        ]
    }

    #[test]
    fn test_save_then_load_yields_identical_rows() {
        let store = temp_store("roundtrip");
        let rows = sample_table();

        store.save(DeviceFamily::Switch, &rows).unwrap();
        let loaded = store.load(DeviceFamily::Switch).unwrap().unwrap();
        std::fs::remove_dir_all(&store.dir).unwrap();

        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_first_run_has_no_snapshot() {
        let store = temp_store("firstrun");
        assert!(store.load(DeviceFamily::WirelessAp).unwrap().is_none());
        assert!(store.last_written(DeviceFamily::WirelessAp).is_none());
    }

    #[test]
    fn test_families_do_not_share_files() {
        let store = temp_store("families");
        store.save(DeviceFamily::Switch, &sample_table()).unwrap();
        assert!(store.load(DeviceFamily::WirelessAp).unwrap().is_none());
        std::fs::remove_dir_all(&store.dir).unwrap();
    }
}
