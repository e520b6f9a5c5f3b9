//! fjall-backed persistent history.

use crate::core::history::HistoryBackend;
use crate::core::premium::Observation;
use anyhow::{Context, Result};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Stores each instrument's full observation log as a JSON value under the
/// instrument id. Appends rewrite the affected log; everything is read back
/// once at startup.
pub struct FjallBackend {
    _keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open history store at {}", path.display()))?;
        let partition = keyspace
            .open_partition("observations", PartitionCreateOptions::default())
            .context("Failed to open observations partition")?;
        Ok(Self {
            _keyspace: keyspace,
            partition,
        })
    }
}

impl HistoryBackend for FjallBackend {
    fn load_all(&self) -> Result<HashMap<String, Vec<Observation>>> {
        let mut logs = HashMap::new();
        for entry in self.partition.iter() {
            let (key, value) = entry.context("Failed to read history entry")?;
            let instrument_id = String::from_utf8(key.to_vec())
                .context("Invalid instrument id in history store")?;
            let log: Vec<Observation> = serde_json::from_slice(&value)
                .with_context(|| format!("Corrupt history log for {instrument_id}"))?;
            logs.insert(instrument_id, log);
        }
        debug!(instruments = logs.len(), "Loaded history from disk");
        Ok(logs)
    }

    fn persist(&self, instrument_id: &str, log: &[Observation]) -> Result<()> {
        let encoded = serde_json::to_vec(log).context("Failed to encode observation log")?;
        self.partition
            .insert(instrument_id, encoded)
            .with_context(|| format!("Failed to persist history for {instrument_id}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::premium::observe;
    use chrono::Utc;
    use tempfile::tempdir;

    #[test]
    fn test_persist_survives_reopen() {
        let dir = tempdir().unwrap();
        let ts = Utc::now();

        {
            let backend = FjallBackend::open(dir.path()).unwrap();
            let log = vec![
                observe("ondo", 1.01, 1.0, ts).unwrap(),
                observe("ondo", 1.02, 1.0, ts).unwrap(),
            ];
            backend.persist("ondo", &log).unwrap();
        }

        let backend = FjallBackend::open(dir.path()).unwrap();
        let loaded = backend.load_all().unwrap();
        assert_eq!(loaded["ondo"].len(), 2);
        assert_eq!(loaded["ondo"][1].market_value, 1.02);
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let dir = tempdir().unwrap();
        let backend = FjallBackend::open(dir.path()).unwrap();
        assert!(backend.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_rewrite_replaces_log() {
        let dir = tempdir().unwrap();
        let backend = FjallBackend::open(dir.path()).unwrap();
        let ts = Utc::now();

        backend
            .persist("usdy", &[observe("usdy", 1.0, 1.0, ts).unwrap()])
            .unwrap();
        let grown = vec![
            observe("usdy", 1.0, 1.0, ts).unwrap(),
            observe("usdy", 1.01, 1.0, ts).unwrap(),
        ];
        backend.persist("usdy", &grown).unwrap();

        let loaded = backend.load_all().unwrap();
        assert_eq!(loaded["usdy"].len(), 2);
    }
}
