//! Non-persistent backend for tests and ephemeral runs.

use crate::core::history::HistoryBackend;
use crate::core::premium::Observation;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps persisted logs in memory only. History does not survive the
/// process, which is exactly what integration tests want.
#[derive(Default)]
pub struct MemoryBackend {
    logs: RwLock<HashMap<String, Vec<Observation>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryBackend for MemoryBackend {
    fn load_all(&self) -> Result<HashMap<String, Vec<Observation>>> {
        Ok(self.logs.read().unwrap().clone())
    }

    fn persist(&self, instrument_id: &str, log: &[Observation]) -> Result<()> {
        self.logs
            .write()
            .unwrap()
            .insert(instrument_id.to_string(), log.to_vec());
        Ok(())
    }
}
