//! Append-only observation history, keyed by instrument.

use crate::core::premium::Observation;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Persistence seam for observation logs. Data volumes are small (periodic
/// polling), so the contract is whole-log granularity: everything is loaded
/// at startup and the affected instrument's log is rewritten on append.
pub trait HistoryBackend: Send + Sync {
    fn load_all(&self) -> Result<HashMap<String, Vec<Observation>>>;
    fn persist(&self, instrument_id: &str, log: &[Observation]) -> Result<()>;
}

/// Ordered log of observations per instrument.
///
/// Insertion order is preserved as-is; the store is order-preserving, not
/// order-enforcing. Out-of-order or duplicate timestamps are the caller's
/// concern and are tolerated here.
pub struct HistoryStore {
    logs: HashMap<String, Vec<Observation>>,
    backend: Box<dyn HistoryBackend>,
}

impl HistoryStore {
    /// Opens the store, loading all persisted history through the backend.
    pub fn open(backend: Box<dyn HistoryBackend>) -> Result<Self> {
        let logs = backend.load_all()?;
        debug!(instruments = logs.len(), "Loaded observation history");
        Ok(Self { logs, backend })
    }

    /// Appends an observation to its instrument's log and persists it.
    pub fn append(&mut self, observation: Observation) -> Result<()> {
        let id = observation.instrument_id.clone();
        let log = self.logs.entry(id.clone()).or_default();
        log.push(observation);
        self.backend.persist(&id, log)
    }

    /// Observations with `timestamp >= since`, in insertion order.
    /// `None` returns the full history. Unknown instruments yield an
    /// empty vec rather than an error.
    pub fn window(&self, instrument_id: &str, since: Option<DateTime<Utc>>) -> Vec<Observation> {
        let Some(log) = self.logs.get(instrument_id) else {
            return Vec::new();
        };
        match since {
            Some(cutoff) => log
                .iter()
                .filter(|obs| obs.timestamp >= cutoff)
                .cloned()
                .collect(),
            None => log.clone(),
        }
    }

    /// The most recently appended observation, if any.
    pub fn latest(&self, instrument_id: &str) -> Option<&Observation> {
        self.logs.get(instrument_id).and_then(|log| log.last())
    }

    /// All instrument ids with at least one observation, sorted.
    pub fn instruments(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.logs.keys().cloned().collect();
        ids.sort();
        ids
    }
}
