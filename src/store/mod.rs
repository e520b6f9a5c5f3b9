//! History persistence backends.

pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::history::HistoryBackend;
use anyhow::Result;
use tracing::warn;

/// Opens the configured persistent backend, falling back to a purely
/// in-memory one when the data directory cannot be opened.
pub fn open_backend(config: &AppConfig) -> Result<Box<dyn HistoryBackend>> {
    match config.default_data_path() {
        Ok(path) => match disk::FjallBackend::open(&path.join("history")) {
            Ok(backend) => Ok(Box::new(backend)),
            Err(e) => {
                warn!(error = %e, "Could not open persistent history, using in-memory store");
                Ok(Box::new(memory::MemoryBackend::new()))
            }
        },
        Err(e) => {
            warn!(error = %e, "No data directory available, using in-memory store");
            Ok(Box::new(memory::MemoryBackend::new()))
        }
    }
}
