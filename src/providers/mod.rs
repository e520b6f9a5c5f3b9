//! Network fetchers supplying raw observations to the core.

pub mod centrifuge;
pub mod coingecko;
pub mod fallback;
pub mod treasury;
pub mod util;
