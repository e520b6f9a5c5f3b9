//! Core premium/discount and historical-statistics engine

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod correlation;
pub mod history;
pub mod log;
pub mod premium;
pub mod rate;
pub mod risk;
pub mod smoothing;
pub mod timeframe;
pub mod trend;

// Re-export main types for cleaner imports
pub use aggregate::{WeightedSample, aggregate};
pub use correlation::CorrelationResult;
pub use history::{HistoryBackend, HistoryStore};
pub use premium::Observation;
pub use rate::{RateBounds, RateReading, RateValidator, RejectionReason};
pub use risk::{MarketInsights, RiskLevel, RiskSummary};
pub use smoothing::YieldSmoother;
pub use timeframe::Timeframe;
pub use trend::{Trend, TrendResult};
