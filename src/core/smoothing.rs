//! Recency-weighted moving average over accepted yield readings.

use std::collections::{HashMap, VecDeque};

pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Per-instrument sliding window of accepted yields.
///
/// Single-sample readings are noisy (small on-chain rate updates get
/// amplified by annualization); smoothing trades responsiveness for
/// stability while still favoring recent data. Not thread-safe: the
/// surrounding scheduler serializes updates per instrument.
#[derive(Debug)]
pub struct YieldSmoother {
    window_size: usize,
    windows: HashMap<String, VecDeque<f64>>,
}

impl YieldSmoother {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
            windows: HashMap::new(),
        }
    }

    /// Appends an accepted rate to the instrument's window, evicting the
    /// oldest entry past the bound, and returns the weighted average with
    /// weights rising linearly from 1.0 (oldest) to 2.0 (newest).
    pub fn update(&mut self, instrument_id: &str, accepted_rate: f64) -> f64 {
        let window = self.windows.entry(instrument_id.to_string()).or_default();
        window.push_back(accepted_rate);
        if window.len() > self.window_size {
            window.pop_front();
        }

        let n = window.len();
        if n == 1 {
            return accepted_rate;
        }

        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (i, rate) in window.iter().enumerate() {
            let weight = 1.0 + i as f64 / (n - 1) as f64;
            weighted_sum += rate * weight;
            weight_sum += weight;
        }
        weighted_sum / weight_sum
    }

    pub fn window_len(&self, instrument_id: &str) -> usize {
        self.windows.get(instrument_id).map_or(0, VecDeque::len)
    }
}

impl Default for YieldSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
