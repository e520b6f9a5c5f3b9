//! Reporting timeframes.

use anyhow::Result;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
    All,
}

impl Timeframe {
    /// Lookback window, or `None` for the unfiltered full history.
    pub fn to_duration(&self) -> Option<Duration> {
        match self {
            Timeframe::Daily => Some(Duration::days(1)),
            Timeframe::Weekly => Some(Duration::days(7)),
            Timeframe::Monthly => Some(Duration::days(30)),
            Timeframe::All => None,
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Timeframe::Daily => "daily",
                Timeframe::Weekly => "weekly",
                Timeframe::Monthly => "monthly",
                Timeframe::All => "all",
            }
        )
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            "all" => Ok(Timeframe::All),
            _ => Err(anyhow::anyhow!("Invalid timeframe: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for tf in [
            Timeframe::Daily,
            Timeframe::Weekly,
            Timeframe::Monthly,
            Timeframe::All,
        ] {
            assert_eq!(tf.to_string().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn test_durations() {
        assert_eq!(Timeframe::Daily.to_duration(), Some(Duration::days(1)));
        assert_eq!(Timeframe::Weekly.to_duration(), Some(Duration::days(7)));
        assert_eq!(Timeframe::Monthly.to_duration(), Some(Duration::days(30)));
        assert_eq!(Timeframe::All.to_duration(), None);
    }

    #[test]
    fn test_invalid_string_rejected() {
        assert!("hourly".parse::<Timeframe>().is_err());
    }
}
