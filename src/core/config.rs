use crate::core::rate::RateBounds;
use crate::core::smoothing::DEFAULT_WINDOW_SIZE;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrancheType {
    Senior,
    Junior,
}

impl TrancheType {
    /// Centrifuge token symbol convention: DROP is senior, TIN is junior.
    pub fn token_symbol(&self) -> &'static str {
        match self {
            TrancheType::Senior => "DROP",
            TrancheType::Junior => "TIN",
        }
    }
}

/// A Centrifuge pool tranche tracked against its NAV per token.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrancheInstrument {
    pub label: String,
    pub pool_id: String,
    pub tranche: TrancheType,
}

/// A par-pegged token (USDY-style) tracked against a 1.0 par value, priced
/// through CoinGecko by contract address.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ParTokenInstrument {
    pub label: String,
    pub contract_address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum Instrument {
    Tranche(TrancheInstrument),
    ParToken(ParTokenInstrument),
}

impl Instrument {
    pub fn label(&self) -> &str {
        match self {
            Instrument::Tranche(t) => &t.label,
            Instrument::ParToken(p) => &p.label,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CentrifugeProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TreasuryProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
    pub centrifuge: Option<CentrifugeProviderConfig>,
    pub treasury: Option<TreasuryProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com".to_string(),
            }),
            centrifuge: Some(CentrifugeProviderConfig {
                base_url: "https://api.centrifuge.io".to_string(),
            }),
            treasury: Some(TreasuryProviderConfig {
                base_url: "https://api.fiscaldata.treasury.gov".to_string(),
            }),
        }
    }
}

fn default_smoothing_window() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_fallback_yield() -> f64 {
    // Conservative figure in line with recent USDY yields
    5.05
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub validation: RateBounds,
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
    #[serde(default = "default_fallback_yield")]
    pub fallback_yield: f64,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "rwatrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("in", "codito", "rwatrack")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
