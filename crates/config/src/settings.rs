// Application settings
// Loaded from ~/.config/pricewatch/settings.toml

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use pricewatch_recon::PriceBounds;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::currency::CurrencyTable;

#[derive(Debug)]
pub enum ConfigError {
    /// Settings file exists but cannot be read.
    Io { path: PathBuf, message: String },
    /// TOML parse / deserialization error.
    Parse(String),
    /// Values parse but make no sense together.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Validation(msg) => write!(f, "settings validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Accepted price range and batch size for submitted observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSettings {
    pub min: Decimal,
    pub max: Decimal,
    /// Observations accepted per update
    pub max_items: usize,
}

impl Default for PriceSettings {
    fn default() -> Self {
        let bounds = PriceBounds::default();
        Self {
            min: bounds.min,
            max: bounds.max,
            max_items: bounds.max_items,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySettings {
    /// Symbol shown for countries without a known currency
    pub fallback: String,
    /// Extra or overriding country → symbol entries
    pub symbols: BTreeMap<String, String>,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self {
            fallback: "$".into(),
            symbols: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where ledgers and the account registry live. None = platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Country assumed for account rows written without one
    pub default_country: String,

    pub prices: PriceSettings,

    pub currency: CurrencySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_country: "Nigeria".into(),
            prices: PriceSettings::default(),
            currency: CurrencySettings::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pricewatch")
            .join("settings.toml")
    }

    /// Load settings from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file means defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        log::info!("loaded settings from {}", path.display());
        Self::from_toml(&contents)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.prices;
        if p.min < Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "prices.min must not be negative, got {}",
                p.min
            )));
        }
        if p.min > p.max {
            return Err(ConfigError::Validation(format!(
                "prices.min ({}) is greater than prices.max ({})",
                p.min, p.max
            )));
        }
        if p.max_items == 0 {
            return Err(ConfigError::Validation(
                "prices.max_items must be at least 1".into(),
            ));
        }
        if self.default_country.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_country must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Data directory, falling back to the platform data dir.
    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pricewatch")
        })
    }

    pub fn price_bounds(&self) -> PriceBounds {
        PriceBounds {
            min: self.prices.min,
            max: self.prices.max,
            max_items: self.prices.max_items,
        }
    }

    pub fn currency_table(&self) -> CurrencyTable {
        CurrencyTable::with_overrides(&self.currency.fallback, &self.currency.symbols)
    }
}
