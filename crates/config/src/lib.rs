// Configuration loading

pub mod currency;
pub mod settings;

pub use currency::CurrencyTable;
pub use settings::{ConfigError, Settings};
