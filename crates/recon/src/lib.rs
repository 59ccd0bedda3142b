//! `pricewatch-recon` - price ledger reconciliation.
//!
//! Pure engine crate: receives a ledger and a batch of observations, returns
//! the next ledger with change classifications and target alerts.
//! Persistence is behind the [`LedgerStore`] trait; no IO here.

pub mod batch;
pub mod classify;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod model;
pub mod store;

pub use batch::{normalize, parse_observation_arg, PriceBounds};
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{
    AlertMessage, ClassificationMessage, Ledger, Observation, PriceChange, PriceRecord,
    ReconSummary, Reconciliation,
};
pub use store::{track, LedgerStore};
