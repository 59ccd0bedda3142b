use crate::engine::reconcile;
use crate::error::ReconError;
use crate::model::{Ledger, Observation, Reconciliation};

/// Persistence for per-user ledgers.
pub trait LedgerStore {
    /// Load a user's ledger. A user with no saved ledger gets an empty one.
    fn load(&self, user: &str) -> Result<Ledger, ReconError>;

    /// Replace the user's saved ledger with `ledger`.
    fn save(&self, user: &str, ledger: &Ledger) -> Result<(), ReconError>;
}

/// Load the user's ledger, apply `observations`, and save the result.
///
/// Nothing is written if loading fails. A failed save is returned as an
/// error and the computed outcome is dropped.
pub fn track<S: LedgerStore + ?Sized>(
    store: &S,
    user: &str,
    observations: &[Observation],
) -> Result<Reconciliation, ReconError> {
    let ledger = store.load(user)?;
    log::info!("loaded {} tracked items for {user}", ledger.len());

    let outcome = reconcile(ledger, observations);

    store.save(user, &outcome.ledger)?;
    log::info!(
        "saved {} tracked items for {user} ({} alerts)",
        outcome.ledger.len(),
        outcome.alerts.len()
    );

    Ok(outcome)
}
