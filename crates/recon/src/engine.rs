use crate::classify::{check_target, classify_observation};
use crate::evidence::compute_summary;
use crate::model::{Ledger, Observation, PriceRecord, Reconciliation};

/// Apply a batch of observations to a ledger.
///
/// Observations are processed in submission order, which only affects the
/// order of `messages` and `alerts`. Every observed item is written back with
/// its pre-update current price as `last_price`; items not in the batch are
/// carried over untouched. Inputs are expected to be validated already
/// (see [`crate::batch::normalize`]).
pub fn reconcile(mut ledger: Ledger, observations: &[Observation]) -> Reconciliation {
    let mut messages = Vec::with_capacity(observations.len());
    let mut alerts = Vec::new();

    for obs in observations {
        let new_price = obs.current_price;
        let target = obs.target_price;
        let prior = ledger
            .get(&obs.item)
            .map(|r| r.current_price)
            .unwrap_or(new_price);

        let message = classify_observation(&obs.item, prior, new_price);
        log::debug!("{}: {} ({} -> {})", obs.item, message.kind, prior, new_price);
        messages.push(message);

        if let Some(alert) = check_target(&obs.item, new_price, target) {
            log::debug!("{}: target {} reached", obs.item, target);
            alerts.push(alert);
        }

        ledger.upsert(PriceRecord {
            item: obs.item.clone(),
            current_price: new_price,
            last_price: prior,
            target_price: target,
        });
    }

    let summary = compute_summary(&messages, &alerts, ledger.len());

    Reconciliation {
        ledger,
        messages,
        alerts,
        summary,
    }
}
