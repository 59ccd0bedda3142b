use crate::model::{AlertMessage, ClassificationMessage, PriceChange, ReconSummary};

/// Compute summary counts for one reconciliation.
pub fn compute_summary(
    messages: &[ClassificationMessage],
    alerts: &[AlertMessage],
    tracked: usize,
) -> ReconSummary {
    let mut summary = ReconSummary {
        observed: messages.len(),
        alerts: alerts.len(),
        tracked,
        ..ReconSummary::default()
    };

    for m in messages {
        match m.kind {
            PriceChange::Decreased => summary.decreased += 1,
            PriceChange::Increased => summary.increased += 1,
            PriceChange::Unchanged => summary.unchanged += 1,
        }
    }

    summary
}
