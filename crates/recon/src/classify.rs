use rust_decimal::Decimal;

use crate::model::{AlertMessage, ClassificationMessage, PriceChange};

/// Direction of a move from `prior` to `new`. Exact decimal comparison.
pub fn classify_change(prior: Decimal, new: Decimal) -> PriceChange {
    if new < prior {
        PriceChange::Decreased
    } else if new > prior {
        PriceChange::Increased
    } else {
        PriceChange::Unchanged
    }
}

/// Inclusive: a price sitting exactly on the target counts as reached.
pub fn target_reached(price: Decimal, target: Decimal) -> bool {
    price <= target
}

/// Build the classification message for one observation.
pub fn classify_observation(item: &str, prior: Decimal, new: Decimal) -> ClassificationMessage {
    ClassificationMessage {
        kind: classify_change(prior, new),
        item: item.to_string(),
        previous: prior,
        current: new,
    }
}

/// Alert for one observation, if its price is at or below target.
pub fn check_target(item: &str, price: Decimal, target: Decimal) -> Option<AlertMessage> {
    target_reached(price, target).then(|| AlertMessage {
        item: item.to_string(),
        price,
        target,
    })
}
