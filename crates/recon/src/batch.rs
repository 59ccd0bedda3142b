//! Input boundary for observation batches.
//!
//! Everything that can reject user input happens here, before
//! [`crate::engine::reconcile`] sees the batch.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::Observation;

/// Accepted price range and batch size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
    pub max_items: usize,
}

impl Default for PriceBounds {
    fn default() -> Self {
        Self {
            min: Decimal::ZERO,
            max: Decimal::from(10_000),
            max_items: 20,
        }
    }
}

impl PriceBounds {
    fn check(&self, item: &str, value: Decimal) -> Result<(), ReconError> {
        if value < self.min || value > self.max {
            return Err(ReconError::PriceOutOfRange {
                item: item.into(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

pub fn parse_price(item: &str, value: &str) -> Result<Decimal, ReconError> {
    Decimal::from_str(value.trim()).map_err(|_| ReconError::PriceParse {
        item: item.into(),
        value: value.into(),
    })
}

impl Observation {
    /// Parse an observation from text fields. An empty target means
    /// "same as the current price".
    pub fn parse(item: &str, price: &str, target: &str) -> Result<Self, ReconError> {
        let current_price = parse_price(item, price)?;
        let target_price = if target.trim().is_empty() {
            current_price
        } else {
            parse_price(item, target)?
        };
        Ok(Observation::new(item, current_price, target_price))
    }
}

/// Parse the `ITEM=PRICE[:TARGET]` command-line form.
///
/// The item is everything before the last `=`, so item names may contain `=`.
pub fn parse_observation_arg(arg: &str) -> Result<Observation, ReconError> {
    let (item, prices) = arg
        .rsplit_once('=')
        .ok_or_else(|| ReconError::ObservationSyntax(arg.into()))?;
    let (price, target) = prices.split_once(':').unwrap_or((prices, ""));
    if price.trim().is_empty() {
        return Err(ReconError::ObservationSyntax(arg.into()));
    }
    Observation::parse(item, price, target)
}

/// Validate and clean a raw batch.
///
/// - item names are trimmed; empty ones are dropped silently
/// - prices must lie within `bounds`
/// - a repeated item keeps its first position but takes the last values
/// - at most `bounds.max_items` distinct items
pub fn normalize(raw: Vec<Observation>, bounds: &PriceBounds) -> Result<Vec<Observation>, ReconError> {
    let mut out: Vec<Observation> = Vec::with_capacity(raw.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for obs in raw {
        let item = obs.item.trim();
        if item.is_empty() {
            log::debug!("dropping observation with empty item name");
            continue;
        }
        bounds.check(item, obs.current_price)?;
        bounds.check(item, obs.target_price)?;

        let cleaned = Observation::new(item, obs.current_price, obs.target_price);
        match positions.get(item) {
            Some(&idx) => {
                log::debug!("duplicate item '{item}' in batch, keeping last value");
                out[idx] = cleaned;
            }
            None => {
                positions.insert(item.to_string(), out.len());
                out.push(cleaned);
            }
        }
    }

    if out.len() > bounds.max_items {
        return Err(ReconError::BatchTooLarge {
            count: out.len(),
            max: bounds.max_items,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parse_arg_with_target() {
        let obs = parse_observation_arg("milk=4.00:4.50").unwrap();
        assert_eq!(obs.item, "milk");
        assert_eq!(obs.current_price, d("4.00"));
        assert_eq!(obs.target_price, d("4.50"));
    }

    #[test]
    fn parse_arg_target_defaults_to_price() {
        let obs = parse_observation_arg("bread=2.5").unwrap();
        assert_eq!(obs.target_price, d("2.5"));
    }

    #[test]
    fn parse_arg_item_may_contain_equals() {
        let obs = parse_observation_arg("a=b=1").unwrap();
        assert_eq!(obs.item, "a=b");
    }

    #[test]
    fn parse_arg_rejects_garbage() {
        assert!(matches!(
            parse_observation_arg("milk"),
            Err(ReconError::ObservationSyntax(_))
        ));
        assert!(matches!(
            parse_observation_arg("milk="),
            Err(ReconError::ObservationSyntax(_))
        ));
        assert!(matches!(
            parse_observation_arg("milk=cheap"),
            Err(ReconError::PriceParse { .. })
        ));
    }

    #[test]
    fn normalize_trims_and_drops_empty() {
        let raw = vec![
            Observation::new("  milk ", d("1"), d("1")),
            Observation::new("   ", d("2"), d("2")),
            Observation::new("", d("3"), d("3")),
        ];
        let out = normalize(raw, &PriceBounds::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].item, "milk");
    }

    #[test]
    fn normalize_rejects_out_of_range() {
        let bounds = PriceBounds::default();
        let err = normalize(vec![Observation::new("gold", d("10000.01"), d("1"))], &bounds);
        assert!(matches!(err, Err(ReconError::PriceOutOfRange { .. })));
        let err = normalize(vec![Observation::new("gold", d("1"), d("-0.01"))], &bounds);
        assert!(matches!(err, Err(ReconError::PriceOutOfRange { .. })));
    }

    #[test]
    fn normalize_accepts_bounds_exactly() {
        let bounds = PriceBounds::default();
        let out = normalize(
            vec![Observation::new("free", d("0"), d("10000"))],
            &bounds,
        )
        .unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn normalize_duplicate_last_wins_first_position() {
        let raw = vec![
            Observation::new("milk", d("5"), d("4")),
            Observation::new("eggs", d("3"), d("2")),
            Observation::new("milk ", d("4.5"), d("4")),
        ];
        let out = normalize(raw, &PriceBounds::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].item, "milk");
        assert_eq!(out[0].current_price, d("4.5"));
        assert_eq!(out[1].item, "eggs");
    }

    #[test]
    fn normalize_enforces_batch_size() {
        let bounds = PriceBounds {
            max_items: 2,
            ..PriceBounds::default()
        };
        let raw = (0..3)
            .map(|i| Observation::new(format!("item{i}"), d("1"), d("1")))
            .collect();
        assert_eq!(
            normalize(raw, &bounds),
            Err(ReconError::BatchTooLarge { count: 3, max: 2 })
        );
    }

    #[test]
    fn case_sensitive_items_are_distinct() {
        let raw = vec![
            Observation::new("Milk", d("5"), d("4")),
            Observation::new("milk", d("5"), d("4")),
        ];
        assert_eq!(normalize(raw, &PriceBounds::default()).unwrap().len(), 2);
    }
}
