use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// One tracked item in a user's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub item: String,
    pub current_price: Decimal,
    /// `current_price` as it stood before the most recent update.
    pub last_price: Decimal,
    pub target_price: Decimal,
}

impl PriceRecord {
    /// Record for an item seen for the first time: no prior price exists,
    /// so `last_price` equals `current_price`.
    pub fn first_seen(item: impl Into<String>, price: Decimal, target: Decimal) -> Self {
        Self {
            item: item.into(),
            current_price: price,
            last_price: price,
            target_price: target,
        }
    }

    /// Direction of the most recent update.
    pub fn change(&self) -> PriceChange {
        crate::classify::classify_change(self.last_price, self.current_price)
    }

    pub fn target_reached(&self) -> bool {
        crate::classify::target_reached(self.current_price, self.target_price)
    }
}

/// Per-user mapping of item → record. Keyed by the trimmed item name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    records: BTreeMap<String, PriceRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item: &str) -> Option<&PriceRecord> {
        self.records.get(item)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.records.contains_key(item)
    }

    /// Insert or replace the record for `record.item`.
    pub fn upsert(&mut self, record: PriceRecord) {
        self.records.insert(record.item.clone(), record);
    }

    /// Records in item order.
    pub fn iter(&self) -> impl Iterator<Item = &PriceRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PriceRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = PriceRecord>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        for record in iter {
            ledger.upsert(record);
        }
        ledger
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A submitted price for one item. Lives for a single reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub item: String,
    pub current_price: Decimal,
    pub target_price: Decimal,
}

impl Observation {
    pub fn new(item: impl Into<String>, current_price: Decimal, target_price: Decimal) -> Self {
        Self {
            item: item.into(),
            current_price,
            target_price,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceChange {
    Decreased,
    Increased,
    Unchanged,
}

impl std::fmt::Display for PriceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decreased => write!(f, "decreased"),
            Self::Increased => write!(f, "increased"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationMessage {
    pub kind: PriceChange,
    pub item: String,
    pub previous: Decimal,
    pub current: Decimal,
}

impl ClassificationMessage {
    /// The message sentence, with prices rendered by `price`.
    pub fn render(&self, price: impl Fn(Decimal) -> String) -> String {
        match self.kind {
            PriceChange::Decreased => format!(
                "{} got cheaper: {} → {}",
                self.item,
                price(self.previous),
                price(self.current)
            ),
            PriceChange::Increased => format!(
                "{} increased: {} → {}",
                self.item,
                price(self.previous),
                price(self.current)
            ),
            PriceChange::Unchanged => format!("{} stayed the same: {}", self.item, price(self.current)),
        }
    }
}

impl std::fmt::Display for ClassificationMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(|p| p.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertMessage {
    pub item: String,
    pub price: Decimal,
    pub target: Decimal,
}

impl AlertMessage {
    pub fn render(&self, price: impl Fn(Decimal) -> String) -> String {
        format!(
            "{} has reached your target price: {} ≤ {}",
            self.item,
            price(self.price),
            price(self.target)
        )
    }
}

impl std::fmt::Display for AlertMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(|p| p.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub observed: usize,
    pub decreased: usize,
    pub increased: usize,
    pub unchanged: usize,
    pub alerts: usize,
    pub tracked: usize,
}

/// Result of one reconciliation call: the next ledger plus what changed.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub ledger: Ledger,
    pub messages: Vec<ClassificationMessage>,
    pub alerts: Vec<AlertMessage>,
    pub summary: ReconSummary,
}
