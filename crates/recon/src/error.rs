use std::fmt;

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Price text that is not a decimal number.
    PriceParse { item: String, value: String },
    /// Price outside the configured bounds (negative prices included).
    PriceOutOfRange {
        item: String,
        value: Decimal,
        min: Decimal,
        max: Decimal,
    },
    /// Malformed `ITEM=PRICE[:TARGET]` argument.
    ObservationSyntax(String),
    /// More observations in one batch than allowed.
    BatchTooLarge { count: usize, max: usize },
    /// Ledger could not be persisted (or read, for stores that surface it).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriceParse { item, value } => {
                write!(f, "item '{item}': cannot parse price '{value}'")
            }
            Self::PriceOutOfRange { item, value, min, max } => {
                write!(f, "item '{item}': price {value} outside allowed range {min}..={max}")
            }
            Self::ObservationSyntax(arg) => {
                write!(f, "cannot parse observation '{arg}' (expected ITEM=PRICE[:TARGET])")
            }
            Self::BatchTooLarge { count, max } => {
                write!(f, "batch has {count} items, at most {max} allowed")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
