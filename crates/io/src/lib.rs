// File I/O operations

pub mod accounts;
pub mod batch;
pub mod error;
pub mod ledger;
pub mod text;

pub use accounts::{Account, AccountStore};
pub use error::StoreError;
pub use ledger::CsvLedgerStore;

/// Header written to every ledger file.
pub const LEDGER_HEADER: [&str; 4] = ["item", "current_price", "last_price", "target_price"];

/// Header written to the account registry.
pub const ACCOUNT_HEADER: [&str; 4] = ["name", "email", "password", "country"];
