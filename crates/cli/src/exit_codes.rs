//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | data             | Ledger / batch file problems             |
//! | 10-19   | account          | Signup and login codes                   |
//! | 20-29   | track            | Price tracking outcomes                  |
//! | 30-39   | config           | Settings file codes                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use pricewatch_io::StoreError;
use pricewatch_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Data (3-9)
// =============================================================================

/// Ledger, account registry or batch file could not be read or written.
pub const EXIT_IO: u8 = 3;

/// Observation input rejected (bad number, out of range, too many items).
pub const EXIT_INPUT: u8 = 4;

// =============================================================================
// Account (10-19)
// =============================================================================

/// Signup for an email that is already registered.
pub const EXIT_ACCOUNT_EXISTS: u8 = 10;

/// Unknown email or wrong password.
pub const EXIT_INVALID_CREDENTIALS: u8 = 11;

// =============================================================================
// Track (20-29)
// =============================================================================

/// At least one item reached its target and --fail-on-alert was given.
pub const EXIT_TRACK_ALERT: u8 = 20;

// =============================================================================
// Config (30-39)
// =============================================================================

/// Settings file unreadable, unparseable, or invalid.
pub const EXIT_CONFIG_INVALID: u8 = 30;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::AlreadyExists(_) => EXIT_ACCOUNT_EXISTS,
        StoreError::InvalidCredentials => EXIT_INVALID_CREDENTIALS,
        StoreError::MissingField(_) => EXIT_USAGE,
        StoreError::MissingColumn { .. } | StoreError::Parse(_) => EXIT_INPUT,
        StoreError::Io(_) => EXIT_IO,
        StoreError::Hash(_) => EXIT_ERROR,
    }
}

/// Map a reconciliation error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::PriceParse { .. }
        | ReconError::PriceOutOfRange { .. }
        | ReconError::ObservationSyntax(_)
        | ReconError::BatchTooLarge { .. } => EXIT_INPUT,
        ReconError::Io(_) => EXIT_IO,
    }
}
