use std::fmt;

use pricewatch_recon::ReconError;

#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// An account with this email is already registered.
    AlreadyExists(String),
    /// Unknown email or wrong password.
    InvalidCredentials,
    /// Required signup field left empty.
    MissingField(&'static str),
    /// Batch file lacks a required column.
    MissingColumn { file: String, column: String },
    /// Row-level parse error in an input file.
    Parse(String),
    /// Password hashing failed.
    Hash(String),
    /// IO error (file read/write, directory creation).
    Io(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists(email) => write!(f, "an account for '{email}' already exists"),
            Self::InvalidCredentials => write!(f, "invalid email or password"),
            Self::MissingField(field) => write!(f, "{field} must not be empty"),
            Self::MissingColumn { file, column } => {
                write!(f, "{file}: missing column '{column}'")
            }
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Hash(msg) => write!(f, "password hashing failed: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for StoreError {
    fn from(e: csv::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<ReconError> for StoreError {
    fn from(e: ReconError) -> Self {
        Self::Parse(e.to_string())
    }
}
