// Account registry: <data_dir>/users.csv
//
// Accounts only identify whose ledger to use and which currency symbol to
// show. Passwords are kept as Argon2 PHC strings. Rows written by the old
// form-based tracker hold the plain password; those are rehashed on the
// first successful login.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;

use crate::error::StoreError;
use crate::text::{read_file_as_utf8, write_atomic};
use crate::ACCOUNT_HEADER;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    pub country: String,
    #[serde(skip)]
    password_hash: String,
}

/// How a stored password column matched a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordCheck {
    Mismatch,
    Hashed,
    /// Plaintext row from the old tracker; needs rehashing.
    Legacy,
}

impl Account {
    fn check_password(&self, password: &str) -> PasswordCheck {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => {
                if Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
                {
                    PasswordCheck::Hashed
                } else {
                    PasswordCheck::Mismatch
                }
            }
            Err(_) if !self.password_hash.is_empty() && self.password_hash == password => {
                PasswordCheck::Legacy
            }
            Err(_) => PasswordCheck::Mismatch,
        }
    }
}

/// Salted Argon2id hash in PHC string form.
fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| StoreError::Hash(e.to_string()))
}

#[derive(Debug, Clone)]
pub struct AccountStore {
    path: PathBuf,
    default_country: String,
}

impl AccountStore {
    pub fn new(dir: &Path, default_country: impl Into<String>) -> Self {
        Self {
            path: dir.join("users.csv"),
            default_country: default_country.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All accounts keyed by email. Missing file = no accounts.
    pub fn load_all(&self) -> Result<BTreeMap<String, Account>, StoreError> {
        let mut accounts = BTreeMap::new();
        if !self.path.exists() {
            return Ok(accounts);
        }

        let content = read_file_as_utf8(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let idx = |name: &str| headers.iter().position(|h| h == name);
        let column = |name: &str| {
            idx(name).ok_or_else(|| StoreError::MissingColumn {
                file: self.path.display().to_string(),
                column: name.into(),
            })
        };

        let name_idx = column("name")?;
        let email_idx = column("email")?;
        let password_idx = column("password")?;
        let country_idx = idx("country");

        for record in reader.records() {
            let record = record?;
            let email = record.get(email_idx).unwrap_or("").trim().to_string();
            if email.is_empty() {
                continue;
            }
            let country = country_idx
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(self.default_country.as_str())
                .to_string();

            accounts.insert(
                email.clone(),
                Account {
                    name: record.get(name_idx).unwrap_or("").to_string(),
                    email,
                    country,
                    password_hash: record.get(password_idx).unwrap_or("").to_string(),
                },
            );
        }

        Ok(accounts)
    }

    pub fn find(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.load_all()?.remove(email.trim()))
    }

    /// Create an account. Fails if the email is already registered.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        country: &str,
    ) -> Result<Account, StoreError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(StoreError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(StoreError::MissingField("password"));
        }
        if self.load_all()?.contains_key(email) {
            return Err(StoreError::AlreadyExists(email.to_string()));
        }

        let account = Account {
            name: name.trim().to_string(),
            email: email.to_string(),
            country: country.trim().to_string(),
            password_hash: hash_password(password)?,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;
        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(ACCOUNT_HEADER)?;
        }
        writer.write_record([
            account.name.as_str(),
            account.email.as_str(),
            account.password_hash.as_str(),
            account.country.as_str(),
        ])?;
        writer.flush()?;

        log::info!("registered account {}", account.email);
        Ok(account)
    }

    /// Check credentials and return the account.
    pub fn verify(&self, email: &str, password: &str) -> Result<Account, StoreError> {
        let mut accounts = self.load_all()?;
        let Some(account) = accounts.get_mut(email.trim()) else {
            return Err(StoreError::InvalidCredentials);
        };
        match account.check_password(password) {
            PasswordCheck::Hashed => Ok(account.clone()),
            PasswordCheck::Mismatch => Err(StoreError::InvalidCredentials),
            PasswordCheck::Legacy => {
                account.password_hash = hash_password(password)?;
                let upgraded = account.clone();
                match self.write_all(&accounts) {
                    Ok(()) => log::info!("rehashed legacy password for {}", upgraded.email),
                    Err(e) => log::warn!("cannot rehash password for {}: {e}", upgraded.email),
                }
                Ok(upgraded)
            }
        }
    }

    /// Rewrite the whole registry, one row per account in email order.
    fn write_all(&self, accounts: &BTreeMap<String, Account>) -> Result<(), StoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(ACCOUNT_HEADER)?;
        for a in accounts.values() {
            writer.write_record([
                a.name.as_str(),
                a.email.as_str(),
                a.password_hash.as_str(),
                a.country.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Io(e.into_error().to_string()))?;
        write_atomic(&self.path, &bytes)?;
        Ok(())
    }
}
