// Per-user CSV price ledgers
//
// One file per user: <data_dir>/<encoded user>_prices.csv, fully rewritten on save.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use pricewatch_recon::{Ledger, LedgerStore, PriceRecord, ReconError};
use rust_decimal::Decimal;

use crate::text::{read_file_as_utf8, write_atomic};
use crate::LEDGER_HEADER;

#[derive(Debug, Clone)]
pub struct CsvLedgerStore {
    dir: PathBuf,
}

impl CsvLedgerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ledger path for `user`.
    ///
    /// Every byte outside `[A-Za-z0-9@.+-]` is written as `%XX`, `_` and `%`
    /// included, so distinct users never share a file and no name can leave
    /// the data directory.
    pub fn ledger_path(&self, user: &str) -> PathBuf {
        self.dir.join(format!("{}_prices.csv", encode_user(user.trim())))
    }

    /// Unencoded `<user>_prices.csv`, as older versions named the file.
    /// Only users whose names need no escaping apart from `_` have one.
    fn legacy_path(&self, user: &str) -> Option<PathBuf> {
        let user = user.trim();
        let plain = !user.is_empty() && user.bytes().all(|b| b == b'_' || is_filename_safe(b));
        (plain && user.contains('_')).then(|| self.dir.join(format!("{user}_prices.csv")))
    }
}

fn is_filename_safe(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'@' | b'.' | b'+' | b'-')
}

fn encode_user(user: &str) -> String {
    let mut out = String::with_capacity(user.len());
    for b in user.bytes() {
        if is_filename_safe(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

impl LedgerStore for CsvLedgerStore {
    fn load(&self, user: &str) -> Result<Ledger, ReconError> {
        let mut path = self.ledger_path(user);
        if !path.exists() {
            match self.legacy_path(user).filter(|p| p.exists()) {
                Some(legacy) => {
                    log::info!("reading legacy ledger {}", legacy.display());
                    path = legacy;
                }
                None => {
                    log::debug!("no ledger at {}, starting empty", path.display());
                    return Ok(Ledger::new());
                }
            }
        }
        match read_file_as_utf8(&path) {
            Ok(content) => Ok(parse_ledger_csv(&content, &path)),
            Err(e) => {
                log::warn!("cannot read {}: {e}; treating as empty", path.display());
                Ok(Ledger::new())
            }
        }
    }

    fn save(&self, user: &str, ledger: &Ledger) -> Result<(), ReconError> {
        let path = self.ledger_path(user);
        let bytes = ledger_to_csv(ledger).map_err(|e| ReconError::Io(e.to_string()))?;
        write_atomic(&path, &bytes)
            .map_err(|e| ReconError::Io(format!("cannot write {}: {e}", path.display())))
    }
}

/// Serialize a ledger with the current four-column header.
pub fn ledger_to_csv(ledger: &Ledger) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(LEDGER_HEADER)?;
    for r in ledger.iter() {
        writer.write_record([
            r.item.as_str(),
            &r.current_price.to_string(),
            &r.last_price.to_string(),
            &r.target_price.to_string(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Parse ledger CSV, tolerating every format this store has written.
///
/// - `price` is accepted in place of `current_price`; with neither column
///   the current price is 0
/// - missing or empty `last_price` / `target_price` default to the current price
/// - rows with unparseable prices are skipped
/// - a file without an `item` column yields an empty ledger
pub fn parse_ledger_csv(content: &str, source: &Path) -> Ledger {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|s| s.to_string()).collect(),
        Err(e) => {
            log::warn!("{}: unreadable header ({e}); treating as empty", source.display());
            return Ledger::new();
        }
    };
    let idx = |name: &str| headers.iter().position(|h| h == name);

    let Some(item_idx) = idx("item") else {
        log::warn!("{}: no 'item' column; treating as empty", source.display());
        return Ledger::new();
    };
    let current_idx = idx("current_price").or_else(|| idx("price"));
    let last_idx = idx("last_price");
    let target_idx = idx("target_price");

    let mut ledger = Ledger::new();

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("{}: skipping row {}: {e}", source.display(), line + 2);
                continue;
            }
        };
        let item = record.get(item_idx).unwrap_or("");
        if item.is_empty() {
            continue;
        }

        let cell = |i: Option<usize>| i.and_then(|i| record.get(i)).filter(|v| !v.is_empty());
        let parse = |v: &str| Decimal::from_str(v).ok();

        let current = match current_idx {
            Some(i) => match record.get(i).and_then(parse) {
                Some(p) => p,
                None => {
                    log::warn!("{}: skipping '{item}': bad current price", source.display());
                    continue;
                }
            },
            None => Decimal::ZERO,
        };
        let last = match cell(last_idx) {
            Some(v) => parse(v),
            None => Some(current),
        };
        let target = match cell(target_idx) {
            Some(v) => parse(v),
            None => Some(current),
        };
        let (Some(last), Some(target)) = (last, target) else {
            log::warn!("{}: skipping '{item}': bad last/target price", source.display());
            continue;
        };

        ledger.upsert(PriceRecord {
            item: item.to_string(),
            current_price: current,
            last_price: last,
            target_price: target,
        });
    }

    ledger
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn parse(content: &str) -> Ledger {
        parse_ledger_csv(content, Path::new("test.csv"))
    }

    #[test]
    fn current_format() {
        let ledger = parse("item,current_price,last_price,target_price\nmilk,4.00,5.00,4.50\n");
        let milk = ledger.get("milk").unwrap();
        assert_eq!(milk.current_price, d("4.00"));
        assert_eq!(milk.last_price, d("5.00"));
        assert_eq!(milk.target_price, d("4.50"));
    }

    #[test]
    fn legacy_price_column() {
        let ledger = parse("item,price\nrice,12.5\n");
        let rice = ledger.get("rice").unwrap();
        assert_eq!(rice.current_price, d("12.5"));
        assert_eq!(rice.last_price, d("12.5"));
        assert_eq!(rice.target_price, d("12.5"));
    }

    #[test]
    fn missing_last_and_target_default_to_current() {
        let ledger = parse("item,current_price\neggs,3.00\n");
        let eggs = ledger.get("eggs").unwrap();
        assert_eq!(eggs.last_price, d("3.00"));
        assert_eq!(eggs.target_price, d("3.00"));
    }

    #[test]
    fn empty_cells_default_to_current() {
        let ledger = parse("item,current_price,last_price,target_price\nyam,6,,\n");
        let yam = ledger.get("yam").unwrap();
        assert_eq!(yam.last_price, d("6"));
        assert_eq!(yam.target_price, d("6"));
    }

    #[test]
    fn no_price_column_means_zero() {
        let ledger = parse("item\nsalt\n");
        assert_eq!(ledger.get("salt").unwrap().current_price, Decimal::ZERO);
    }

    #[test]
    fn bad_row_skipped_others_kept() {
        let ledger = parse(
            "item,current_price,last_price,target_price\nmilk,abc,1,1\nbread,2,2,2\noil,3,x,3\n",
        );
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("bread"));
    }

    #[test]
    fn no_item_column_is_empty() {
        assert!(parse("name,price\nmilk,1\n").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn items_trimmed() {
        let ledger = parse("item,current_price\n  tea  ,4\n");
        assert!(ledger.contains("tea"));
    }

    #[test]
    fn path_is_encoded() {
        let store = CsvLedgerStore::new("/data");
        assert_eq!(
            store.ledger_path("ada@example.com"),
            PathBuf::from("/data/ada@example.com_prices.csv")
        );
        assert_eq!(
            store.ledger_path("../../etc/passwd"),
            PathBuf::from("/data/..%2F..%2Fetc%2Fpasswd_prices.csv")
        );
        assert_eq!(
            store.ledger_path("o'brien@x.com"),
            PathBuf::from("/data/o%27brien@x.com_prices.csv")
        );
    }

    #[test]
    fn lookalike_users_get_distinct_paths() {
        let store = CsvLedgerStore::new("/data");
        let users = [
            "a b@x.com",
            "a_b@x.com",
            "a%20b@x.com",
            "a%5Fb@x.com",
            "o'brien@x.com",
            "o_brien@x.com",
            "é@x.com",
        ];
        let paths: std::collections::HashSet<PathBuf> =
            users.iter().map(|u| store.ledger_path(u)).collect();
        assert_eq!(paths.len(), users.len());
    }

    #[test]
    fn legacy_path_only_for_underscored_names() {
        let store = CsvLedgerStore::new("/data");
        assert_eq!(
            store.legacy_path("a_b@x.com"),
            Some(PathBuf::from("/data/a_b@x.com_prices.csv"))
        );
        assert_eq!(store.legacy_path("ab@x.com"), None);
        assert_eq!(store.legacy_path("a b@x.com"), None);
        assert_eq!(store.legacy_path("a_/b"), None);
    }

    #[test]
    fn csv_roundtrip_keeps_scale() {
        let ledger: Ledger = [PriceRecord {
            item: "milk, whole".into(),
            current_price: d("4.00"),
            last_price: d("5.0"),
            target_price: d("4.5"),
        }]
        .into_iter()
        .collect();
        let bytes = ledger_to_csv(&ledger).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "item,current_price,last_price,target_price\n\"milk, whole\",4.00,5.0,4.5\n"
        );
        assert_eq!(parse(&text), ledger);
    }
}
