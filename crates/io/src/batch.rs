// Observation batch files
//
// Header: item,current_price[,target_price]   (`price` accepted for current_price)

use std::path::Path;

use pricewatch_recon::Observation;

use crate::error::StoreError;
use crate::text::read_file_as_utf8;

/// Read a batch file. Rows are returned raw: trimming, empty-item
/// dropping and bounds checks are left to `pricewatch_recon::normalize`.
pub fn read_batch_csv(path: &Path) -> Result<Vec<Observation>, StoreError> {
    let content = read_file_as_utf8(path)?;
    parse_batch_csv(&content, &path.display().to_string())
}

pub fn parse_batch_csv(content: &str, source: &str) -> Result<Vec<Observation>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let idx = |name: &str| headers.iter().position(|h| h == name);
    let missing = |column: &str| StoreError::MissingColumn {
        file: source.into(),
        column: column.into(),
    };

    let item_idx = idx("item").ok_or_else(|| missing("item"))?;
    let price_idx = idx("current_price")
        .or_else(|| idx("price"))
        .ok_or_else(|| missing("current_price"))?;
    let target_idx = idx("target_price");

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        let item = record.get(item_idx).unwrap_or("");
        if item.trim().is_empty() {
            continue;
        }
        let price = record.get(price_idx).unwrap_or("");
        let target = target_idx.and_then(|i| record.get(i)).unwrap_or("");
        out.push(Observation::parse(item, price, target)?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn full_header() {
        let obs = parse_batch_csv(
            "item,current_price,target_price\nmilk,4.00,4.50\neggs,3.50,2\n",
            "batch.csv",
        )
        .unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0], Observation::new("milk", d("4.00"), d("4.50")));
    }

    #[test]
    fn target_optional() {
        let obs = parse_batch_csv("item,price\nrice,12\n", "batch.csv").unwrap();
        assert_eq!(obs[0].target_price, d("12"));
    }

    #[test]
    fn blank_target_cell_defaults() {
        let obs = parse_batch_csv("item,current_price,target_price\nrice,12,\n", "b").unwrap();
        assert_eq!(obs[0].target_price, d("12"));
    }

    #[test]
    fn blank_items_skipped() {
        let obs = parse_batch_csv("item,current_price\n  ,1\nsalt,2\n", "b").unwrap();
        assert_eq!(obs.len(), 1);
    }

    #[test]
    fn missing_price_column() {
        let err = parse_batch_csv("item,target_price\nmilk,1\n", "b.csv").unwrap_err();
        assert_eq!(
            err,
            StoreError::MissingColumn {
                file: "b.csv".into(),
                column: "current_price".into()
            }
        );
    }

    #[test]
    fn bad_price_is_parse_error() {
        let err = parse_batch_csv("item,current_price\nmilk,free\n", "b").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
    }
}
