//! Country → currency symbol lookup for display.
//!
//! Display only: prices are never converted between currencies.

use std::collections::BTreeMap;

const BUILTIN: &[(&str, &str)] = &[
    ("Nigeria", "₦"),
    ("United States", "$"),
    ("United Kingdom", "£"),
    ("Canada", "C$"),
    ("Ghana", "₵"),
    ("South Africa", "R"),
    ("India", "₹"),
];

#[derive(Debug, Clone)]
pub struct CurrencyTable {
    symbols: BTreeMap<String, String>,
    fallback: String,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self::with_overrides("$", &BTreeMap::new())
    }
}

impl CurrencyTable {
    /// Built-in table with `overrides` layered on top.
    pub fn with_overrides(fallback: &str, overrides: &BTreeMap<String, String>) -> Self {
        let mut symbols: BTreeMap<String, String> = BUILTIN
            .iter()
            .map(|(c, s)| (c.to_string(), s.to_string()))
            .collect();
        for (country, symbol) in overrides {
            symbols.insert(country.clone(), symbol.clone());
        }
        Self {
            symbols,
            fallback: fallback.to_string(),
        }
    }

    /// Symbol for `country`, or the fallback when the country is unknown.
    pub fn symbol_for(&self, country: &str) -> &str {
        self.symbols
            .get(country.trim())
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn is_known(&self, country: &str) -> bool {
        self.symbols.contains_key(country.trim())
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_symbols() {
        let t = CurrencyTable::default();
        assert_eq!(t.symbol_for("Nigeria"), "₦");
        assert_eq!(t.symbol_for("United Kingdom"), "£");
        assert_eq!(t.symbol_for("India"), "₹");
    }

    #[test]
    fn unknown_country_falls_back() {
        let t = CurrencyTable::with_overrides("¤", &BTreeMap::new());
        assert_eq!(t.symbol_for("Atlantis"), "¤");
        assert!(!t.is_known("Atlantis"));
    }

    #[test]
    fn overrides_replace_builtin() {
        let mut o = BTreeMap::new();
        o.insert("Canada".to_string(), "CA$".to_string());
        let t = CurrencyTable::with_overrides("$", &o);
        assert_eq!(t.symbol_for("Canada"), "CA$");
        assert_eq!(t.countries().count(), 7);
    }
}
