//! Currency registry: ISO codes, aliases and symbols
//!
//! Every alias and symbol maps to exactly one ISO code. Symbols that are
//! shared between currencies (¥) are kept in a separate table and always
//! resolve to an ambiguity error so the caller can ask the user.

use std::collections::HashMap;
use serde::Serialize;
use fuelrate_core::ConvertError;

/// Supported currency entry
#[derive(Debug, Clone, Serialize)]
pub struct CurrencyDefinition {
    pub iso_code: &'static str,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub symbols: &'static [&'static str],
}

/// The supported currency table
static CURRENCIES: &[CurrencyDefinition] = &[
    CurrencyDefinition { iso_code: "USD", name: "US Dollar",
        aliases: &["US DOLLAR", "US DOLLARS", "DOLLAR", "DOLLARS", "USDOLLAR"],
        symbols: &["$", "US$"] },
    CurrencyDefinition { iso_code: "EUR", name: "Euro",
        aliases: &["EURO", "EUROS"],
        symbols: &["€"] },
    CurrencyDefinition { iso_code: "GBP", name: "British Pound",
        aliases: &["POUND STERLING", "STERLING", "BRITISH POUND", "BRITISH POUNDS", "UKP"],
        symbols: &["£"] },
    CurrencyDefinition { iso_code: "NIS", name: "Israeli New Shekel",
        aliases: &["ILS", "SHEKEL", "SHEKELS", "NEW SHEKEL", "NEW SHEKELS", "SHEQEL"],
        symbols: &["₪"] },
    CurrencyDefinition { iso_code: "INR", name: "Indian Rupee",
        aliases: &["RUPEE", "RUPEES", "INDIAN RUPEE", "INDIAN RUPEES"],
        symbols: &["₹", "RS", "RS."] },
    CurrencyDefinition { iso_code: "JPY", name: "Japanese Yen",
        aliases: &["YEN", "JAPANESE YEN"],
        symbols: &["円", "JP¥"] },
    CurrencyDefinition { iso_code: "CNY", name: "Chinese Yuan",
        aliases: &["RMB", "YUAN", "RENMINBI", "CHINESE YUAN"],
        symbols: &["元", "CN¥"] },
    CurrencyDefinition { iso_code: "AUD", name: "Australian Dollar",
        aliases: &["AUSTRALIAN DOLLAR", "AUSTRALIAN DOLLARS"],
        symbols: &["A$", "AU$"] },
    CurrencyDefinition { iso_code: "CAD", name: "Canadian Dollar",
        aliases: &["CANADIAN DOLLAR", "CANADIAN DOLLARS"],
        symbols: &["C$", "CA$"] },
    CurrencyDefinition { iso_code: "CHF", name: "Swiss Franc",
        aliases: &["SWISS FRANC", "SWISS FRANCS", "FRANC", "FRANCS"],
        symbols: &["FR.", "SFR"] },
];

/// Symbols that name more than one supported currency
static AMBIGUOUS_SYMBOLS: &[(&str, &[&str])] = &[
    ("¥", &["JPY", "CNY"]),
    ("￥", &["JPY", "CNY"]),
];

/// Registry of supported currencies
#[derive(Debug, Clone)]
pub struct CurrencyRegistry {
    currencies: Vec<&'static CurrencyDefinition>,
    lookup: HashMap<String, &'static str>,
    ambiguous: HashMap<String, &'static [&'static str]>,
}

impl CurrencyRegistry {
    pub fn new() -> Self {
        let mut lookup = HashMap::new();
        for def in CURRENCIES {
            let keys = std::iter::once(def.iso_code)
                .chain(def.aliases.iter().copied())
                .chain(def.symbols.iter().copied());
            for key in keys {
                let previous = lookup.insert(normalize_currency_token(key), def.iso_code);
                debug_assert!(
                    previous.is_none() || previous == Some(def.iso_code),
                    "currency key '{}' maps to both {:?} and {}",
                    key,
                    previous,
                    def.iso_code
                );
            }
        }

        let ambiguous = AMBIGUOUS_SYMBOLS.iter()
            .map(|(symbol, codes)| (normalize_currency_token(symbol), *codes))
            .collect();

        CurrencyRegistry {
            currencies: CURRENCIES.iter().collect(),
            lookup,
            ambiguous,
        }
    }

    /// Resolve a code, alias or symbol to its ISO code
    pub fn resolve(&self, token: &str) -> Result<&'static str, ConvertError> {
        let key = normalize_currency_token(token);

        if let Some(candidates) = self.ambiguous.get(&key) {
            return Err(ConvertError::AmbiguousCurrency {
                token: token.trim().to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            });
        }

        self.lookup.get(&key).copied().ok_or_else(|| ConvertError::UnsupportedCurrency {
            token: token.trim().to_string(),
            supported: self.supported_codes().into_iter().map(str::to_string).collect(),
        })
    }

    /// True when the token names a currency, even an ambiguous one
    pub fn is_currency(&self, token: &str) -> bool {
        let key = normalize_currency_token(token);
        self.lookup.contains_key(&key) || self.ambiguous.contains_key(&key)
    }

    pub fn get(&self, iso_code: &str) -> Option<&CurrencyDefinition> {
        self.currencies.iter().copied().find(|c| c.iso_code == iso_code)
    }

    /// ISO codes in registry order
    pub fn supported_codes(&self) -> Vec<&'static str> {
        self.currencies.iter().map(|c| c.iso_code).collect()
    }

    pub fn all(&self) -> &[&'static CurrencyDefinition] {
        &self.currencies
    }
}

impl Default for CurrencyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase and collapse whitespace
pub fn normalize_currency_token(token: &str) -> String {
    token.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelrate_core::ErrorKind;

    #[test]
    fn test_resolve_iso_codes() {
        let reg = CurrencyRegistry::new();
        assert_eq!(reg.resolve("USD").unwrap(), "USD");
        assert_eq!(reg.resolve("eur").unwrap(), "EUR");
    }

    #[test]
    fn test_case_and_whitespace_tolerant() {
        let reg = CurrencyRegistry::new();
        assert_eq!(reg.resolve(" usd ").unwrap(), reg.resolve("USD").unwrap());
        assert_eq!(reg.resolve("  us   dollars ").unwrap(), "USD");
    }

    #[test]
    fn test_aliases_and_symbols() {
        let reg = CurrencyRegistry::new();
        assert_eq!(reg.resolve("ILS").unwrap(), "NIS");
        assert_eq!(reg.resolve("₪").unwrap(), "NIS");
        assert_eq!(reg.resolve("RMB").unwrap(), "CNY");
        assert_eq!(reg.resolve("$").unwrap(), "USD");
        assert_eq!(reg.resolve("€").unwrap(), "EUR");
        assert_eq!(reg.resolve("£").unwrap(), "GBP");
        assert_eq!(reg.resolve("₹").unwrap(), "INR");
        assert_eq!(reg.resolve("c$").unwrap(), "CAD");
    }

    #[test]
    fn test_yen_symbol_is_ambiguous() {
        let reg = CurrencyRegistry::new();
        let err = reg.resolve("¥").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmbiguousCurrency);
        match err {
            ConvertError::AmbiguousCurrency { candidates, .. } => {
                assert_eq!(candidates, vec!["JPY".to_string(), "CNY".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(reg.is_currency("¥"));

        // Qualified symbols are not ambiguous
        assert_eq!(reg.resolve("JP¥").unwrap(), "JPY");
    }

    #[test]
    fn test_unsupported_lists_supported_codes() {
        let reg = CurrencyRegistry::new();
        let err = reg.resolve("XYZ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedCurrency);
        assert!(err.to_string().contains("USD, EUR, GBP"));
        assert!(!reg.is_currency("USG"));
    }

    #[test]
    fn test_lookup_keys_are_unique() {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for def in CURRENCIES {
            for key in std::iter::once(def.iso_code).chain(def.aliases.iter().copied()).chain(def.symbols.iter().copied()) {
                let key = normalize_currency_token(key);
                if let Some(other) = seen.insert(key.clone(), def.iso_code) {
                    assert_eq!(other, def.iso_code, "key {} is shared", key);
                }
            }
        }
        for (symbol, _) in AMBIGUOUS_SYMBOLS {
            assert!(!seen.contains_key(&normalize_currency_token(symbol)));
        }
    }
}
