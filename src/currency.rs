//! Currency reference table and locale-aware amount formatting
//!
//! Amounts are rendered with no fraction digits, the way the dashboard
//! shows them. Unknown currency codes fall back to the first entry of
//! the table instead of failing.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    #[default]
    Inr,
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Inr => "INR",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Jpy => "JPY",
        }
    }

    /// Case-insensitive lookup of an ISO code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "INR" => Some(CurrencyCode::Inr),
            "USD" => Some(CurrencyCode::Usd),
            "EUR" => Some(CurrencyCode::Eur),
            "GBP" => Some(CurrencyCode::Gbp),
            "JPY" => Some(CurrencyCode::Jpy),
            _ => None,
        }
    }

    pub fn currency(&self) -> &'static Currency {
        lookup_currency(self.as_str()).unwrap_or(&SUPPORTED_CURRENCIES[0])
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Unrecognised codes select the default currency, matching `format_amount`.
impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .and_then(CurrencyCode::from_code)
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Currency {
    pub code: CurrencyCode,
    pub symbol: &'static str,
    pub name: &'static str,
    pub locale: &'static str,
}

/// Registered currencies. The first entry is the fallback.
pub static SUPPORTED_CURRENCIES: [Currency; 5] = [
    Currency { code: CurrencyCode::Inr, symbol: "₹", name: "Indian Rupee", locale: "en-IN" },
    Currency { code: CurrencyCode::Usd, symbol: "$", name: "US Dollar", locale: "en-US" },
    Currency { code: CurrencyCode::Eur, symbol: "€", name: "Euro", locale: "de-DE" },
    Currency { code: CurrencyCode::Gbp, symbol: "£", name: "British Pound", locale: "en-GB" },
    Currency { code: CurrencyCode::Jpy, symbol: "¥", name: "Japanese Yen", locale: "ja-JP" },
];

pub fn lookup_currency(code: &str) -> Option<&'static Currency> {
    let code = code.trim();
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.code.as_str().eq_ignore_ascii_case(code))
}

/// Format `value` in the currency registered under `currency_code`.
pub fn format_amount(value: f64, currency_code: &str) -> String {
    lookup_currency(currency_code)
        .unwrap_or(&SUPPORTED_CURRENCIES[0])
        .format(value)
}

//
// ================= Locale rules =================
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grouping {
    Thousands,
    /// Lakh/crore: last three digits, then pairs.
    Indian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    Prefix,
    /// Trailing symbol separated by a no-break space.
    Suffix,
}

#[derive(Debug, Clone, Copy)]
struct NumberStyle {
    grouping: Grouping,
    separator: char,
    symbol_position: SymbolPosition,
}

fn style_for_locale(locale: &str) -> NumberStyle {
    match locale {
        "en-IN" => NumberStyle {
            grouping: Grouping::Indian,
            separator: ',',
            symbol_position: SymbolPosition::Prefix,
        },
        "de-DE" => NumberStyle {
            grouping: Grouping::Thousands,
            separator: '.',
            symbol_position: SymbolPosition::Suffix,
        },
        _ => NumberStyle {
            grouping: Grouping::Thousands,
            separator: ',',
            symbol_position: SymbolPosition::Prefix,
        },
    }
}

impl Currency {
    /// Render an amount with this currency's locale and symbol.
    pub fn format(&self, value: f64) -> String {
        let style = style_for_locale(self.locale);

        let (negative, body) = if value.is_nan() {
            (false, "NaN".to_string())
        } else if value.is_infinite() {
            (value < 0.0, "∞".to_string())
        } else {
            // f64::round is half away from zero
            let rounded = value.round();
            let digits = format!("{:.0}", rounded.abs());
            (rounded < 0.0, group_digits(&digits, style))
        };

        let sign = if negative { "-" } else { "" };
        match style.symbol_position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, self.symbol, body),
            SymbolPosition::Suffix => format!("{}{}\u{a0}{}", sign, body, self.symbol),
        }
    }
}

fn group_digits(digits: &str, style: NumberStyle) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = match style.grouping {
        Grouping::Thousands => 3,
        Grouping::Indian => 2,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(group);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    groups.push(tail);

    groups.join(&style.separator.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_uses_us_locale() {
        assert_eq!(format_amount(1234.0, "USD"), "$1,234");
    }

    #[test]
    fn test_unknown_code_falls_back_to_inr() {
        assert_eq!(format_amount(1234.0, "XXX"), "₹1,234");
        assert_eq!(format_amount(1234.0, ""), format_amount(1234.0, "INR"));
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_amount(1_234_567.0, "INR"), "₹12,34,567");
        assert_eq!(format_amount(100_000.0, "INR"), "₹1,00,000");
        assert_eq!(format_amount(999.0, "INR"), "₹999");
    }

    #[test]
    fn test_euro_suffix_and_dot_grouping() {
        assert_eq!(format_amount(1234.5, "EUR"), "1.235\u{a0}€");
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(format_amount(-1500.0, "GBP"), "-£1,500");
        assert_eq!(format_amount(0.0, "JPY"), "¥0");
        assert_eq!(format_amount(-0.4, "USD"), "$0");
    }

    #[test]
    fn test_code_lookup_is_case_insensitive() {
        assert_eq!(format_amount(1_000_000.0, "jpy"), "¥1,000,000");
        assert_eq!(CurrencyCode::from_code("gbp"), Some(CurrencyCode::Gbp));
        assert_eq!(CurrencyCode::from_code("XYZ"), None);
    }

    #[test]
    fn test_deserialize_unknown_currency_defaults() {
        let code: CurrencyCode = serde_json::from_str("\"CHF\"").unwrap();
        assert_eq!(code, CurrencyCode::Inr);
        let code: CurrencyCode = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(code, CurrencyCode::Eur);
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EUR\"");
    }

    #[test]
    fn test_first_entry_is_inr() {
        assert_eq!(SUPPORTED_CURRENCIES[0].code, CurrencyCode::Inr);
        assert_eq!(CurrencyCode::Usd.currency().locale, "en-US");
    }
}
