//! Price text cleaning.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::TransformError;

/// Everything that is not an ASCII digit or a dot.
static NON_NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("valid regex"));

/// Strips every character other than `0-9` and `.` from `raw` and parses
/// the remainder as a fixed-point decimal, keeping its scale
/// (`"£0.00"` parses to `0.00`, not `0`). Values that would need rounding
/// to fit a [`Decimal`] are rejected rather than altered.
///
/// # Errors
///
/// Returns [`TransformError::InvalidPrice`] if nothing numeric remains or
/// the remainder is not a valid decimal (e.g. `"1.2.3"`) or has more
/// significant digits than a [`Decimal`] holds.
pub fn clean_price(raw: &str) -> Result<Decimal, TransformError> {
    let cleaned = NON_NUMERIC_RE.replace_all(raw, "");
    Decimal::from_str_exact(&cleaned).map_err(|source| TransformError::InvalidPrice {
        raw: raw.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn strips_currency_symbol() {
        assert_eq!(clean_price("£51.77").unwrap(), dec("51.77"));
        assert_eq!(clean_price("$9.99").unwrap(), dec("9.99"));
    }

    #[test]
    fn zero_price_keeps_scale() {
        let price = clean_price("£0.00").unwrap();
        assert_eq!(price, Decimal::ZERO);
        assert_eq!(price.to_string(), "0.00");
    }

    #[test]
    fn strips_mis_decoded_prefix_and_separators() {
        assert_eq!(clean_price("Â£51.77").unwrap(), dec("51.77"));
        assert_eq!(clean_price(" £1,234.50 ").unwrap(), dec("1234.50"));
    }

    #[test]
    fn whole_numbers_parse() {
        assert_eq!(clean_price("£20").unwrap(), dec("20"));
    }

    #[test]
    fn rejects_empty_remainder() {
        assert!(matches!(
            clean_price("£"),
            Err(TransformError::InvalidPrice { ref raw, .. }) if raw == "£"
        ));
        assert!(clean_price("").is_err());
        assert!(clean_price("free").is_err());
    }

    #[test]
    fn rejects_prices_that_would_be_rounded() {
        assert!(matches!(
            clean_price("£12345678901234567890123456789.5"),
            Err(TransformError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn bare_dot_edges() {
        assert_eq!(clean_price("£.5").unwrap(), dec("0.5"));
        assert_eq!(clean_price("£5.").unwrap(), dec("5"));
        assert!(clean_price("£.").is_err());
    }

    #[test]
    fn rejects_multiple_dots() {
        assert!(clean_price("£1.2.3").is_err());
    }
}
