use fathom_core::Money;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Empty amount")]
    Empty,
    #[error("Invalid amount: '{0}'")]
    Invalid(String),
}

/// Parse a loosely formatted amount cell.
///
/// Currency symbols, letters and spaces are dropped; a `(...)` pair forces the
/// result negative; commas are treated as thousands separators.
pub fn parse_amount(raw: &str) -> Result<Money, AmountError> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ','))
        .collect();
    let parenthesized = is_parenthesized(raw);
    let digits = kept.replace(',', "");

    if digits.is_empty() {
        return Err(AmountError::Empty);
    }

    let unsigned = digits.strip_prefix('+').unwrap_or(&digits);
    let value = Decimal::from_str(unsigned).map_err(|_| AmountError::Invalid(raw.trim().to_string()))?;

    let value = if parenthesized { -value.abs() } else { value };
    Ok(value.into())
}

/// An opening parenthesis followed later by a closing one.
fn is_parenthesized(raw: &str) -> bool {
    match (raw.find('('), raw.rfind(')')) {
        (Some(open), Some(close)) => open < close,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(units: i64, scale: u32) -> Money {
        Money::from_decimal(Decimal::new(units, scale))
    }

    #[test]
    fn plain() {
        assert_eq!(parse_amount("45.67").unwrap(), money(4567, 2));
    }

    #[test]
    fn currency_symbol_and_grouping() {
        assert_eq!(parse_amount("$1,234.50").unwrap(), money(123450, 2));
        assert_eq!(parse_amount("€ 1,000,000").unwrap(), money(1_000_000, 0));
        assert_eq!(parse_amount("USD 12.00").unwrap(), money(12, 0));
    }

    #[test]
    fn accounting_parens_are_negative() {
        assert_eq!(parse_amount("(50.00)").unwrap(), money(-5000, 2));
        assert_eq!(parse_amount("($1,200.10)").unwrap(), money(-120010, 2));
        assert_eq!(parse_amount("(-3)").unwrap(), money(-3, 0));
    }

    #[test]
    fn unbalanced_parens_keep_sign() {
        assert_eq!(parse_amount(")12(").unwrap(), money(12, 0));
        assert_eq!(parse_amount("(12").unwrap(), money(12, 0));
    }

    #[test]
    fn explicit_signs() {
        assert_eq!(parse_amount("-50.00").unwrap(), money(-50, 0));
        assert_eq!(parse_amount("+8.5").unwrap(), money(85, 1));
    }

    #[test]
    fn multiple_decimal_points_fail() {
        assert!(matches!(parse_amount("12.5.3"), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn non_numeric_fails() {
        assert!(matches!(parse_amount(""), Err(AmountError::Empty)));
        assert!(matches!(parse_amount("n/a"), Err(AmountError::Empty)));
        assert!(matches!(parse_amount("--"), Err(AmountError::Invalid(_))));
    }
}
