use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

/// A signed monetary amount in whatever currency the source file used.
///
/// No rounding is applied: an export that carries three decimal places keeps
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.normalize())
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Neg for Money {
    type Output = Self;
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl From<Decimal> for Money {
    fn from(decimal: Decimal) -> Self {
        Money::from_decimal(decimal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_predicates() {
        let m = Money::from_decimal(Decimal::new(4567, 2));
        assert!(m.is_positive());
        assert!(!m.is_negative());
        assert!((-m).is_negative());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn keeps_precision_beyond_cents() {
        let m = Money::from_decimal(Decimal::new(12345, 3));
        assert_eq!(m.as_decimal(), Decimal::new(12345, 3));
    }

    #[test]
    fn trailing_zeros_compare_equal() {
        assert_eq!(
            Money::from_decimal(Decimal::new(123450, 2)),
            Money::from_decimal(Decimal::new(12345, 1))
        );
    }

    #[test]
    fn display_two_places() {
        assert_eq!(Money::from_decimal(Decimal::new(-5, 0)).to_string(), "-5.00");
        assert_eq!(Money::from_decimal(Decimal::new(4567, 2)).to_string(), "45.67");
    }

    #[test]
    fn from_decimal_normalizes() {
        let m: Money = Decimal::new(1200, 2).into();
        assert_eq!(m.as_decimal().to_string(), "12");
    }

    #[test]
    fn abs_drops_sign() {
        let m = Money::from_decimal(Decimal::new(-250, 2));
        assert_eq!(m.abs(), Money::from_decimal(Decimal::new(250, 2)));
    }
}
