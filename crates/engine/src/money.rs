use std::fmt;

use serde::{Deserialize, Serialize};

/// Money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (income and
/// expense amounts, derived tithes) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(amount.percent(10).cents(), 123);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns `percent`% of the amount, rounded half away from zero to the
    /// nearest cent.
    #[must_use]
    pub fn percent(self, percent: u8) -> MoneyCents {
        let scaled = i128::from(self.0) * i128::from(percent);
        let quotient = scaled / 100;
        let remainder = scaled % 100;
        let rounded = if remainder.abs() >= 50 {
            quotient + scaled.signum()
        } else {
            quotient
        };
        // Percentages above 100 can leave the i64 range: saturate.
        MoneyCents(i64::try_from(rounded).unwrap_or(if rounded > 0 {
            i64::MAX
        } else {
            i64::MIN
        }))
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(MoneyCents::new(0).to_string(), "0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "0.01");
        assert_eq!(MoneyCents::new(10).to_string(), "0.10");
        assert_eq!(MoneyCents::new(1050).to_string(), "10.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn percent_is_exact_on_round_amounts() {
        assert_eq!(MoneyCents::new(20_000).percent(10), MoneyCents::new(2_000));
        assert_eq!(MoneyCents::new(50_000).percent(10), MoneyCents::new(5_000));
        assert_eq!(MoneyCents::ZERO.percent(10), MoneyCents::ZERO);
    }

    #[test]
    fn percent_rounds_half_away_from_zero() {
        // 10% of 0.05 is 0.005 -> 0.01
        assert_eq!(MoneyCents::new(5).percent(10), MoneyCents::new(1));
        // 10% of 0.04 is 0.004 -> 0.00
        assert_eq!(MoneyCents::new(4).percent(10), MoneyCents::ZERO);
        // 10% of 12.35 is 1.235 -> 1.24
        assert_eq!(MoneyCents::new(1235).percent(10), MoneyCents::new(124));
        assert_eq!(MoneyCents::new(-1235).percent(10), MoneyCents::new(-124));
    }

    #[test]
    fn percent_does_not_overflow() {
        assert_eq!(
            MoneyCents::new(i64::MAX).percent(10).cents(),
            (i128::from(i64::MAX) * 10 / 100 + 1) as i64
        );
    }
}
