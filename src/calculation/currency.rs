//! Currency rounding.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to whole cents, halves away from zero.
///
/// # Examples
///
/// ```
/// use nl_income_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_currency(Decimal::from_str("13769.5662").unwrap()), Decimal::from_str("13769.57").unwrap());
/// assert_eq!(round_currency(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.13").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
