//! Monetary arithmetic for cart lines. All results carry exactly two decimal
//! places, rounded half away from zero, and stay inside the `DECIMAL(10,2)`
//! column range.

use crate::errors::ServiceError;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Largest amount a `DECIMAL(10,2)` column holds.
pub const MAX_MONEY: Decimal = dec!(99999999.99);

const OUT_OF_RANGE: &str = "Amount exceeds the supported range";

/// Rounds to cents and pins the scale so `270` renders as `270.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

pub fn within_money_range(value: Decimal) -> bool {
    value <= MAX_MONEY
}

/// Rounds `value` and rejects it when it no longer fits the money columns.
pub fn bounded_money(value: Decimal) -> Result<Decimal, ServiceError> {
    let rounded = round_money(value);
    if within_money_range(rounded.abs()) {
        Ok(rounded)
    } else {
        Err(ServiceError::validation(OUT_OF_RANGE))
    }
}

fn checked_times(amount: Decimal, factor: Decimal) -> Result<Decimal, ServiceError> {
    amount
        .checked_mul(factor)
        .ok_or_else(|| ServiceError::validation(OUT_OF_RANGE))
}

/// Applies a percentage discount. Absent or non-positive discounts leave the
/// amount untouched.
pub fn apply_discount(
    amount: Decimal,
    discount_percent: Option<Decimal>,
) -> Result<Decimal, ServiceError> {
    match discount_percent {
        Some(pct) if pct > Decimal::ZERO => {
            Ok(amount - checked_times(amount, pct)? / Decimal::ONE_HUNDRED)
        }
        _ => Ok(amount),
    }
}

/// Total for a cart line. A caller supplied total wins outright.
pub fn line_total(
    unit_price: Decimal,
    quantity: i32,
    discount_percent: Option<Decimal>,
    client_total: Option<Decimal>,
) -> Result<Decimal, ServiceError> {
    if let Some(total) = client_total {
        return bounded_money(total);
    }
    let base = checked_times(unit_price, Decimal::from(quantity))?;
    bounded_money(apply_discount(base, discount_percent)?)
}

/// Scales a stored line to a new quantity using the effective per-unit price
/// baked into its total. `Ok(None)` means the stored pair cannot yield a
/// per-unit figure.
pub fn rescale_line_total(
    stored_total: Decimal,
    stored_quantity: i32,
    new_quantity: i32,
) -> Result<Option<Decimal>, ServiceError> {
    if stored_quantity <= 0 || stored_total.is_zero() {
        return Ok(None);
    }
    let per_unit = round_money(stored_total / Decimal::from(stored_quantity));
    let total = checked_times(per_unit, Decimal::from(new_quantity))?;
    bounded_money(total).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    #[test]
    fn round_money_pins_two_places() {
        assert_eq!(round_money(dec!(270)).to_string(), "270.00");
        assert_eq!(round_money(dec!(1.005)).to_string(), "1.01");
        assert_eq!(round_money(dec!(1.004)).to_string(), "1.00");
    }

    #[rstest]
    #[case(dec!(100.00), 3, Some(dec!(10)), dec!(270.00))]
    #[case(dec!(100.00), 3, None, dec!(300.00))]
    #[case(dec!(100.00), 3, Some(dec!(0)), dec!(300.00))]
    #[case(dec!(19.99), 7, Some(dec!(12.5)), dec!(122.44))]
    fn line_total_applies_discount(
        #[case] unit: Decimal,
        #[case] qty: i32,
        #[case] discount: Option<Decimal>,
        #[case] expected: Decimal,
    ) {
        assert_eq!(line_total(unit, qty, discount, None).unwrap(), expected);
    }

    #[test]
    fn client_total_is_not_discounted_again() {
        assert_eq!(
            line_total(dec!(100), 3, Some(dec!(10)), Some(dec!(255.5))).unwrap(),
            dec!(255.50)
        );
    }

    #[test]
    fn rescale_keeps_effective_unit_price() {
        assert_eq!(
            rescale_line_total(dec!(270.00), 3, 5).unwrap(),
            Some(dec!(450.00))
        );
        // 100 / 3 = 33.333.. rounds to 33.33 per unit
        assert_eq!(
            rescale_line_total(dec!(100.00), 3, 6).unwrap(),
            Some(dec!(199.98))
        );
    }

    #[test]
    fn rescale_needs_a_usable_stored_pair() {
        assert_eq!(rescale_line_total(dec!(0), 3, 5).unwrap(), None);
        assert_eq!(rescale_line_total(dec!(10), 0, 5).unwrap(), None);
    }

    #[test]
    fn oversized_amounts_fail_instead_of_overflowing() {
        let huge = Decimal::MAX / dec!(2);
        assert_matches!(
            line_total(huge, i32::MAX, None, None),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            rescale_line_total(huge, 1, 2),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            apply_discount(huge, Some(dec!(50))),
            Err(ServiceError::ValidationError(_))
        );
        assert_matches!(
            line_total(dec!(1), 1, None, Some(dec!(100000000))),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn totals_past_the_column_range_are_rejected() {
        assert_matches!(
            line_total(MAX_MONEY, 2, None, None),
            Err(ServiceError::ValidationError(msg)) if msg == OUT_OF_RANGE
        );
        assert_eq!(line_total(MAX_MONEY, 1, None, None).unwrap(), MAX_MONEY);
    }
}
