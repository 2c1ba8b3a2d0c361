//! Field rules shared by request types, usable from `#[validate(custom = ...)]`.

use crate::services::money::within_money_range;
use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failure("blank", "must not be blank"));
    }
    Ok(())
}

fn fits_column(value: &Decimal) -> Result<(), ValidationError> {
    if !within_money_range(*value) {
        return Err(failure("range", "must not exceed 99999999.99"));
    }
    Ok(())
}

pub fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(failure("positive", "must be greater than 0"));
    }
    fits_column(value)
}

pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(failure("non_negative", "must not be negative"));
    }
    fits_column(value)
}

/// A non-negative amount that fits the money columns.
pub fn money_amount(value: &Decimal) -> Result<(), ValidationError> {
    non_negative_decimal(value)
}

pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(failure("percentage", "must be between 0 and 100"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rules_accept_and_reject() {
        assert!(not_blank("HDPE").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(positive_decimal(&dec!(0.01)).is_ok());
        assert!(positive_decimal(&dec!(0)).is_err());
        assert!(non_negative_decimal(&dec!(0)).is_ok());
        assert!(non_negative_decimal(&dec!(-0.5)).is_err());
        assert!(positive_decimal(&dec!(99999999.99)).is_ok());
        assert!(positive_decimal(&dec!(100000000)).is_err());
        assert!(money_amount(&dec!(70000000000000000000000000000)).is_err());
        assert!(percentage(&dec!(100)).is_ok());
        assert!(percentage(&dec!(100.01)).is_err());
    }
}
