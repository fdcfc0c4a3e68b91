use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::shared::constants::MAX_PRICE_CENTS;

pub const BLANK_MESSAGE: &str = "can't be blank";
pub const NEGATIVE_MESSAGE: &str = "must be greater than or equal to 0";

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects empty and whitespace-only strings
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", BLANK_MESSAGE));
    }
    Ok(())
}

/// Price must be non-negative and fit `NUMERIC(10, 2)`
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(error("greater_than_or_equal_to", NEGATIVE_MESSAGE));
    }
    if *value > Decimal::new(MAX_PRICE_CENTS, 2) {
        return Err(error(
            "less_than_or_equal_to",
            "must be less than or equal to 99999999.99",
        ));
    }
    Ok(())
}
