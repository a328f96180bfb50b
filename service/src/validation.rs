//! Field rules shared by the forms.

use sea_orm::prelude::Decimal;

use crate::error::{FieldErrors, ServiceError};

pub const MIN_YEARS_OF_EXPERIENCE: i32 = 2;
pub const NAME_MAX_LENGTH: usize = 255;
pub const USERNAME_MAX_LENGTH: usize = 150;
pub const PRICE_MAX_DIGITS: u32 = 15;
pub const PRICE_DECIMAL_PLACES: u32 = 2;

const YEARS_MESSAGE: &str = "Years of experience should be greater or equal 2";

/// Rejects cooks with less than two years in a kitchen.
pub fn validate_years_of_experience(years_of_experience: i32) -> Result<i32, ServiceError> {
    if years_of_experience < MIN_YEARS_OF_EXPERIENCE {
        let mut errors = FieldErrors::new();
        errors.add("years_of_experience", YEARS_MESSAGE);
        return Err(ServiceError::Validation(errors));
    }

    Ok(years_of_experience)
}

/// Trims `value` and records an error when it is blank or longer than `max_length`.
pub(crate) fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    max_length: Option<usize>,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else if let Some(max) = max_length {
        let length = value.chars().count();
        if length > max {
            errors.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {length})."),
            );
        }
    }
    value.to_owned()
}

pub(crate) fn username(errors: &mut FieldErrors, value: &str) -> String {
    let value = required_text(errors, "username", value, Some(USERNAME_MAX_LENGTH));
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !value.chars().all(allowed) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
    value
}

pub(crate) fn years_of_experience(errors: &mut FieldErrors, value: i32) {
    if let Err(ServiceError::Validation(rejected)) = validate_years_of_experience(value) {
        errors.merge(rejected);
    }
}

/// Checks a price against the `decimal(15, 2)` column. Trailing zeros do not
/// count as decimal places.
pub(crate) fn price(errors: &mut FieldErrors, value: Decimal) -> Decimal {
    if value.is_sign_negative() && !value.is_zero() {
        errors.add("price", "Ensure this value is greater than or equal to 0.");
    }

    let normalized = value.normalize();
    let decimals = normalized.scale();
    let digits = (normalized.mantissa().unsigned_abs().to_string().len() as u32).max(decimals);
    let whole_digits = digits - decimals;
    if digits > PRICE_MAX_DIGITS {
        errors.add(
            "price",
            format!("Ensure that there are no more than {PRICE_MAX_DIGITS} digits in total."),
        );
    }
    if decimals > PRICE_DECIMAL_PLACES {
        errors.add(
            "price",
            format!("Ensure that there are no more than {PRICE_DECIMAL_PLACES} decimal places."),
        );
    }
    if whole_digits > PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES {
        errors.add(
            "price",
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES
            ),
        );
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_below_two_are_rejected() {
        for years in [-1, 0, 1] {
            let err = validate_years_of_experience(years).unwrap_err();
            match err {
                ServiceError::Validation(errors) => {
                    assert_eq!(errors.get("years_of_experience"), Some(&[YEARS_MESSAGE.to_owned()][..]));
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn two_years_and_more_pass_through() {
        assert_eq!(validate_years_of_experience(2).unwrap(), 2);
        assert_eq!(validate_years_of_experience(35).unwrap(), 35);
    }

    #[test]
    fn required_text_trims_and_checks_length() {
        let mut errors = FieldErrors::new();
        assert_eq!(required_text(&mut errors, "name", "  Soup ", Some(10)), "Soup");
        assert!(errors.is_empty());

        required_text(&mut errors, "name", "   ", Some(10));
        required_text(&mut errors, "description", "far too long", Some(3));
        assert!(errors.contains("name"));
        assert!(errors.contains("description"));
    }

    #[test]
    fn usernames_accept_letters_digits_and_symbols() {
        let mut errors = FieldErrors::new();
        username(&mut errors, "chef.mario+1@kitchen_2");
        assert!(errors.is_empty());

        username(&mut errors, "chef mario");
        assert!(errors.contains("username"));
    }

    #[test]
    fn negative_prices_are_rejected() {
        let mut errors = FieldErrors::new();
        assert_eq!(price(&mut errors, Decimal::new(550, 2)), Decimal::new(55, 1));
        assert_eq!(price(&mut errors, Decimal::ZERO), Decimal::ZERO);
        assert!(errors.is_empty());

        price(&mut errors, Decimal::new(-1, 2));
        assert!(errors.contains("price"));
    }

    #[test]
    fn prices_fit_fifteen_digits_with_two_decimals() {
        let mut errors = FieldErrors::new();
        price(&mut errors, Decimal::new(5500, 3));
        price(&mut errors, Decimal::new(9_999_999_999_999_99, 2));
        assert!(errors.is_empty());

        price(&mut errors, Decimal::new(5555, 3));
        assert_eq!(
            errors.get("price"),
            Some(&["Ensure that there are no more than 2 decimal places.".to_owned()][..])
        );

        let mut errors = FieldErrors::new();
        price(&mut errors, Decimal::new(12_345_678_901_234_567, 0));
        let messages = errors.get("price").unwrap();
        assert!(messages.contains(&"Ensure that there are no more than 15 digits in total.".to_owned()));
        assert!(messages
            .contains(&"Ensure that there are no more than 13 digits before the decimal point.".to_owned()));
    }
}
