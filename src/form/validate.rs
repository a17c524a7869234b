use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::phone::digits_only;

pub const MIN_PHONE_DIGITS: usize = 10;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please enter a valid phone number with area code.")]
    InvalidPhone,
}

/// Check the form as currently displayed. Only the first failing rule is
/// reported.
pub fn validate(email: &str, phone: &str) -> Result<(), ValidationError> {
    if email.is_empty() || phone.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if digits_only(phone).len() < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidPhone);
    }

    Ok(())
}
