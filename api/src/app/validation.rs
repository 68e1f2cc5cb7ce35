//! Payload validation helpers
//!
//! Every failure is a `DomainError::Validation` naming the offending field.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::DomainError;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{10}$").expect("phone regex is valid"))
}

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]{3,50}$").expect("username regex is valid"))
}

/// Unwrap a required payload field
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, DomainError> {
    value.ok_or_else(|| DomainError::Validation(format!("{} must not be null", field)))
}

/// Unwrap a required text field, rejecting blank strings
pub fn required_text(value: Option<&str>, field: &str) -> Result<String, DomainError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::Validation(format!(
            "{} must not be blank",
            field
        ))),
    }
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email_regex().is_match(email) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "email '{}' is not a valid address",
            email
        )))
    }
}

pub fn validate_phone_number(phone: &str) -> Result<(), DomainError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(DomainError::Validation(
            "phoneNumber must be exactly 10 digits".to_string(),
        ))
    }
}

pub fn validate_pin_code(pin_code: i32) -> Result<(), DomainError> {
    if (100_000..=999_999).contains(&pin_code) {
        Ok(())
    } else {
        Err(DomainError::Validation(
            "pinCode must be a 6 digit number".to_string(),
        ))
    }
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username_regex().is_match(username) {
        Ok(())
    } else {
        Err(DomainError::Validation(
            "username must be 3-50 letters, digits, '.', '_' or '-'".to_string(),
        ))
    }
}
