//! Boundary checks for request payloads. Every failure carries the name of the
//! offending field so clients can highlight it.

use crate::error::{AppError, AppResult};

pub fn require_name(field: &'static str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() < 2 {
        return Err(AppError::validation(field, "Must have at least 2 characters"));
    }
    Ok(trimmed.to_string())
}

/// Phones are free-form but must contain at least 10 digits.
pub fn require_phone(value: &str) -> AppResult<String> {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        return Err(AppError::validation("phone", "Invalid phone number"));
    }
    Ok(value.trim().to_string())
}

pub fn require_email_prefix(value: &str) -> AppResult<String> {
    let prefix = value.trim();
    let len = prefix.chars().count();
    if !(3..=50).contains(&len) {
        return Err(AppError::validation(
            "emailPrefix",
            "Must have between 3 and 50 characters",
        ));
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
        return Err(AppError::validation(
            "emailPrefix",
            "Only letters, digits and dots are allowed",
        ));
    }
    Ok(prefix.to_ascii_lowercase())
}

pub fn build_email(prefix: &str, domain: &str) -> String {
    format!("{prefix}@{domain}")
}

pub fn require_password(password: &str, confirm: &str) -> AppResult<()> {
    if password.chars().count() < 8 {
        return Err(AppError::validation(
            "password",
            "Password must have at least 8 characters",
        ));
    }
    if !password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::validation(
            "password",
            "Password must contain only letters and digits",
        ));
    }
    if password != confirm {
        return Err(AppError::validation("confirmPassword", "Passwords do not match"));
    }
    Ok(())
}

pub fn require_shop_code(value: &str) -> AppResult<String> {
    let code = normalize_shop_code(value);
    let len = code.chars().count();
    if !(4..=12).contains(&len) {
        return Err(AppError::validation("shopCode", "Invalid shop code"));
    }
    Ok(code)
}

/// Shop codes are compared case-insensitively; the stored form is upper-case.
pub fn normalize_shop_code(value: &str) -> String {
    value.trim().to_ascii_uppercase()
}

pub fn require_commission_rate(rate: i32) -> AppResult<i32> {
    if !(0..=100).contains(&rate) {
        return Err(AppError::validation(
            "commissionRate",
            "Commission rate must be between 0 and 100",
        ));
    }
    Ok(rate)
}

/// Largest accepted price or deduction, in cents.
pub const MAX_AMOUNT: i64 = i32::MAX as i64;

pub fn require_amount(field: &'static str, amount: i64) -> AppResult<i64> {
    if amount < 0 {
        return Err(AppError::validation(field, "Amount cannot be negative"));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::validation(field, "Amount is too large"));
    }
    Ok(amount)
}
