//! Input validation utilities.

use regex::Regex;

use crate::types::AccountError;

/// Validate email syntax.
pub fn validate_email(email: &str) -> Result<(), AccountError> {
    let email_regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|_| AccountError::Validation("invalid email regex".to_string()))?;

    if !email_regex.is_match(email) {
        return Err(AccountError::Validation("invalid email format".to_string()));
    }

    if email.len() > 255 {
        return Err(AccountError::Validation(
            "email too long (max 255 characters)".to_string(),
        ));
    }

    Ok(())
}

/// Validate a candidate password before hashing.
pub fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.is_empty() {
        return Err(AccountError::Validation(
            "password cannot be empty".to_string(),
        ));
    }

    if password.len() > 128 {
        return Err(AccountError::Validation(
            "password too long (max 128 characters)".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        for email in ["a@x.com", "first.last@sub.example.org", "x+tag@y.io"] {
            assert!(validate_email(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["", "plain", "a@b", "no spaces@x.com", "a@@x.com", "@x.com"] {
            assert!(validate_email(email).is_err(), "{email} should be invalid");
        }
    }

    #[test]
    fn rejects_overlong_addresses() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(validate_email(&email).is_err());
    }

    #[test]
    fn password_bounds() {
        assert!(validate_password("").is_err());
        assert!(validate_password("ok").is_ok());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }
}
