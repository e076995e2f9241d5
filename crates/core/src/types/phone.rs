//! Phone number format check.

use std::sync::LazyLock;

use regex::Regex;

/// Digits, parentheses, plus, dash and spaces. Nothing else.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9()+\- ]+$").expect("phone pattern is a valid regex")
});

/// Errors that can occur when checking a phone number.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty after trimming.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits, `()+-` and spaces.
    #[error("phone number may only contain digits, spaces, and ()+-")]
    InvalidCharacters,
}

/// Returns `true` if `s` looks like a phone number the forms accept.
///
/// ```
/// use reviewhut_core::is_valid_phone;
///
/// assert!(is_valid_phone("+1 (234) 567-890"));
/// assert!(!is_valid_phone("call me"));
/// ```
#[must_use]
pub fn is_valid_phone(s: &str) -> bool {
    check_phone(s).is_ok()
}

/// Check a phone number and report why it was refused.
///
/// # Errors
///
/// Returns [`PhoneError`] if the input is blank or has disallowed characters.
pub fn check_phone(s: &str) -> Result<(), PhoneError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(PhoneError::Empty);
    }
    if !PHONE_PATTERN.is_match(trimmed) {
        return Err(PhoneError::InvalidCharacters);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_formatted_numbers() {
        assert!(is_valid_phone("+1 234 567 890"));
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("07700900123"));
    }

    #[test]
    fn test_rejects_letters() {
        assert_eq!(check_phone("555-CALL"), Err(PhoneError::InvalidCharacters));
        assert_eq!(check_phone("+1.234.567"), Err(PhoneError::InvalidCharacters));
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(check_phone("   "), Err(PhoneError::Empty));
    }
}
