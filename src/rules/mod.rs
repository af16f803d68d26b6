//! Declarative rule sets for the login, registration and user forms.
//!
//! Email and password checks are generic generators over any record that
//! exposes the matching field, so the auth forms share them without
//! duplicating the rule lists.
//!
pub mod email;
pub mod login;
pub mod password;
pub mod register;
pub mod user;

use once_cell::sync::Lazy;
use regex::Regex;

/// No whitespace, one `@`, and at least one `.` after it.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Length in characters rather than bytes.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_accepts_and_rejects() {
        assert!(is_valid_email("george.bluth@reqres.in"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email(" a@b.c"));
    }
}
