use crate::validate::{FormRecord, Rule};

use super::is_valid_email;

/// Records with an email field.
pub trait HasEmail: FormRecord {
    const EMAIL: Self::Field;

    fn email(&self) -> &str;
}

fn email_missing<T: HasEmail>(values: &T) -> bool {
    values.email().trim().is_empty()
}

fn email_malformed<T: HasEmail>(values: &T) -> bool {
    !is_valid_email(values.email().trim())
}

/// Required + format checks on the trimmed email.
pub fn email_rules<T: HasEmail>() -> Vec<Rule<T>> {
    vec![
        Rule::new(T::EMAIL, "Email is required", email_missing::<T>),
        Rule::new(T::EMAIL, "Invalid email format", email_malformed::<T>),
    ]
}
