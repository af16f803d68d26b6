use crate::validate::{FormRecord, Rule};

use super::char_len;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Records with a password field. Password checks never trim.
pub trait HasPassword: FormRecord {
    const PASSWORD: Self::Field;

    fn password(&self) -> &str;
}

fn missing<T: HasPassword>(values: &T) -> bool {
    values.password().is_empty()
}

fn too_short<T: HasPassword>(values: &T) -> bool {
    char_len(values.password()) < MIN_PASSWORD_LEN
}

fn no_letter<T: HasPassword>(values: &T) -> bool {
    !values.password().chars().any(|c| c.is_ascii_alphabetic())
}

fn no_digit<T: HasPassword>(values: &T) -> bool {
    !values.password().chars().any(|c| c.is_ascii_digit())
}

fn no_symbol<T: HasPassword>(values: &T) -> bool {
    !values.password().chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn password_rules<T: HasPassword>() -> Vec<Rule<T>> {
    vec![
        Rule::new(T::PASSWORD, "Password is required", missing::<T>),
        Rule::new(T::PASSWORD, "Password must be at least 8 characters", too_short::<T>),
        Rule::new(T::PASSWORD, "Password must contain at least one letter", no_letter::<T>),
        Rule::new(T::PASSWORD, "Password must contain at least one number", no_digit::<T>),
        Rule::new(
            T::PASSWORD,
            "Password must contain at least one special character",
            no_symbol::<T>,
        ),
    ]
}
