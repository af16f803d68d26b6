use crate::validate::{FormRecord, Rule};

use super::char_len;
use super::email::{HasEmail, email_rules};
use super::password::{HasPassword, password_rules};

pub const MIN_USERNAME_LEN: usize = 3;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegisterField {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl FormRecord for RegisterForm {
    type Field = RegisterField;

    fn fields() -> &'static [RegisterField] {
        &[
            RegisterField::Username,
            RegisterField::Email,
            RegisterField::Password,
            RegisterField::ConfirmPassword,
        ]
    }

    fn label(field: RegisterField) -> &'static str {
        match field {
            RegisterField::Username => "Username",
            RegisterField::Email => "Email",
            RegisterField::Password => "Password",
            RegisterField::ConfirmPassword => "Confirm password",
        }
    }

    fn value(&self, field: RegisterField) -> &str {
        match field {
            RegisterField::Username => &self.username,
            RegisterField::Email => &self.email,
            RegisterField::Password => &self.password,
            RegisterField::ConfirmPassword => &self.confirm_password,
        }
    }

    fn value_mut(&mut self, field: RegisterField) -> &mut String {
        match field {
            RegisterField::Username => &mut self.username,
            RegisterField::Email => &mut self.email,
            RegisterField::Password => &mut self.password,
            RegisterField::ConfirmPassword => &mut self.confirm_password,
        }
    }
}

impl HasEmail for RegisterForm {
    const EMAIL: RegisterField = RegisterField::Email;

    fn email(&self) -> &str {
        &self.email
    }
}

impl HasPassword for RegisterForm {
    const PASSWORD: RegisterField = RegisterField::Password;

    fn password(&self) -> &str {
        &self.password
    }
}

pub fn register_rules() -> Vec<Rule<RegisterForm>> {
    let mut rules = vec![
        Rule::new(RegisterField::Username, "Username is required", |v: &RegisterForm| {
            v.username.trim().is_empty()
        }),
        Rule::new(
            RegisterField::Username,
            "Username must be at least 3 characters",
            |v: &RegisterForm| char_len(v.username.trim()) < MIN_USERNAME_LEN,
        ),
    ];
    rules.extend(email_rules::<RegisterForm>());
    rules.push(Rule::new(
        RegisterField::ConfirmPassword,
        "Confirm password is required",
        |v: &RegisterForm| v.confirm_password.is_empty(),
    ));
    rules.push(Rule::new(
        RegisterField::ConfirmPassword,
        "Passwords do not match",
        |v: &RegisterForm| v.password != v.confirm_password,
    ));
    rules.extend(password_rules::<RegisterForm>());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    fn form(username: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.into(),
            email: "eve.holt@reqres.in".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn mismatched_confirmation_is_reported_alone() {
        let errors =
            validate(&form("eve", "StrongPass1!", "Different1!"), &register_rules()).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&RegisterField::ConfirmPassword], vec!["Passwords do not match"]);
    }

    #[test]
    fn matching_strong_passwords_pass() {
        assert!(validate(&form("eve", "StrongPass1!", "StrongPass1!"), &register_rules()).is_none());
    }

    #[test]
    fn username_length_uses_trimmed_value() {
        let errors =
            validate(&form("  ab  ", "StrongPass1!", "StrongPass1!"), &register_rules()).unwrap();
        assert_eq!(
            errors[&RegisterField::Username],
            vec!["Username must be at least 3 characters"]
        );
    }

    #[test]
    fn empty_confirmation_fires_both_rules() {
        let errors = validate(&form("eve", "StrongPass1!", ""), &register_rules()).unwrap();
        assert_eq!(
            errors[&RegisterField::ConfirmPassword],
            vec!["Confirm password is required", "Passwords do not match"]
        );
    }

    #[test]
    fn rule_order_is_username_email_confirm_password() {
        let fields: Vec<RegisterField> = register_rules().iter().map(|r| r.field).collect();
        assert_eq!(fields.first(), Some(&RegisterField::Username));
        assert_eq!(fields[2], RegisterField::Email);
        assert_eq!(fields[4], RegisterField::ConfirmPassword);
        assert_eq!(fields.last(), Some(&RegisterField::Password));
        assert_eq!(fields.len(), 11);
    }
}
