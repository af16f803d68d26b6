use crate::validate::{FormRecord, Rule};

use super::email::{HasEmail, email_rules};
use super::password::{HasPassword, password_rules};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FormRecord for LoginForm {
    type Field = LoginField;

    fn fields() -> &'static [LoginField] {
        &[LoginField::Email, LoginField::Password]
    }

    fn label(field: LoginField) -> &'static str {
        match field {
            LoginField::Email => "Email",
            LoginField::Password => "Password",
        }
    }

    fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    fn value_mut(&mut self, field: LoginField) -> &mut String {
        match field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

impl HasEmail for LoginForm {
    const EMAIL: LoginField = LoginField::Email;

    fn email(&self) -> &str {
        &self.email
    }
}

impl HasPassword for LoginForm {
    const PASSWORD: LoginField = LoginField::Password;

    fn password(&self) -> &str {
        &self.password
    }
}

pub fn login_rules() -> Vec<Rule<LoginForm>> {
    let mut rules = email_rules::<LoginForm>();
    rules.extend(password_rules::<LoginForm>());
    rules
}
