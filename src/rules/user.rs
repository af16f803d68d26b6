use serde::{Deserialize, Serialize};

use crate::validate::{FormRecord, Rule};

use super::{char_len, is_valid_email};

pub const MIN_NAME_LEN: usize = 2;

/// Editable part of a user: everything except the server-assigned id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Avatar,
    FirstName,
    LastName,
    Email,
}

impl FormRecord for UserForm {
    type Field = UserField;

    fn fields() -> &'static [UserField] {
        &[UserField::Avatar, UserField::FirstName, UserField::LastName, UserField::Email]
    }

    fn label(field: UserField) -> &'static str {
        match field {
            UserField::Avatar => "Avatar",
            UserField::FirstName => "First name",
            UserField::LastName => "Last name",
            UserField::Email => "Email",
        }
    }

    fn value(&self, field: UserField) -> &str {
        match field {
            UserField::Avatar => &self.avatar,
            UserField::FirstName => &self.first_name,
            UserField::LastName => &self.last_name,
            UserField::Email => &self.email,
        }
    }

    fn value_mut(&mut self, field: UserField) -> &mut String {
        match field {
            UserField::Avatar => &mut self.avatar,
            UserField::FirstName => &mut self.first_name,
            UserField::LastName => &mut self.last_name,
            UserField::Email => &mut self.email,
        }
    }
}

/// Names are required and at least two characters once trimmed. The email
/// format check runs on the raw value, so surrounding spaces fail it.
pub fn user_rules() -> Vec<Rule<UserForm>> {
    vec![
        Rule::new(UserField::FirstName, "First name is required", |v: &UserForm| {
            v.first_name.trim().is_empty()
        }),
        Rule::new(
            UserField::FirstName,
            "First name must be at least 2 characters",
            |v: &UserForm| char_len(v.first_name.trim()) < MIN_NAME_LEN,
        ),
        Rule::new(UserField::LastName, "Last name is required", |v: &UserForm| {
            v.last_name.trim().is_empty()
        }),
        Rule::new(
            UserField::LastName,
            "Last name must be at least 2 characters",
            |v: &UserForm| char_len(v.last_name.trim()) < MIN_NAME_LEN,
        ),
        Rule::new(UserField::Email, "Email is required", |v: &UserForm| {
            v.email.trim().is_empty()
        }),
        Rule::new(UserField::Email, "Invalid email format", |v: &UserForm| {
            !is_valid_email(&v.email)
        }),
    ]
}
