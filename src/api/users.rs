//! CRUD over `/users`.
//!
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::HttpClient;
use crate::error::NetworkError;
use crate::rules::user::UserForm;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub avatar: String,
}

impl User {
    pub fn from_form(id: u64, form: UserForm) -> Self {
        Self {
            id,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
            avatar: form.avatar,
        }
    }

    /// The editable fields, used to seed the edit form.
    pub fn to_form(&self) -> UserForm {
        UserForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of `GET /users`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UsersPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default)]
    pub data: Vec<User>,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    #[serde(default)]
    id: Option<Value>,
}

#[async_trait]
pub trait UserApi: Send + Sync {
    async fn get_users(&self, page: u32) -> Result<UsersPage, NetworkError>;
    async fn create_user(&self, user: UserForm) -> Result<User, NetworkError>;
    async fn update_user(&self, id: u64, updates: UserForm) -> Result<User, NetworkError>;
    async fn delete_user(&self, id: u64) -> Result<(), NetworkError>;
}

pub struct UserService {
    client: HttpClient,
}

impl UserService {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

/// The demo API echoes ids as strings or numbers, or not at all.
fn parse_id(id: Option<&Value>) -> Option<u64> {
    match id? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|id| *id != 0)
}

fn timestamp_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
}

fn to_body(user: &UserForm) -> Result<Value, NetworkError> {
    serde_json::to_value(user).map_err(|e| NetworkError::Transport(e.to_string()))
}

#[async_trait]
impl UserApi for UserService {
    async fn get_users(&self, page: u32) -> Result<UsersPage, NetworkError> {
        self.client
            .get(&format!("/users?page={page}"), "Failed to fetch users")
            .await
    }

    async fn create_user(&self, user: UserForm) -> Result<User, NetworkError> {
        let body = to_body(&user)?;
        let created: CreatedResponse = self
            .client
            .post("/users", Some(&body), "Failed to create user")
            .await?;
        let id = parse_id(created.id.as_ref()).unwrap_or_else(timestamp_id);
        tracing::info!(id, "user created");
        Ok(User::from_form(id, user))
    }

    async fn update_user(&self, id: u64, updates: UserForm) -> Result<User, NetworkError> {
        let body = to_body(&updates)?;
        let _: Value = self
            .client
            .patch(&format!("/users/{id}"), &body, "Failed to update user")
            .await?;
        tracing::info!(id, "user updated");
        Ok(User::from_form(id, updates))
    }

    async fn delete_user(&self, id: u64) -> Result<(), NetworkError> {
        self.client
            .delete(&format!("/users/{id}"), "Failed to delete user")
            .await?;
        tracing::info!(id, "user deleted");
        Ok(())
    }
}
