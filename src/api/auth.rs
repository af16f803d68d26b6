//! Sign-in, sign-up and sign-out against the demo API, plus the session
//! values kept in the key-value store.
//!
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::HttpClient;
use crate::store::SharedStore;

pub const AUTH_PREFIX: &str = "auth.";
pub const DEFAULT_DISPLAY_NAME: &str = "Dear User";

const TOKEN: &str = "token";
const USERNAME: &str = "username";
const EMAIL: &str = "email";
const AUTH_KEYS: [&str; 3] = [TOKEN, USERNAME, EMAIL];

/// Session values under the `auth.` prefix.
#[derive(Clone)]
pub struct AuthStorage {
    store: SharedStore,
}

impl AuthStorage {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn key(name: &str) -> String {
        format!("{AUTH_PREFIX}{name}")
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(&Self::key(TOKEN))
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(&Self::key(TOKEN), token)
    }

    pub fn username(&self) -> Option<String> {
        self.store.get(&Self::key(USERNAME))
    }

    pub fn set_username(&self, username: &str) {
        self.store.set(&Self::key(USERNAME), username)
    }

    pub fn email(&self) -> Option<String> {
        self.store.get(&Self::key(EMAIL))
    }

    pub fn set_email(&self, email: &str) {
        self.store.set(&Self::key(EMAIL), email)
    }

    pub fn clear_all(&self) {
        for name in AUTH_KEYS {
            self.store.remove(&Self::key(name));
        }
    }
}

/// The signed-in identity shown in the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub username: String,
    pub email: String,
}

/// Outcome of an auth call; failures carry a user-facing message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthResult {
    Success { token: Option<String> },
    Failure { error: String },
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error } => Some(error),
            Self::Success { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, email: &str, password: &str, username: &str) -> AuthResult;
    async fn login(&self, email: &str, password: &str) -> AuthResult;
    async fn logout(&self) -> AuthResult;
    /// The stored session, if a token and email are both present.
    fn restore_session(&self) -> Option<AuthUser>;
    /// The stored display name, with no fallback applied.
    fn stored_username(&self) -> Option<String>;
}

pub struct AuthService {
    client: HttpClient,
    storage: AuthStorage,
}

impl AuthService {
    pub fn new(client: HttpClient, storage: AuthStorage) -> Self {
        Self { client, storage }
    }

    pub fn storage(&self) -> &AuthStorage {
        &self.storage
    }

    /// POST credentials; `Ok(None)` when the response carries no token.
    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
        fallback: &str,
    ) -> Result<Option<String>, String> {
        let body = json!({ "email": email, "password": password });
        match self.client.post::<AuthResponse>(path, Some(&body), fallback).await {
            Ok(data) => Ok(data.token.filter(|t| !t.is_empty())),
            Err(e) => {
                tracing::error!(error = %e, "{fallback}");
                Err(e.to_string())
            }
        }
    }
}

#[async_trait]
impl AuthApi for AuthService {
    async fn register(&self, email: &str, password: &str, username: &str) -> AuthResult {
        match self.post_credentials("/register", email, password, "Registration failed").await {
            Ok(Some(token)) => {
                self.storage.set_token(&token);
                self.storage.set_username(username);
                self.storage.set_email(email);
                tracing::info!(%email, "registered");
                AuthResult::Success { token: Some(token) }
            }
            Ok(None) => AuthResult::Failure { error: "Invalid registration response".into() },
            Err(error) => AuthResult::Failure { error },
        }
    }

    async fn login(&self, email: &str, password: &str) -> AuthResult {
        match self.post_credentials("/login", email, password, "Login failed").await {
            Ok(Some(token)) => {
                self.storage.set_token(&token);
                self.storage.set_email(email);
                tracing::info!(%email, "logged in");
                AuthResult::Success { token: Some(token) }
            }
            Ok(None) => AuthResult::Failure { error: "Invalid login response".into() },
            Err(error) => AuthResult::Failure { error },
        }
    }

    async fn logout(&self) -> AuthResult {
        let res = self
            .client
            .post::<serde_json::Value>("/logout", None, "Logout failed")
            .await;
        self.storage.clear_all();
        match res {
            Ok(_) => AuthResult::Success { token: None },
            Err(e) => {
                tracing::error!(error = %e, "logout request failed");
                AuthResult::Failure { error: e.to_string() }
            }
        }
    }

    fn restore_session(&self) -> Option<AuthUser> {
        self.storage.token()?;
        let email = self.storage.email()?;
        let username = self
            .storage
            .username()
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        Some(AuthUser { username, email })
    }

    fn stored_username(&self) -> Option<String> {
        self.storage.username()
    }
}
