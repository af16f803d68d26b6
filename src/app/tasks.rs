//! Network work requested by the UI and the results sent back to it.
//!
//! The event loop stays synchronous: [`TaskRunner::spawn`] hands a [`Task`] to
//! the tokio runtime and the matching [`TaskOutcome`] is picked up with
//! [`TaskRunner::try_recv`] on the next tick.
//!
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::api::auth::{AuthApi, AuthResult};
use crate::api::users::{User, UserApi, UsersPage};
use crate::error::NetworkError;
use crate::rules::user::UserForm;

pub const FALLBACK_DISPLAY_NAME: &str = "User";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Task {
    Login { email: String, password: String },
    Register { username: String, email: String, password: String },
    Logout,
    LoadUsers { page: u32 },
    CreateUser(UserForm),
    UpdateUser { id: u64, form: UserForm },
    DeleteUser { id: u64 },
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::LoadUsers { .. } => "load_users",
            Self::CreateUser(_) => "create_user",
            Self::UpdateUser { .. } => "update_user",
            Self::DeleteUser { .. } => "delete_user",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Login { email: String, username: String, result: AuthResult },
    Register { username: String, email: String, result: AuthResult },
    Logout(AuthResult),
    Users { page: u32, result: Result<UsersPage, NetworkError> },
    Created(Result<User, NetworkError>),
    Updated(Result<User, NetworkError>),
    Deleted { id: u64, result: Result<(), NetworkError> },
}

/// The API seams the tasks run against.
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthApi>,
    pub users: Arc<dyn UserApi>,
}

pub async fn execute(services: &Services, task: Task) -> TaskOutcome {
    match task {
        Task::Login { email, password } => {
            let result = services.auth.login(&email, &password).await;
            let username = services
                .auth
                .stored_username()
                .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string());
            TaskOutcome::Login { email, username, result }
        }
        Task::Register { username, email, password } => {
            let result = services.auth.register(&email, &password, &username).await;
            TaskOutcome::Register { username, email, result }
        }
        Task::Logout => TaskOutcome::Logout(services.auth.logout().await),
        Task::LoadUsers { page } => TaskOutcome::Users {
            page,
            result: services.users.get_users(page).await,
        },
        Task::CreateUser(form) => TaskOutcome::Created(services.users.create_user(form).await),
        Task::UpdateUser { id, form } => {
            TaskOutcome::Updated(services.users.update_user(id, form).await)
        }
        Task::DeleteUser { id } => TaskOutcome::Deleted {
            id,
            result: services.users.delete_user(id).await,
        },
    }
}

pub struct TaskRunner {
    handle: Handle,
    services: Services,
    tx: UnboundedSender<TaskOutcome>,
    rx: UnboundedReceiver<TaskOutcome>,
}

impl TaskRunner {
    pub fn new(handle: Handle, services: Services) -> Self {
        let (tx, rx) = unbounded_channel();
        Self { handle, services, tx, rx }
    }

    pub fn spawn(&self, task: Task) {
        tracing::debug!(task = task.name(), "spawning task");
        let services = self.services.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let outcome = execute(&services, task).await;
            if tx.send(outcome).is_err() {
                tracing::debug!("ui gone; dropping task outcome");
            }
        });
    }

    pub fn try_recv(&mut self) -> Option<TaskOutcome> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::AuthUser;
    use async_trait::async_trait;

    struct FakeAuth;

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn register(&self, _email: &str, _password: &str, _username: &str) -> AuthResult {
            AuthResult::Failure { error: "Missing password".into() }
        }
        async fn login(&self, _email: &str, _password: &str) -> AuthResult {
            AuthResult::Success { token: Some("t".into()) }
        }
        async fn logout(&self) -> AuthResult {
            AuthResult::Success { token: None }
        }
        fn restore_session(&self) -> Option<AuthUser> {
            None
        }
        fn stored_username(&self) -> Option<String> {
            None
        }
    }

    struct FakeUsers;

    #[async_trait]
    impl UserApi for FakeUsers {
        async fn get_users(&self, page: u32) -> Result<UsersPage, NetworkError> {
            Ok(UsersPage { page, total_pages: 2, ..Default::default() })
        }
        async fn create_user(&self, user: UserForm) -> Result<User, NetworkError> {
            Ok(User::from_form(99, user))
        }
        async fn update_user(&self, id: u64, updates: UserForm) -> Result<User, NetworkError> {
            Ok(User::from_form(id, updates))
        }
        async fn delete_user(&self, _id: u64) -> Result<(), NetworkError> {
            Err(NetworkError::Timeout)
        }
    }

    fn services() -> Services {
        Services { auth: Arc::new(FakeAuth), users: Arc::new(FakeUsers) }
    }

    #[tokio::test]
    async fn login_without_stored_name_uses_fallback() {
        let outcome = execute(
            &services(),
            Task::Login { email: "eve.holt@reqres.in".into(), password: "x".into() },
        )
        .await;
        match outcome {
            TaskOutcome::Login { username, result, .. } => {
                assert_eq!(username, FALLBACK_DISPLAY_NAME);
                assert!(result.is_success());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_failure_is_reported_with_id() {
        let outcome = execute(&services(), Task::DeleteUser { id: 4 }).await;
        assert_eq!(
            outcome,
            TaskOutcome::Deleted { id: 4, result: Err(NetworkError::Timeout) }
        );
    }

    #[test]
    fn runner_delivers_outcomes() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut runner = TaskRunner::new(rt.handle().clone(), services());
        runner.spawn(Task::LoadUsers { page: 2 });
        let outcome = rt.block_on(async {
            loop {
                if let Some(o) = runner.try_recv() {
                    break o;
                }
                tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            }
        });
        assert!(matches!(outcome, TaskOutcome::Users { page: 2, result: Ok(_) }));
    }
}
