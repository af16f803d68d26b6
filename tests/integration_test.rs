// Integration tests for reqres-admin
// The API services run against a local stub server; nothing leaves the machine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use reqres_admin::api::auth::{AuthApi, AuthResult, AuthService, AuthStorage};
use reqres_admin::api::users::{UserApi, UserService};
use reqres_admin::app::tasks::{FALLBACK_DISPLAY_NAME, Services, Task, TaskOutcome, execute};
use reqres_admin::api::{API_KEY_HEADER, ApiConfig, HttpClient};
use reqres_admin::error::NetworkError;
use reqres_admin::rules::user::UserForm;
use reqres_admin::store::{FileStore, KeyValueStore, NullStore, SharedStore};

#[derive(Clone, Debug)]
struct Recorded {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

type Log = Arc<Mutex<Vec<Recorded>>>;

/// Serve the canned `(status, body)` responses in order, one per connection.
async fn stub_server(responses: Vec<(u16, &'static str)>) -> (String, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let seen = log.clone();
    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut sock, _)) = listener.accept().await else { return };
            let req = read_request(&mut sock).await;
            seen.lock().unwrap().push(req);
            let reply = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                reason(status),
                body.len()
            );
            let _ = sock.write_all(reply.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });
    (format!("http://{addr}/api"), log)
}

async fn read_request(sock: &mut tokio::net::TcpStream) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = sock.read(&mut chunk).await.expect("read");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        if n == 0 {
            break buf.len();
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let path = request_line.next().unwrap_or("").to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let len: usize = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < head_end + len {
        let n = sock.read(&mut chunk).await.expect("read body");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();
    Recorded { method, path, headers, body }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Whatever",
    }
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(ApiConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".into(),
        timeout: Duration::from_secs(5),
    })
}

fn temp_store(tag: &str) -> (SharedStore, std::path::PathBuf) {
    let mut path = std::env::temp_dir();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    path.push(format!("reqres_admin_{tag}_{}_{nonce}.json", std::process::id()));
    let store = FileStore::open(&path).expect("open store");
    (Arc::new(store), path)
}

// 1) Login sends the submitted credentials and the API key, then keeps the token
#[tokio::test]
async fn login_stores_token_and_sends_submitted_credentials() {
    let (base, log) = stub_server(vec![(200, r#"{"token":"QpwL5tke4Pnpja7X4"}"#)]).await;
    let (store, path) = temp_store("login");
    let auth = AuthService::new(client(&base), AuthStorage::new(store.clone()));

    let result = auth.login("eve.holt@reqres.in", "StrongPass1!").await;
    assert_eq!(result, AuthResult::Success { token: Some("QpwL5tke4Pnpja7X4".into()) });
    assert_eq!(store.get("auth.token").as_deref(), Some("QpwL5tke4Pnpja7X4"));
    assert_eq!(store.get("auth.email").as_deref(), Some("eve.holt@reqres.in"));

    let req = log.lock().unwrap()[0].clone();
    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/api/login");
    assert_eq!(req.header(API_KEY_HEADER), Some("test-key"));
    let sent: serde_json::Value = serde_json::from_str(&req.body).expect("json body");
    assert_eq!(sent["email"], "eve.holt@reqres.in");
    assert_eq!(sent["password"], "StrongPass1!");

    // session survives a fresh store over the same file
    let reopened = AuthService::new(
        client(&base),
        AuthStorage::new(Arc::new(FileStore::open(&path).expect("reopen"))),
    );
    let session = reopened.restore_session().expect("session");
    assert_eq!(session.email, "eve.holt@reqres.in");
    assert_eq!(session.username, "Dear User");
    let _ = std::fs::remove_file(&path);
}

// 2) Server error text wins over the status line
#[tokio::test]
async fn register_failure_uses_server_error_field() {
    let (base, _log) = stub_server(vec![(400, r#"{"error":"Missing password"}"#)]).await;
    let auth = AuthService::new(client(&base), AuthStorage::new(Arc::new(NullStore)));
    let result = auth.register("eve.holt@reqres.in", "StrongPass1!", "eve").await;
    assert_eq!(result.error(), Some("Missing password"));
    assert!(auth.restore_session().is_none());
}

// 3) Without an error field the status line is used
#[tokio::test]
async fn error_without_message_reports_status_line() {
    let (base, _log) = stub_server(vec![(400, "")]).await;
    let users = UserService::new(client(&base));
    let err = users.get_users(1).await.unwrap_err();
    assert_eq!(err, NetworkError::Status { status: 400, message: "400 Bad Request".into() });
}

// 4) A 2xx login without a token is rejected
#[tokio::test]
async fn login_without_token_is_invalid_response() {
    let (base, _log) = stub_server(vec![(200, "{}")]).await;
    let auth = AuthService::new(client(&base), AuthStorage::new(Arc::new(NullStore)));
    let result = auth.login("eve.holt@reqres.in", "StrongPass1!").await;
    assert_eq!(result.error(), Some("Invalid login response"));
}

// 5) Pages decode with their paging metadata
#[tokio::test]
async fn get_users_decodes_page() {
    let body = r#"{"page":2,"per_page":6,"total":12,"total_pages":2,"data":[
        {"id":7,"email":"michael.lawson@reqres.in","first_name":"Michael","last_name":"Lawson","avatar":"https://reqres.in/img/faces/7-image.jpg"}
    ],"support":{"url":"https://reqres.in"}}"#;
    let (base, log) = stub_server(vec![(200, body)]).await;
    let page = UserService::new(client(&base)).get_users(2).await.expect("page");
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].full_name(), "Michael Lawson");
    assert_eq!(log.lock().unwrap()[0].path, "/api/users?page=2");
}

// 6) Create, update and delete with the demo API's loose responses
#[tokio::test]
async fn user_mutations_tolerate_loose_responses() {
    let (base, log) = stub_server(vec![
        (201, r#"{"id":"321","createdAt":"2024-01-01T00:00:00.000Z"}"#),
        (200, r#"{"updatedAt":"2024-01-01T00:00:00.000Z"}"#),
        (204, ""),
    ])
    .await;
    let users = UserService::new(client(&base));
    let form = UserForm {
        first_name: "Ana".into(),
        last_name: "Lee".into(),
        email: "ana@lee.io".into(),
        avatar: String::new(),
    };

    let created = users.create_user(form.clone()).await.expect("create");
    assert_eq!(created.id, 321);
    assert_eq!(created.email, "ana@lee.io");

    let renamed = UserForm { first_name: "Anna".into(), ..form };
    let updated = users.update_user(321, renamed).await.expect("update");
    assert_eq!(updated.id, 321);
    assert_eq!(updated.first_name, "Anna");

    users.delete_user(321).await.expect("delete");

    let seen = log.lock().unwrap().clone();
    let calls: Vec<(&str, &str)> = seen.iter().map(|r| (r.method.as_str(), r.path.as_str())).collect();
    assert_eq!(
        calls,
        vec![("POST", "/api/users"), ("PATCH", "/api/users/321"), ("DELETE", "/api/users/321")]
    );
}

// 7) Logout clears the session even when the call fails
#[tokio::test]
async fn logout_clears_session_on_failure() {
    let (base, _log) = stub_server(vec![(404, r#"{"error":"gone"}"#)]).await;
    let (store, path) = temp_store("logout");
    let storage = AuthStorage::new(store.clone());
    storage.set_token("t");
    storage.set_email("eve.holt@reqres.in");
    storage.set_username("eve");
    let auth = AuthService::new(client(&base), storage);

    let result = auth.logout().await;
    assert_eq!(result.error(), Some("gone"));
    assert!(store.get("auth.token").is_none());
    assert!(store.get("auth.username").is_none());
    assert!(auth.restore_session().is_none());
    let _ = std::fs::remove_file(&path);
}

// 8) A silent server trips the request timeout
#[tokio::test]
async fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        if let Ok((sock, _)) = listener.accept().await {
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(sock);
        }
    });
    let http = HttpClient::new(ApiConfig {
        base_url: format!("http://{addr}/api"),
        api_key: "k".into(),
        timeout: Duration::from_millis(200),
    });
    let err = UserService::new(http).get_users(1).await.unwrap_err();
    assert_eq!(err, NetworkError::Timeout);
    assert_eq!(err.to_string(), "Request timed out");
}

// 9) Nothing listening is a transport failure carrying the client's error text
#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = UserService::new(client(&format!("http://{addr}/api")))
        .delete_user(1)
        .await
        .unwrap_err();
    match err {
        NetworkError::Transport(msg) => assert_ne!(msg, "Failed to delete user"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

// 10) A login task without a stored name greets "User", not the restore default
#[tokio::test]
async fn login_task_uses_plain_fallback_name() {
    let (base, _log) = stub_server(vec![(200, r#"{"token":"QpwL5tke4Pnpja7X4"}"#)]).await;
    let (store, path) = temp_store("login_task");
    let auth = Arc::new(AuthService::new(client(&base), AuthStorage::new(store)));
    let services = Services { auth: auth.clone(), users: Arc::new(UserService::new(client(&base))) };

    let outcome = execute(
        &services,
        Task::Login { email: "eve.holt@reqres.in".into(), password: "StrongPass1!".into() },
    )
    .await;
    match outcome {
        TaskOutcome::Login { email, username, result } => {
            assert!(result.is_success());
            assert_eq!(email, "eve.holt@reqres.in");
            assert_eq!(username, FALLBACK_DISPLAY_NAME);
            assert_eq!(username, "User");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    // the restored session still carries its own default
    assert_eq!(auth.restore_session().expect("session").username, "Dear User");
    let _ = std::fs::remove_file(&path);
}

// 11) A stored username from registration is used for the login greeting
#[tokio::test]
async fn login_task_prefers_stored_username() {
    let (base, _log) = stub_server(vec![(200, r#"{"token":"QpwL5tke4Pnpja7X4"}"#)]).await;
    let (store, path) = temp_store("login_named");
    store.set("auth.username", "eve");
    let auth = Arc::new(AuthService::new(client(&base), AuthStorage::new(store)));
    let services = Services { auth, users: Arc::new(UserService::new(client(&base))) };

    let outcome = execute(
        &services,
        Task::Login { email: "eve.holt@reqres.in".into(), password: "StrongPass1!".into() },
    )
    .await;
    assert!(matches!(outcome, TaskOutcome::Login { ref username, .. } if username == "eve"));
    let _ = std::fs::remove_file(&path);
}
