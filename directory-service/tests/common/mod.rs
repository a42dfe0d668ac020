use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenManager;
use auth::TokenManagerConfig;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use directory_service::cache::UserDirectory;
use directory_service::domain::user::models::EmailAddress;
use directory_service::domain::user::models::Login;
use directory_service::domain::user::models::Role;
use directory_service::domain::user::models::User;
use directory_service::domain::user::models::UserId;
use directory_service::domain::user::service::AuthService;
use directory_service::inbound::http::router::create_router;
use directory_service::user::errors::StoreError;
use directory_service::user::ports::UserStore;
use http_body_util::BodyExt;
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-token-signing";

/// Writer collecting formatted log output so tests can assert on it.
#[derive(Clone)]
pub struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn new() -> Self {
        Self(Arc::new(std::sync::Mutex::new(Vec::new())))
    }

    /// Subscriber writing everything at DEBUG and above into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// In-memory store backing the test application.
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.login.as_str() == login).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let users = self.users.lock().await;
        let mut users = users.clone();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.login == user.login) {
            return Err(StoreError::AlreadyExists(user.login.to_string()));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::AlreadyExists(user.email.as_str().to_string()));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|u| u.id != *id);
        if users.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Test application driving the router in-process.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryUserStore>,
    pub directory: Arc<UserDirectory<InMemoryUserStore>>,
    pub token_manager: Arc<TokenManager>,
    hasher: PasswordHasher,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let store = Arc::new(InMemoryUserStore::new());

        let token_manager = Arc::new(
            TokenManager::new(TEST_SECRET, TokenManagerConfig::default())
                .expect("Failed to build token manager"),
        );

        let directory = UserDirectory::load(Arc::clone(&store), Duration::from_secs(3600))
            .await
            .expect("Failed to load user directory");

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&store),
            Arc::clone(&token_manager),
        ));

        let router = create_router(
            auth_service,
            Arc::clone(&token_manager),
            Arc::clone(&directory),
        );

        Self {
            router,
            store,
            directory,
            token_manager,
            hasher: PasswordHasher::new(),
        }
    }

    /// Insert a user directly into the store and refresh the directory
    /// snapshot so `/users/me` can see it.
    pub async fn seed_user(&self, login: &str, password: &str, role: &str) -> User {
        let user = User {
            id: UserId::new(),
            login: Login::new(login.to_string()).expect("invalid login"),
            email: EmailAddress::new(format!("{login}@example.com")).expect("invalid email"),
            role: Role::new(role.to_string()).expect("invalid role"),
            password_hash: self.hasher.hash(password).expect("Failed to hash password"),
            created_at: chrono::Utc::now(),
        };

        let user = self
            .store
            .create(user)
            .await
            .expect("Failed to seed user");
        self.directory
            .refresh()
            .await
            .expect("Failed to refresh directory");
        user
    }

    /// Log in through the API and return the minted token.
    pub async fn token_for(&self, path: &str, login: &str, password: &str) -> String {
        let (status, body) = self
            .post(path, serde_json::json!({"login": login, "password": password}), None)
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("token missing from response")
            .to_string()
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request("GET", path, None, token).await
    }

    /// GET with a verbatim `Authorization` header value.
    pub async fn get_with_auth_header(
        &self,
        path: &str,
        header: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header("Authorization", header)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        self.request("POST", path, Some(body), token).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request("DELETE", path, None, token).await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Failed to parse response body")
        };

        (status, json)
    }
}
