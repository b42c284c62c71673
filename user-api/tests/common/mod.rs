#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;
use user_api::domain::auth::service::AuthService;
use user_api::domain::pagination::PaginationPolicy;
use user_api::domain::user::models::EmailAddress;
use user_api::domain::user::models::Name;
use user_api::domain::user::models::NewUser;
use user_api::domain::user::models::User;
use user_api::domain::user::models::UserId;
use user_api::domain::user::models::Username;
use user_api::domain::user::ports::UserRepository;
use user_api::domain::user::service::UserService;
use user_api::inbound::http::router::create_router;
use user_api::outbound::repositories::InMemoryUserRepository;
use user_api::user::errors::UserError;

pub const JSON_API: &str = "application/vnd.api+json";
pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let repository = Arc::new(InMemoryUserRepository::new());
        let (address, port) = serve(Arc::clone(&repository)).await;

        Self {
            address,
            port,
            repository,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET, Duration::hours(1)),
        }
    }

    /// Token for `user_id`, signed with the server's secret.
    pub fn token_for(&self, user_id: i64) -> String {
        self.jwt_handler
            .issue(user_id)
            .expect("Failed to issue test token")
            .token
    }

    pub fn token(&self) -> String {
        self.token_for(1)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// GET with a JSON:API Accept header
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .get(self.url(path))
            .header(reqwest::header::ACCEPT, JSON_API)
    }

    /// GET with JSON:API headers and a Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// POST with JSON:API Accept and Content-Type headers
    pub fn post(&self, path: &str, body: &Value) -> reqwest::RequestBuilder {
        self.api_client
            .post(self.url(path))
            .header(reqwest::header::ACCEPT, JSON_API)
            .header(reqwest::header::CONTENT_TYPE, JSON_API)
            .body(body.to_string())
    }

    /// PUT with JSON:API headers and a Bearer token
    pub fn put_authenticated(&self, path: &str, body: &Value, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(self.url(path))
            .header(reqwest::header::ACCEPT, JSON_API)
            .header(reqwest::header::CONTENT_TYPE, JSON_API)
            .bearer_auth(token)
            .body(body.to_string())
    }

    /// Plain request without any negotiation headers
    pub fn raw(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.api_client.request(method, self.url(path))
    }

    /// POST /api/auth/login
    pub fn login(&self, email: &str, password: &str) -> reqwest::RequestBuilder {
        self.api_client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
    }

    /// Register a user through the API and return its id.
    pub async fn create_user(&self, attributes: Value) -> String {
        let response = self
            .post("/api/v1/users", &user_document(attributes))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"]
            .as_str()
            .expect("id should be a string")
            .to_string()
    }

    /// Insert `count` users straight into the store, skipping password hashing.
    pub async fn seed_users(&self, count: u32) {
        for n in 1..=count {
            self.repository
                .create(NewUser {
                    name: Name::new(format!("User {n}")).unwrap(),
                    username: Username::new(format!("user{n}")).unwrap(),
                    email: EmailAddress::new(format!("user{n}@example.com")).unwrap(),
                    password_hash: "$argon2id$seeded".to_string(),
                })
                .await
                .expect("Failed to seed user");
        }
    }

    pub async fn user_count(&self) -> u64 {
        self.repository.count_all().await.expect("Failed to count users")
    }
}

async fn serve<UR: UserRepository>(repository: Arc<UR>) -> (String, u16) {
    // Use random port (0 = OS assigns)
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let authenticator = Arc::new(Authenticator::new(JWT_SECRET, Duration::hours(1)));
    let user_service = Arc::new(UserService::new(Arc::clone(&repository)));
    let auth_service = Arc::new(AuthService::new(repository, authenticator));

    let router = create_router(user_service, auth_service, PaginationPolicy::default());

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server error");
    });

    (address, port)
}

/// Spawn the application over a store whose every call fails.
pub async fn spawn_with_broken_store() -> TestApp {
    let (address, port) = serve(Arc::new(BrokenUserRepository)).await;

    TestApp {
        address,
        port,
        repository: Arc::new(InMemoryUserRepository::new()),
        api_client: reqwest::Client::new(),
        jwt_handler: JwtHandler::new(JWT_SECRET, Duration::hours(1)),
    }
}

/// Wrap attributes in a JSON:API resource document.
pub fn user_document(attributes: Value) -> Value {
    json!({
        "data": {
            "type": "user",
            "attributes": attributes
        }
    })
}

pub fn valid_attributes(email: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "username": "ada",
        "email": email,
        "password": "abc123",
        "password_confirmation": "abc123"
    })
}

struct BrokenUserRepository;

fn unavailable() -> UserError {
    UserError::DatabaseError("connection refused".to_string())
}

#[async_trait]
impl UserRepository for BrokenUserRepository {
    async fn create(&self, _user: NewUser) -> Result<User, UserError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserError> {
        Err(unavailable())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, UserError> {
        Err(unavailable())
    }

    async fn list(&self, _offset: u64, _limit: u32) -> Result<Vec<User>, UserError> {
        Err(unavailable())
    }

    async fn count_all(&self) -> Result<u64, UserError> {
        Err(unavailable())
    }

    async fn update(&self, _user: User) -> Result<User, UserError> {
        Err(unavailable())
    }
}
