//! Test helper module for directory-service integration tests.
//!
//! Spins up the full router against a fresh in-memory SQLite store so tests
//! exercise the real middleware, handlers, and query paths.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use directory_service::{
    build_router,
    config::{
        BootstrapConfig, DatabaseConfig, DirectoryConfig, Environment, JwtConfig, SecurityConfig,
        SwaggerConfig, SwaggerMode,
    },
    models::{NewUser, Role, User},
    services::{AuthService, Database, JwtService},
    utils::{hash_password, Password},
    AppState,
};
use sqlx::sqlite::SqlitePoolOptions;
use tower::util::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-signing-key-0123456789";

pub fn test_config() -> DirectoryConfig {
    DirectoryConfig {
        common: service_core::config::Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "directory-service".to_string(),
        service_version: "test".to_string(),
        log_level: "error".to_string(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
        bootstrap: BootstrapConfig {
            admin_username: "admin@example.com".to_string(),
            admin_password: "admin123".to_string(),
        },
    }
}

/// Test application around a fresh in-memory database.
pub struct TestApp {
    pub state: AppState,
    app: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // A single connection with no recycling keeps the in-memory
        // database alive for the whole test.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        let db = Database::new(pool);
        db.migrate().await.expect("Failed to create schema");

        let config = test_config();
        let jwt = JwtService::new(&config.jwt).expect("Failed to create JWT service");
        let auth_service = AuthService::new(db.clone(), jwt.clone());

        let state = AppState {
            config,
            db,
            jwt,
            auth_service,
        };
        let app = build_router(state.clone())
            .await
            .expect("Failed to build router");

        Self { state, app }
    }

    /// Insert an account directly through the store.
    pub async fn seed_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        name: Option<&str>,
        description: Option<&str>,
    ) -> User {
        let password_hash =
            hash_password(&Password::new(password.to_string())).expect("Failed to hash password");

        self.state
            .db
            .insert_user(&NewUser {
                username: username.to_string(),
                password_hash: password_hash.into_string(),
                role,
                name: name.map(str::to_string),
                description: description.map(str::to_string),
            })
            .await
            .expect("Failed to seed user")
    }

    /// Send a request through the real router and return status plus parsed
    /// JSON body (Null when the body is empty or not JSON).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        (status, json)
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
        self.request(
            Method::POST,
            "/user/login",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        )
        .await
    }

    /// Login and return the session token, asserting success.
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"]
            .as_str()
            .expect("token missing from login response")
            .to_string()
    }
}
