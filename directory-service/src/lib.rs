pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{BootstrapConfig, DirectoryConfig, Environment, SwaggerMode};
use crate::models::NewUser;
use crate::services::{AuthService, Database, JwtService};
use crate::utils::{hash_password, Password};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::login,
        handlers::user::list_users,
        handlers::user::list_users_paginated,
        handlers::user::get_me,
        handlers::user::create_user,
        handlers::user::update_user,
        handlers::user::delete_user,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::auth::LoginRequest,
            dtos::auth::LoginResponse,
            dtos::user::UserResponse,
            dtos::user::UpsertUserRequest,
            dtos::user::PagedUsersResponse,
            models::Role,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Credential validation and session issuance"),
        (name = "Directory", description = "Account listing, search, and management"),
        (name = "Observability", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: DirectoryConfig,
    pub db: Database,
    pub jwt: JwtService,
    pub auth_service: AuthService,
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Everything except login and health requires a verified session; role
    // checks happen inside the handlers against the capability table.
    let protected_routes = Router::new()
        .route(
            "/user",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route(
            "/user/paginated",
            get(handlers::user::list_users_paginated),
        )
        .route("/user/me", get(handlers::user::get_me))
        .route(
            "/user/:id",
            put(handlers::user::update_user).delete(handlers::user::delete_user),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let mut app = Router::new().route("/health", get(health_check));

    let swagger_enabled = match state.config.environment {
        Environment::Dev => true,
        Environment::Prod => state.config.swagger.enabled == SwaggerMode::Public,
    };
    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    }

    let app = app
        .route("/user/login", post(handlers::auth::login))
        .merge(protected_routes)
        .with_state(state.clone())
        // Add tracing layer
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .map(|o| {
                            o.parse::<axum::http::HeaderValue>().unwrap_or_else(|e| {
                                tracing::error!(
                                    "Invalid CORS origin '{}': {}. Using fallback.",
                                    o,
                                    e
                                );
                                axum::http::HeaderValue::from_static("*")
                            })
                        })
                        .collect::<Vec<axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ]),
        );

    Ok(app)
}

/// Seed the initial administrator account if it does not exist yet.
pub async fn ensure_bootstrap_admin(
    db: &Database,
    bootstrap: &BootstrapConfig,
) -> Result<(), AppError> {
    if let Some(existing) = db.find_user_by_username(&bootstrap.admin_username).await? {
        tracing::info!(username = %existing.username, "Admin account already exists");
        return Ok(());
    }

    let password_hash = hash_password(&Password::new(bootstrap.admin_password.clone()))?;
    let admin = db
        .insert_user(&NewUser {
            username: bootstrap.admin_username.clone(),
            password_hash: password_hash.into_string(),
            role: models::Role::Admin,
            name: Some("System Admin".to_string()),
            description: Some("Initial administrator account".to_string()),
        })
        .await?;

    tracing::info!(username = %admin.username, id = admin.id, "Admin account created");
    Ok(())
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Service is unhealthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<axum::Json<serde_json::Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        AppError::from(e)
    })?;

    Ok(axum::Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": "up"
        }
    })))
}
