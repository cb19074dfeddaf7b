use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::user::{PagedUsersResponse, PaginatedUsersRequest, UpsertUserRequest, UserResponse},
    middleware::AuthUser,
    models::User,
    services::{authorize, Operation, ServiceError},
    utils::{hash_password, Password, ValidatedJson},
    AppState,
};

/// List every account
#[utoipa::path(
    get,
    path = "/user",
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Role may not list accounts", body = ErrorResponse)
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;
    authorize(&claims, Operation::ListAccounts)?;

    let users = state.db.list_users().await?;
    tracing::info!(requested_by = %claims.sub, count = users.len(), "Listed all accounts");

    Ok(Json(
        users.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
    ))
}

/// Search, sort, and paginate accounts
#[utoipa::path(
    get,
    path = "/user/paginated",
    params(PaginatedUsersRequest),
    responses(
        (status = 200, description = "One page of accounts", body = PagedUsersResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Role may not list accounts", body = ErrorResponse)
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn list_users_paginated(
    State(state): State<AppState>,
    user: AuthUser,
    Query(req): Query<PaginatedUsersRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;
    authorize(&claims, Operation::ListAccounts)?;

    let query = req.into_query();
    let page = state.db.search_users(&query).await?;
    tracing::info!(
        requested_by = %claims.sub,
        page = query.page,
        page_size = query.page_size,
        total = page.total_count,
        "Paginated account query"
    );

    Ok(Json(PagedUsersResponse::from(page)))
}

/// The caller's own profile
///
/// The target identity comes from the session claims; a caller can never
/// read another account through this route.
#[utoipa::path(
    get,
    path = "/user/me",
    responses(
        (status = 200, description = "Own profile", body = UserResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 404, description = "Session identity no longer resolves", body = ErrorResponse)
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;
    authorize(&claims, Operation::ReadOwnProfile)?;

    let user = state
        .db
        .find_user_by_username(&claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!(username = %claims.sub, "Session identity no longer resolves to an account");
            ServiceError::NotFound
        })?;

    Ok(Json(UserResponse::from(user)))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/user",
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Username taken or missing field", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Role may not create accounts", body = ErrorResponse)
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<UpsertUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;
    authorize(&claims, Operation::CreateAccount)?;

    let secret = req
        .password_hash
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::Validation("Password is required".to_string()))?;

    if state
        .db
        .find_user_by_username(&req.username)
        .await?
        .is_some()
    {
        tracing::warn!(
            admin = %claims.sub,
            username = %req.username,
            "Attempt to create account with existing username"
        );
        return Err(ServiceError::DuplicateUsername.into());
    }

    let password_hash = hash_password(&Password::new(secret.to_string()))?;
    let created = state
        .db
        .insert_user(&crate::models::NewUser {
            username: req.username,
            password_hash: password_hash.into_string(),
            role: req.role,
            name: req.name,
            description: req.description,
        })
        .await?;

    tracing::info!(
        admin = %claims.sub,
        username = %created.username,
        id = created.id,
        "Account created"
    );
    Ok((StatusCode::OK, Json(UserResponse::from(created))))
}

/// Update an account
///
/// Partial in one respect only: an omitted or blank secret keeps the stored
/// digest. The username is immutable after creation.
#[utoipa::path(
    put,
    path = "/user/{id}",
    params(("id" = i64, Path, description = "Account identifier")),
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "Account updated"),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Role may not update accounts", body = ErrorResponse),
        (status = 404, description = "No account with this identifier", body = ErrorResponse)
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpsertUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;
    authorize(&claims, Operation::UpdateAccount)?;

    let existing = state
        .db
        .find_user_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if req.username != existing.username {
        return Err(ServiceError::Validation(
            "Username cannot be changed after creation".to_string(),
        )
        .into());
    }

    let password_hash = match req
        .password_hash
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(secret) => hash_password(&Password::new(secret.to_string()))?.into_string(),
        None => existing.password_hash.clone(),
    };

    let updated = User {
        id,
        username: existing.username,
        password_hash,
        role: req.role,
        name: req.name,
        description: req.description,
        created_utc: existing.created_utc,
    };
    state.db.update_user(&updated).await?;

    tracing::info!(admin = %claims.sub, id, username = %updated.username, "Account updated");
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "User updated" })),
    ))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = i64, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Role may not delete accounts", body = ErrorResponse),
        (status = 404, description = "No account with this identifier", body = ErrorResponse)
    ),
    tag = "Directory",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let claims = user.0;
    authorize(&claims, Operation::DeleteAccount)?;

    state.db.delete_user(id).await?;

    tracing::info!(admin = %claims.sub, id, "Account deleted");
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({ "message": "User deleted" })),
    ))
}
