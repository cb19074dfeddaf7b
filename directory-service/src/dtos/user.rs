use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Page, Role, User, UserQuery};

/// Account as returned to callers; the password digest is never serialized.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    #[schema(example = "admin@example.com")]
    pub username: String,
    pub role: Role,
    #[schema(example = "System Admin")]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            name: u.name,
            description: u.description,
        }
    }
}

/// Body for account creation and update. On update an omitted or blank
/// secret keeps the stored digest.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "carol")]
    pub username: String,

    /// Raw secret. The field name is historical; the value is hashed before
    /// it ever reaches the store.
    #[serde(default)]
    #[schema(example = "s3cret-pass")]
    pub password_hash: Option<String>,

    pub role: Role,

    #[schema(example = "Carol")]
    pub name: Option<String>,

    pub description: Option<String>,
}

/// Query string for the paginated directory listing.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedUsersRequest {
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: i64,

    #[serde(default = "default_page_size")]
    #[param(example = 10)]
    pub page_size: i64,

    #[param(example = "bob")]
    pub search_term: Option<String>,

    #[param(example = "username")]
    pub sort_by: Option<String>,

    #[param(example = "asc")]
    pub sort_direction: Option<String>,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

impl PaginatedUsersRequest {
    /// Normalize into a store query: clamp paging values, resolve the sort
    /// whitelist, drop a blank search term.
    pub fn into_query(self) -> UserQuery {
        UserQuery::from_parts(
            self.page,
            self.page_size,
            self.search_term.as_deref(),
            self.sort_by.as_deref(),
            self.sort_direction.as_deref(),
        )
    }
}

/// Paged response envelope; all metadata is derived from count, page, and
/// page size.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedUsersResponse {
    pub data: Vec<UserResponse>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl From<Page<User>> for PagedUsersResponse {
    fn from(page: Page<User>) -> Self {
        Self {
            total_count: page.total_count,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages(),
            has_next_page: page.has_next_page(),
            has_previous_page: page.has_previous_page(),
            data: page.data.into_iter().map(UserResponse::from).collect(),
        }
    }
}
