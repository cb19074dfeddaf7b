//! SQLite account store.
//!
//! Every caller-supplied value reaches the database through a bound
//! parameter. The sort column is resolved against the closed whitelist in
//! `models::query` before its static name is spliced into the ORDER BY
//! clause; raw request input never becomes query text.

use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::models::{NewUser, Page, User, UserQuery};
use crate::services::ServiceError;

/// SQLite database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

const SEARCH_FILTER: &str = "WHERE LOWER(username) LIKE ? \
     OR LOWER(name) LIKE ? \
     OR LOWER(role) LIKE ? \
     OR LOWER(description) LIKE ?";

/// Number of `?` placeholders in [`SEARCH_FILTER`]; the pattern is bound
/// once per placeholder.
const SEARCH_FILTER_BINDS: usize = 4;

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the schema if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                name TEXT,
                description TEXT,
                created_utc TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // ==================== Account CRUD ====================

    /// Find an account by ID. Absence is `Ok(None)`, not an error.
    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Find an account by username (case-sensitive).
    pub async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a new account and return it with its assigned identifier.
    pub async fn insert_user(&self, new_user: &NewUser) -> Result<User, ServiceError> {
        if new_user.password_hash.is_empty() {
            return Err(ServiceError::Validation(
                "Password digest must not be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role, name, description, created_utc)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(&new_user.name)
        .bind(&new_user.description)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                    return ServiceError::DuplicateUsername;
                }
            }
            ServiceError::Store(e)
        })?;

        let id = result.last_insert_rowid();
        self.find_user_by_id(id).await?.ok_or_else(|| {
            ServiceError::Internal(anyhow::anyhow!("Inserted user {} not found", id))
        })
    }

    /// Update an account in place. The username column is intentionally not
    /// part of the SET list: usernames are immutable after creation.
    pub async fn update_user(&self, user: &User) -> Result<(), ServiceError> {
        if user.password_hash.is_empty() {
            return Err(ServiceError::Validation(
                "Password digest must not be empty".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, role = ?, name = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.name)
        .bind(&user.description)
        .bind(user.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    /// Delete an account. A second delete of the same id reports `NotFound`,
    /// not success.
    pub async fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }

    /// All accounts, ordered by identifier.
    pub async fn list_users(&self) -> Result<Vec<User>, ServiceError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // ==================== Directory query engine ====================

    /// Run a normalized directory query: count the matching rows, then fetch
    /// the requested slice ordered by the whitelisted column with identifier
    /// as tie-break, so repeated calls paginate stably.
    ///
    /// Count and slice are two statements, not one transaction; under
    /// concurrent writes they may observe slightly different snapshots.
    pub async fn search_users(&self, query: &UserQuery) -> Result<Page<User>, ServiceError> {
        let where_clause = if query.search.is_some() {
            SEARCH_FILTER
        } else {
            ""
        };
        let pattern = query
            .search
            .as_ref()
            .map(|term| format!("%{}%", term.to_lowercase()));

        let count_sql = format!("SELECT COUNT(*) FROM users {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(pattern) = &pattern {
            for _ in 0..SEARCH_FILTER_BINDS {
                count_query = count_query.bind(pattern);
            }
        }
        let total_count = count_query.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT * FROM users {} ORDER BY {} {}, id ASC LIMIT ? OFFSET ?",
            where_clause,
            query.sort.as_sql(),
            query.direction.as_sql()
        );
        let mut data_query = sqlx::query_as::<_, User>(&data_sql);
        if let Some(pattern) = &pattern {
            for _ in 0..SEARCH_FILTER_BINDS {
                data_query = data_query.bind(pattern);
            }
        }
        let data = data_query
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            data,
            total_count,
            page: query.page,
            page_size: query.page_size,
        })
    }
}
