//! Role/operation authorization gate.
//!
//! One canonical capability table consulted by every entry point. The gate
//! is a pure function of (claims, operation); it holds no state and is safe
//! under concurrent calls. Callers reach it only with verified claims - a
//! missing or invalid session is rejected as 401 by the auth middleware
//! before any operation is attempted.

use crate::models::Role;
use crate::services::{ServiceError, SessionClaims};

/// Operations an authenticated caller may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List, search, or paginate the whole directory.
    ListAccounts,
    /// Read the caller's own profile; the target identity comes from the
    /// claims, never from a request parameter.
    ReadOwnProfile,
    CreateAccount,
    UpdateAccount,
    DeleteAccount,
}

/// The capability table. Capabilities are listed per role, not derived from
/// a hierarchy; User and SelfOnly are identical today but stay separate rows.
pub fn is_allowed(role: Role, operation: Operation) -> bool {
    match operation {
        Operation::ListAccounts => matches!(role, Role::Admin | Role::Viewer),
        Operation::ReadOwnProfile => true,
        Operation::CreateAccount | Operation::UpdateAccount | Operation::DeleteAccount => {
            matches!(role, Role::Admin)
        }
    }
}

/// Gate an operation for the session's role.
pub fn authorize(claims: &SessionClaims, operation: Operation) -> Result<(), ServiceError> {
    if is_allowed(claims.role, operation) {
        Ok(())
    } else {
        tracing::warn!(
            username = %claims.sub,
            role = %claims.role,
            operation = ?operation,
            "Operation denied by role"
        );
        Err(ServiceError::Forbidden)
    }
}
