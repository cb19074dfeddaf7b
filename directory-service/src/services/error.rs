use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session expired")]
    ExpiredSession,

    #[error("Invalid session signature")]
    InvalidSignature,

    #[error("Malformed session token")]
    MalformedToken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Insufficient role for this operation")]
    Forbidden,

    #[error("User not found")]
    NotFound,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidCredentials => {
                AppError::AuthError(anyhow::anyhow!("Invalid credentials"))
            }
            // The precise token failure is logged where it happens; callers
            // only ever see a generic 401.
            ServiceError::ExpiredSession
            | ServiceError::InvalidSignature
            | ServiceError::MalformedToken
            | ServiceError::Unauthenticated => {
                AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
            }
            ServiceError::Forbidden => AppError::Forbidden(anyhow::anyhow!(
                "You do not have permission to perform this action"
            )),
            ServiceError::NotFound => AppError::NotFound(anyhow::anyhow!("User not found")),
            ServiceError::DuplicateUsername => {
                AppError::BadRequest(anyhow::anyhow!("Username already exists"))
            }
            ServiceError::Validation(e) => AppError::BadRequest(anyhow::anyhow!(e)),
            ServiceError::Store(e) => AppError::DatabaseError(anyhow::anyhow!(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
        }
    }
}
