//! Credential validation and session issuance.

use crate::dtos::auth::{LoginRequest, LoginResponse};
use crate::services::{Database, JwtService, ServiceError};
use crate::utils::{verify_password, Password, PasswordHashString};

/// Validates claimed credentials against the store and turns a validated
/// account into a signed session. Read-only: no lockout counter, no attempt
/// tracking.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(db: Database, jwt: JwtService) -> Self {
        Self { db, jwt }
    }

    /// Validate a username/secret pair and issue a session token.
    ///
    /// An unknown username and a wrong secret both come back as
    /// `InvalidCredentials`; the distinction exists only in the log.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, ServiceError> {
        let user = match self.db.find_user_by_username(&req.username).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username = %req.username, "Login attempt for unknown username");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        verify_password(
            &Password::new(req.password),
            &PasswordHashString::new(user.password_hash.clone()),
        )
        .map_err(|_| {
            tracing::warn!(username = %req.username, "Login attempt with invalid password");
            ServiceError::InvalidCredentials
        })?;

        let token = self.jwt.issue(&user)?;
        tracing::info!(username = %user.username, role = %user.role, "Login successful");

        Ok(LoginResponse {
            token,
            username: user.username,
            role: user.role,
            access: user.role.access_message().to_string(),
        })
    }
}
