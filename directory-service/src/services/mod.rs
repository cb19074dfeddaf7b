//! Services layer: credential validation, session tokens, the authorization
//! gate, and the account store.

mod auth;
pub mod authz;
mod database;
pub mod error;
mod jwt;

pub use auth::AuthService;
pub use authz::{authorize, Operation};
pub use database::Database;
pub use error::ServiceError;
pub use jwt::{JwtService, SessionClaims};
