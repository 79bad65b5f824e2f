//! Domain service for account registration, login and self-management.

use crate::api::types::UserDto;
use crate::db::UserChanges;
use crate::domain::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Username or email already taken")]
    Duplicate,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// New account payload; field bounds are checked at the API boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Creates an account and returns the user view with a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Duplicate`] when username or email is taken.
    async fn register(&self, new_user: NewUser) -> Result<UserDto, UserError>;

    /// Verifies credentials and returns the user view with a fresh token.
    async fn login(&self, email: &str, password: &str) -> Result<UserDto, UserError>;

    /// The authenticated user's own view, with a re-issued token.
    async fn current_user(&self, user: UserId) -> Result<UserDto, UserError>;

    /// Merges the provided fields into the account.
    async fn update_user(
        &self,
        user: UserId,
        changes: UserChanges,
    ) -> Result<UserDto, UserError>;
}
