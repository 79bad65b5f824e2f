//! Domain service for public profiles and the follow relation.

use crate::api::types::ProfileDto;
use crate::domain::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ProfileError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait ProfileService: Send + Sync {
    /// Profile lookup by username with the viewer-relative `following`
    /// flag; `false` for anonymous viewers.
    async fn get_profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
    ) -> Result<ProfileDto, ProfileError>;

    /// Idempotent follow toggle-on; returns the updated profile view.
    async fn follow(&self, viewer: UserId, username: &str) -> Result<ProfileDto, ProfileError>;

    /// Idempotent follow toggle-off; returns the updated profile view.
    async fn unfollow(&self, viewer: UserId, username: &str) -> Result<ProfileDto, ProfileError>;
}
