//! Domain service for article comments.

use crate::api::types::CommentDto;
use crate::domain::UserId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error("Article not found: {0}")]
    ArticleNotFound(String),

    #[error("Comment not found: {0}")]
    NotFound(i32),

    #[error("User {0} is not the author of comment {1}")]
    NotAuthor(UserId, i32),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CommentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CommentService: Send + Sync {
    /// Adds a comment to the article behind `slug`. An unknown slug
    /// short-circuits before any write.
    async fn add_comment(
        &self,
        slug: &str,
        author: UserId,
        body: &str,
    ) -> Result<CommentDto, CommentError>;

    /// Lists comments in creation order, each author profile decorated
    /// with the viewer-relative `following` flag.
    async fn list_comments(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentDto>, CommentError>;

    /// Deletes a comment; only its author may do so.
    async fn delete_comment(
        &self,
        slug: &str,
        comment_id: i32,
        viewer: UserId,
    ) -> Result<(), CommentError>;
}
