//! Domain service for the article feed and its mutations.

use crate::api::types::{ArticleDto, ProfileDto};
use crate::db::{ArticleChanges, ArticleFilter, NewArticle};
use crate::domain::UserId;
use crate::services::social::DecoratedArticle;
use thiserror::Error;

/// Domain errors for article operations.
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("Article not found: {0}")]
    NotFound(String),

    #[error("Article slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("User {0} is not the author of: {1}")]
    NotAuthor(UserId, String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ArticleError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for articles, favorites and the tag vocabulary.
///
/// Handlers never touch the store directly; everything flows through this
/// seam so the feed logic stays mockable and in one place.
#[async_trait::async_trait]
pub trait ArticleService: Send + Sync {
    /// Lists articles matching `filter`, newest first, decorated for
    /// `viewer`, together with the total match count. The count always
    /// equals what the filter selects, independent of hydration.
    async fn list_articles(
        &self,
        filter: ArticleFilter,
        viewer: Option<UserId>,
    ) -> Result<(Vec<ArticleDto>, u64), ArticleError>;

    /// Single-article lookup by slug.
    ///
    /// # Errors
    ///
    /// Returns [`ArticleError::NotFound`] for an unknown slug.
    async fn get_article(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> Result<ArticleDto, ArticleError>;

    /// Creates an article for `author`, deriving the slug from the title
    /// and upserting tags by label.
    async fn create_article(
        &self,
        author: UserId,
        draft: NewArticle,
    ) -> Result<ArticleDto, ArticleError>;

    /// Merges the provided fields; only the author may update.
    async fn update_article(
        &self,
        slug: &str,
        author: UserId,
        changes: ArticleChanges,
    ) -> Result<ArticleDto, ArticleError>;

    /// Deletes the article; only the author may delete.
    async fn delete_article(&self, slug: &str, author: UserId) -> Result<(), ArticleError>;

    /// Idempotent favorite toggle-on; returns the decorated article.
    async fn favorite_article(
        &self,
        slug: &str,
        user: UserId,
    ) -> Result<ArticleDto, ArticleError>;

    /// Idempotent favorite toggle-off; returns the decorated article.
    async fn unfavorite_article(
        &self,
        slug: &str,
        user: UserId,
    ) -> Result<ArticleDto, ArticleError>;

    /// All known tag labels.
    async fn list_tags(&self) -> Result<Vec<String>, ArticleError>;
}

/// Maps a decorated article onto the public view. Foreign keys and the
/// author's credentials stop here.
#[must_use]
pub fn decorated_to_dto(decorated: DecoratedArticle) -> ArticleDto {
    let DecoratedArticle {
        record,
        favorited,
        following,
    } = decorated;

    ArticleDto {
        slug: record.article.slug,
        title: record.article.title,
        description: record.article.description,
        body: record.article.body,
        tag_list: record.tag_list,
        created_at: record.article.created_at,
        updated_at: record.article.updated_at,
        favorited,
        favorites_count: record.favorites_count,
        author: ProfileDto {
            username: record.author.username,
            bio: record.author.bio,
            image: record.author.image,
            following,
        },
    }
}
