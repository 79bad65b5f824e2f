use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::entities::{comments, users};

pub mod migrator;
pub mod repositories;

pub use repositories::article::{
    ArticleChanges, ArticleFilter, ArticleRecord, NewArticle,
};
pub use repositories::user::{UserChanges, UserRepository};

/// True when `err` wraps a unique-constraint violation from the store.
/// Services use this to turn duplicate usernames/emails/slugs into typed
/// conflicts instead of opaque database failures.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sea_orm::DbErr>()
        .and_then(sea_orm::DbErr::sql_err)
        .is_some_and(|e| matches!(e, sea_orm::SqlErr::UniqueConstraintViolation(_)))
}

/// Facade over the per-entity repositories, sharing one connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to ":memory:" opens its own empty
        // database, so an in-memory store must run on a single connection
        // or migrations and queries stop seeing the same tables.
        let (max_connections, min_connections) = if db_url.contains(":memory:") {
            (1, 1)
        } else {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn article_repo(&self) -> repositories::article::ArticleRepository {
        repositories::article::ArticleRepository::new(self.conn.clone())
    }

    fn favorite_repo(&self) -> repositories::favorite::FavoriteRepository {
        repositories::favorite::FavoriteRepository::new(self.conn.clone())
    }

    fn follow_repo(&self) -> repositories::follow::FollowRepository {
        repositories::follow::FollowRepository::new(self.conn.clone())
    }

    fn comment_repo(&self) -> repositories::comment::CommentRepository {
        repositories::comment::CommentRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> UserRepository {
        UserRepository::new(self.conn.clone())
    }

    // ========== Articles ==========

    pub async fn list_articles(
        &self,
        filter: &ArticleFilter,
    ) -> Result<(Vec<ArticleRecord>, u64)> {
        self.article_repo().list(filter).await
    }

    pub async fn find_article_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>> {
        self.article_repo().find_by_slug(slug).await
    }

    pub async fn find_article_model_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<crate::entities::articles::Model>> {
        self.article_repo().find_model_by_slug(slug).await
    }

    pub async fn create_article(&self, author_id: i32, draft: &NewArticle) -> Result<String> {
        self.article_repo().create(author_id, draft).await
    }

    pub async fn update_article(
        &self,
        slug: &str,
        changes: &ArticleChanges,
    ) -> Result<Option<String>> {
        self.article_repo().update(slug, changes).await
    }

    pub async fn delete_article(&self, slug: &str) -> Result<bool> {
        self.article_repo().delete(slug).await
    }

    // ========== Favorite ledger ==========

    pub async fn is_favorited(&self, article_id: i32, user_id: i32) -> Result<bool> {
        self.favorite_repo().is_favorited(article_id, user_id).await
    }

    pub async fn favorite(&self, article_id: i32, user_id: i32) -> Result<()> {
        self.favorite_repo().favorite(article_id, user_id).await
    }

    pub async fn unfavorite(&self, article_id: i32, user_id: i32) -> Result<()> {
        self.favorite_repo().unfavorite(article_id, user_id).await
    }

    pub async fn favorites_count(&self, article_id: i32) -> Result<i64> {
        self.favorite_repo().count_for_article(article_id).await
    }

    pub async fn favorited_set(
        &self,
        user_id: i32,
        article_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        self.favorite_repo()
            .favorited_set(user_id, article_ids)
            .await
    }

    // ========== Follow ledger ==========

    pub async fn is_following(&self, follower_id: i32, following_id: i32) -> Result<bool> {
        self.follow_repo()
            .is_following(follower_id, following_id)
            .await
    }

    pub async fn follow(&self, follower_id: i32, following_id: i32) -> Result<()> {
        self.follow_repo().follow(follower_id, following_id).await
    }

    pub async fn unfollow(&self, follower_id: i32, following_id: i32) -> Result<()> {
        self.follow_repo().unfollow(follower_id, following_id).await
    }

    pub async fn following_set(
        &self,
        follower_id: i32,
        user_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        self.follow_repo().following_set(follower_id, user_ids).await
    }

    // ========== Comments ==========

    pub async fn add_comment(
        &self,
        article_id: i32,
        author_id: i32,
        body: &str,
    ) -> Result<comments::Model> {
        self.comment_repo().add(article_id, author_id, body).await
    }

    pub async fn list_comments_for_article(
        &self,
        article_id: i32,
    ) -> Result<Vec<(comments::Model, users::Model)>> {
        self.comment_repo().list_for_article(article_id).await
    }

    pub async fn find_comment(&self, id: i32) -> Result<Option<comments::Model>> {
        self.comment_repo().find(id).await
    }

    pub async fn delete_comment(&self, id: i32) -> Result<bool> {
        self.comment_repo().delete(id).await
    }

    // ========== Tags ==========

    pub async fn list_tag_labels(&self) -> Result<Vec<String>> {
        self.tag_repo().list_labels().await
    }

    // ========== Users ==========

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<users::Model> {
        self.user_repo().create(username, email, password_hash).await
    }

    pub async fn find_user_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().find_by_id(id).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<users::Model>> {
        self.user_repo().verify_credentials(email, password).await
    }

    pub async fn update_user(
        &self,
        id: i32,
        changes: UserChanges,
    ) -> Result<Option<users::Model>> {
        self.user_repo().update(id, changes).await
    }
}
