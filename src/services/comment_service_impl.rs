//! `SeaORM` implementation of the [`CommentService`] trait.

use crate::api::types::{CommentDto, ProfileDto};
use crate::db::Store;
use crate::domain::UserId;
use crate::entities::{articles, comments, users};
use crate::services::comment_service::{CommentError, CommentService};

pub struct SeaOrmCommentService {
    store: Store,
}

impl SeaOrmCommentService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn db_err(err: anyhow::Error) -> CommentError {
        CommentError::Database(err.to_string())
    }

    async fn load_article(&self, slug: &str) -> Result<articles::Model, CommentError> {
        self.store
            .find_article_model_by_slug(slug)
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| CommentError::ArticleNotFound(slug.to_string()))
    }

    fn to_dto(comment: comments::Model, author: users::Model, following: bool) -> CommentDto {
        CommentDto {
            id: comment.id,
            created_at: comment.created_at,
            body: comment.body,
            author: ProfileDto {
                username: author.username,
                bio: author.bio,
                image: author.image,
                following,
            },
        }
    }
}

#[async_trait::async_trait]
impl CommentService for SeaOrmCommentService {
    async fn add_comment(
        &self,
        slug: &str,
        author: UserId,
        body: &str,
    ) -> Result<CommentDto, CommentError> {
        let article = self.load_article(slug).await?;

        let comment = self
            .store
            .add_comment(article.id, author.value(), body)
            .await
            .map_err(Self::db_err)?;

        let author_row = self
            .store
            .find_user_by_id(author.value())
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| CommentError::Database(format!("user {author} missing")))?;

        let following = self
            .store
            .is_following(author.value(), author_row.id)
            .await
            .map_err(Self::db_err)?;

        Ok(Self::to_dto(comment, author_row, following))
    }

    async fn list_comments(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> Result<Vec<CommentDto>, CommentError> {
        let article = self.load_article(slug).await?;

        let rows = self
            .store
            .list_comments_for_article(article.id)
            .await
            .map_err(Self::db_err)?;

        let following = match viewer {
            Some(viewer) => {
                let author_ids: Vec<i32> = rows.iter().map(|(_, author)| author.id).collect();
                self.store
                    .following_set(viewer.value(), &author_ids)
                    .await
                    .map_err(Self::db_err)?
            }
            None => std::collections::HashSet::new(),
        };

        Ok(rows
            .into_iter()
            .map(|(comment, author)| {
                let follows_author = following.contains(&author.id);
                Self::to_dto(comment, author, follows_author)
            })
            .collect())
    }

    async fn delete_comment(
        &self,
        slug: &str,
        comment_id: i32,
        viewer: UserId,
    ) -> Result<(), CommentError> {
        let article = self.load_article(slug).await?;

        let comment = self
            .store
            .find_comment(comment_id)
            .await
            .map_err(Self::db_err)?
            .filter(|c| c.article_id == article.id)
            .ok_or(CommentError::NotFound(comment_id))?;

        if comment.author_id != viewer.value() {
            return Err(CommentError::NotAuthor(viewer, comment_id));
        }

        self.store
            .delete_comment(comment_id)
            .await
            .map_err(Self::db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewArticle;

    async fn seeded() -> (SeaOrmCommentService, Store, UserId, UserId) {
        let store = Store::new("sqlite::memory:").await.expect("store");

        let author = store
            .create_user("mario", "mario@super.io", "hash")
            .await
            .unwrap();
        let reader = store
            .create_user("luigi", "luigi@super.io", "hash")
            .await
            .unwrap();

        store
            .create_article(
                author.id,
                &NewArticle {
                    title: "Castle Architecture".to_string(),
                    description: "towers".to_string(),
                    body: "moats".to_string(),
                    tag_list: vec![],
                },
            )
            .await
            .unwrap();

        (
            SeaOrmCommentService::new(store.clone()),
            store,
            UserId::new(author.id),
            UserId::new(reader.id),
        )
    }

    #[tokio::test]
    async fn comments_list_in_creation_order() {
        let (service, _store, author, reader) = seeded().await;

        service
            .add_comment("castle-architecture", reader, "first!")
            .await
            .unwrap();
        service
            .add_comment("castle-architecture", author, "thanks for reading")
            .await
            .unwrap();

        let comments = service
            .list_comments("castle-architecture", None)
            .await
            .unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].body, "first!");
        assert_eq!(comments[1].author.username, "mario");
        assert!(comments.iter().all(|c| !c.author.following));
    }

    #[tokio::test]
    async fn viewer_sees_following_flag_on_comment_authors() {
        let (service, store, author, reader) = seeded().await;

        service
            .add_comment("castle-architecture", author, "welcome")
            .await
            .unwrap();

        store.follow(reader.value(), author.value()).await.unwrap();

        let comments = service
            .list_comments("castle-architecture", Some(reader))
            .await
            .unwrap();

        assert!(comments[0].author.following);
    }

    #[tokio::test]
    async fn only_comment_author_may_delete() {
        let (service, _store, author, reader) = seeded().await;

        let comment = service
            .add_comment("castle-architecture", reader, "spam")
            .await
            .unwrap();

        let denied = service
            .delete_comment("castle-architecture", comment.id, author)
            .await;
        assert!(matches!(denied, Err(CommentError::NotAuthor(_, _))));

        service
            .delete_comment("castle-architecture", comment.id, reader)
            .await
            .expect("author deletes own comment");

        let remaining = service
            .list_comments("castle-architecture", None)
            .await
            .unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn unknown_article_short_circuits() {
        let (service, _store, _author, reader) = seeded().await;

        let add = service.add_comment("no-such-slug", reader, "hello").await;
        assert!(matches!(add, Err(CommentError::ArticleNotFound(_))));

        let del = service.delete_comment("no-such-slug", 1, reader).await;
        assert!(matches!(del, Err(CommentError::ArticleNotFound(_))));
    }
}
