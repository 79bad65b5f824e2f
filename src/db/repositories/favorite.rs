use crate::entities::{favorites, prelude::*};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Set,
};
use std::collections::HashSet;

/// Existence ledger for the (article, user) favorite relation.
///
/// The unique index on (article_id, user_id) is the concurrency backstop:
/// a toggle that loses a race against an identical toggle hits the index and
/// is treated as already being in the desired state.
pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn is_favorited(&self, article_id: i32, user_id: i32) -> Result<bool> {
        let count = Favorites::find()
            .filter(favorites::Column::ArticleId.eq(article_id))
            .filter(favorites::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Idempotent toggle-on. Inserting an already-present pair is a no-op.
    pub async fn favorite(&self, article_id: i32, user_id: i32) -> Result<()> {
        let insert = Favorites::insert(favorites::ActiveModel {
            article_id: Set(article_id),
            user_id: Set(user_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([favorites::Column::ArticleId, favorites::Column::UserId])
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.conn)
        .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Idempotent toggle-off. An absent pair is a no-op, not an error.
    pub async fn unfavorite(&self, article_id: i32, user_id: i32) -> Result<()> {
        Favorites::delete_many()
            .filter(favorites::Column::ArticleId.eq(article_id))
            .filter(favorites::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn count_for_article(&self, article_id: i32) -> Result<i64> {
        let count = Favorites::find()
            .filter(favorites::Column::ArticleId.eq(article_id))
            .count(&self.conn)
            .await?;

        Ok(count as i64)
    }

    /// Subset of `article_ids` favorited by `user_id`, for batch decoration.
    pub async fn favorited_set(
        &self,
        user_id: i32,
        article_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        if article_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<i32> = Favorites::find()
            .select_only()
            .column(favorites::Column::ArticleId)
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::ArticleId.is_in(article_ids.to_vec()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Store;

    async fn store_with_article() -> (Store, i32, i32) {
        let store = Store::new("sqlite::memory:")
            .await
            .expect("in-memory store");

        let user = store
            .create_user("mario", "mario@super.io", "hash")
            .await
            .expect("user");
        let slug = store
            .create_article(
                user.id,
                &crate::db::NewArticle {
                    title: "Super Mario Facts".to_string(),
                    description: "plumbing".to_string(),
                    body: "it's a me".to_string(),
                    tag_list: vec![],
                },
            )
            .await
            .expect("article");
        let article = store
            .find_article_model_by_slug(&slug)
            .await
            .expect("lookup")
            .expect("created article present");

        (store, article.id, user.id)
    }

    #[tokio::test]
    async fn favoriting_twice_leaves_one_row() {
        let (store, article_id, user_id) = store_with_article().await;

        store.favorite(article_id, user_id).await.expect("first");
        store.favorite(article_id, user_id).await.expect("second");
        store.favorite(article_id, user_id).await.expect("third");

        assert_eq!(store.favorites_count(article_id).await.unwrap(), 1);
        assert!(store.is_favorited(article_id, user_id).await.unwrap());
    }

    #[tokio::test]
    async fn unfavoriting_absent_pair_is_noop() {
        let (store, article_id, user_id) = store_with_article().await;

        store
            .unfavorite(article_id, user_id)
            .await
            .expect("no error on absent pair");
        assert!(!store.is_favorited(article_id, user_id).await.unwrap());

        store.favorite(article_id, user_id).await.unwrap();
        store.unfavorite(article_id, user_id).await.unwrap();

        assert_eq!(store.favorites_count(article_id).await.unwrap(), 0);
        assert!(!store.is_favorited(article_id, user_id).await.unwrap());
    }
}
