//! Viewer-relative decoration of article batches.
//!
//! `favorited` and `following` are computed per request against the two
//! ledgers; they are never stored on the article or user rows.

use anyhow::Result;

use crate::db::{ArticleRecord, Store};
use crate::domain::UserId;

/// An article annotated with the viewer-relative flags.
#[derive(Debug, Clone)]
pub struct DecoratedArticle {
    pub record: ArticleRecord,
    pub favorited: bool,
    pub following: bool,
}

/// Resolves viewer-relative flags for batches of articles.
#[derive(Clone)]
pub struct SocialGraphResolver {
    store: Store,
}

impl SocialGraphResolver {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Annotates each article with `favorited` (viewer has favorited it)
    /// and `following` (viewer follows its author).
    ///
    /// An anonymous viewer short-circuits to all-false without touching the
    /// ledgers. The batch queries are equivalent to asking the ledgers
    /// per article; results are identical to the per-article definition.
    pub async fn decorate(
        &self,
        records: Vec<ArticleRecord>,
        viewer: Option<UserId>,
    ) -> Result<Vec<DecoratedArticle>> {
        let Some(viewer) = viewer else {
            return Ok(records
                .into_iter()
                .map(|record| DecoratedArticle {
                    record,
                    favorited: false,
                    following: false,
                })
                .collect());
        };

        let article_ids: Vec<i32> = records.iter().map(|r| r.article.id).collect();
        let author_ids: Vec<i32> = records.iter().map(|r| r.author.id).collect();

        let favorited = self.store.favorited_set(viewer.value(), &article_ids).await?;
        let following = self.store.following_set(viewer.value(), &author_ids).await?;

        Ok(records
            .into_iter()
            .map(|record| {
                let article_favorited = favorited.contains(&record.article.id);
                let author_followed = following.contains(&record.author.id);
                DecoratedArticle {
                    record,
                    favorited: article_favorited,
                    following: author_followed,
                }
            })
            .collect())
    }

    pub async fn decorate_one(
        &self,
        record: ArticleRecord,
        viewer: Option<UserId>,
    ) -> Result<DecoratedArticle> {
        let mut decorated = self.decorate(vec![record], viewer).await?;
        decorated
            .pop()
            .ok_or_else(|| anyhow::anyhow!("decoration dropped the article"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewArticle, Store};

    async fn seeded() -> (Store, SocialGraphResolver, UserId, UserId) {
        let store = Store::new("sqlite::memory:").await.expect("store");
        let resolver = SocialGraphResolver::new(store.clone());

        let author = store
            .create_user("mario", "mario@super.io", "hash")
            .await
            .expect("author");
        let reader = store
            .create_user("luigi", "luigi@super.io", "hash")
            .await
            .expect("reader");

        store
            .create_article(
                author.id,
                &NewArticle {
                    title: "Warp Pipes Explained".to_string(),
                    description: "plumbing".to_string(),
                    body: "green".to_string(),
                    tag_list: vec!["pipes".to_string()],
                },
            )
            .await
            .expect("article");

        (
            store,
            resolver,
            UserId::new(author.id),
            UserId::new(reader.id),
        )
    }

    #[tokio::test]
    async fn anonymous_viewer_gets_all_false() {
        let (store, resolver, _, _) = seeded().await;

        let (records, _) = store.list_articles(&Default::default()).await.unwrap();
        let decorated = resolver.decorate(records, None).await.unwrap();

        assert!(!decorated.is_empty());
        assert!(decorated.iter().all(|d| !d.favorited && !d.following));
    }

    #[tokio::test]
    async fn flags_reflect_ledgers() {
        let (store, resolver, author, reader) = seeded().await;

        let (records, _) = store.list_articles(&Default::default()).await.unwrap();
        let article_id = records[0].article.id;

        store.favorite(article_id, reader.value()).await.unwrap();
        store.follow(reader.value(), author.value()).await.unwrap();

        let decorated = resolver
            .decorate_one(records.into_iter().next().unwrap(), Some(reader))
            .await
            .unwrap();

        assert!(decorated.favorited);
        assert!(decorated.following);

        // The author's own view of the same article: not favorited, and
        // follow state is whatever the (author -> author) edge says.
        let (records, _) = store.list_articles(&Default::default()).await.unwrap();
        let own = resolver
            .decorate_one(records.into_iter().next().unwrap(), Some(author))
            .await
            .unwrap();

        assert!(!own.favorited);
        assert!(!own.following);
    }
}
