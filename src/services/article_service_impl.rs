//! `SeaORM` implementation of the [`ArticleService`] trait.

use crate::api::types::ArticleDto;
use crate::db::{self, ArticleChanges, ArticleFilter, NewArticle, Store};
use crate::domain::UserId;
use crate::services::article_service::{ArticleError, ArticleService, decorated_to_dto};
use crate::services::social::SocialGraphResolver;

pub struct SeaOrmArticleService {
    store: Store,
    resolver: SocialGraphResolver,
}

impl SeaOrmArticleService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        let resolver = SocialGraphResolver::new(store.clone());
        Self { store, resolver }
    }

    fn db_err(err: anyhow::Error) -> ArticleError {
        ArticleError::Database(err.to_string())
    }

    /// Loads the bare article row and checks that `author` owns it. Every
    /// mutation goes through this before touching anything, so a NotFound
    /// short-circuits ahead of any write.
    async fn load_owned(
        &self,
        slug: &str,
        author: UserId,
    ) -> Result<crate::entities::articles::Model, ArticleError> {
        let article = self
            .store
            .find_article_model_by_slug(slug)
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| ArticleError::NotFound(slug.to_string()))?;

        if article.author_id != author.value() {
            return Err(ArticleError::NotAuthor(author, slug.to_string()));
        }

        Ok(article)
    }

    /// Re-reads an article by slug with full relations and decorates it
    /// for `viewer`. Mutations call this to return a consistent view.
    async fn hydrated_view(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> Result<ArticleDto, ArticleError> {
        let record = self
            .store
            .find_article_by_slug(slug)
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| ArticleError::NotFound(slug.to_string()))?;

        let decorated = self
            .resolver
            .decorate_one(record, viewer)
            .await
            .map_err(Self::db_err)?;

        Ok(decorated_to_dto(decorated))
    }
}

#[async_trait::async_trait]
impl ArticleService for SeaOrmArticleService {
    async fn list_articles(
        &self,
        filter: ArticleFilter,
        viewer: Option<UserId>,
    ) -> Result<(Vec<ArticleDto>, u64), ArticleError> {
        let (records, total) = self
            .store
            .list_articles(&filter)
            .await
            .map_err(Self::db_err)?;

        let decorated = self
            .resolver
            .decorate(records, viewer)
            .await
            .map_err(Self::db_err)?;

        let articles = decorated.into_iter().map(decorated_to_dto).collect();

        Ok((articles, total))
    }

    async fn get_article(
        &self,
        slug: &str,
        viewer: Option<UserId>,
    ) -> Result<ArticleDto, ArticleError> {
        self.hydrated_view(slug, viewer).await
    }

    async fn create_article(
        &self,
        author: UserId,
        draft: NewArticle,
    ) -> Result<ArticleDto, ArticleError> {
        let slug = match self.store.create_article(author.value(), &draft).await {
            Ok(slug) => slug,
            Err(e) if db::is_unique_violation(&e) => {
                return Err(ArticleError::DuplicateSlug(crate::slug::slugify(
                    &draft.title,
                )));
            }
            Err(e) => return Err(Self::db_err(e)),
        };

        self.hydrated_view(&slug, Some(author)).await
    }

    async fn update_article(
        &self,
        slug: &str,
        author: UserId,
        changes: ArticleChanges,
    ) -> Result<ArticleDto, ArticleError> {
        self.load_owned(slug, author).await?;

        let new_slug = match self.store.update_article(slug, &changes).await {
            Ok(Some(new_slug)) => new_slug,
            Ok(None) => return Err(ArticleError::NotFound(slug.to_string())),
            Err(e) if db::is_unique_violation(&e) => {
                let title = changes.title.as_deref().unwrap_or(slug);
                return Err(ArticleError::DuplicateSlug(crate::slug::slugify(title)));
            }
            Err(e) => return Err(Self::db_err(e)),
        };

        self.hydrated_view(&new_slug, Some(author)).await
    }

    async fn delete_article(&self, slug: &str, author: UserId) -> Result<(), ArticleError> {
        self.load_owned(slug, author).await?;

        let deleted = self
            .store
            .delete_article(slug)
            .await
            .map_err(Self::db_err)?;

        if deleted {
            Ok(())
        } else {
            Err(ArticleError::NotFound(slug.to_string()))
        }
    }

    async fn favorite_article(
        &self,
        slug: &str,
        user: UserId,
    ) -> Result<ArticleDto, ArticleError> {
        let article = self
            .store
            .find_article_model_by_slug(slug)
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| ArticleError::NotFound(slug.to_string()))?;

        self.store
            .favorite(article.id, user.value())
            .await
            .map_err(Self::db_err)?;

        self.hydrated_view(slug, Some(user)).await
    }

    async fn unfavorite_article(
        &self,
        slug: &str,
        user: UserId,
    ) -> Result<ArticleDto, ArticleError> {
        let article = self
            .store
            .find_article_model_by_slug(slug)
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| ArticleError::NotFound(slug.to_string()))?;

        self.store
            .unfavorite(article.id, user.value())
            .await
            .map_err(Self::db_err)?;

        self.hydrated_view(slug, Some(user)).await
    }

    async fn list_tags(&self) -> Result<Vec<String>, ArticleError> {
        self.store.list_tag_labels().await.map_err(Self::db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service_with_author() -> (SeaOrmArticleService, Store, UserId) {
        let store = Store::new("sqlite::memory:").await.expect("store");
        let author = store
            .create_user("mario", "mario@super.io", "hash")
            .await
            .expect("author");

        (
            SeaOrmArticleService::new(store.clone()),
            store,
            UserId::new(author.id),
        )
    }

    fn draft(title: &str, tags: &[&str]) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            description: "a description".to_string(),
            body: "a body".to_string(),
            tag_list: tags.iter().map(ToString::to_string).collect(),
        }
    }

    #[tokio::test]
    async fn create_derives_slug_and_upserts_tags() {
        let (service, store, author) = service_with_author().await;

        let article = service
            .create_article(author, draft("Super Mario Facts", &["mario", "facts"]))
            .await
            .expect("create");

        assert_eq!(article.slug, "super-mario-facts");
        assert_eq!(article.tag_list, vec!["facts", "mario"]);
        assert!(!article.favorited);
        assert_eq!(article.favorites_count, 0);

        // Second article reusing a label must not duplicate the tag row.
        service
            .create_article(author, draft("More Mario Facts", &["mario"]))
            .await
            .expect("create second");

        assert_eq!(
            store.list_tag_labels().await.unwrap(),
            vec!["facts".to_string(), "mario".to_string()]
        );
    }

    #[tokio::test]
    async fn update_recomputes_slug_only_on_title_change() {
        let (service, _store, author) = service_with_author().await;

        service
            .create_article(author, draft("Original Title", &[]))
            .await
            .unwrap();

        let unchanged = service
            .update_article(
                "original-title",
                author,
                ArticleChanges {
                    body: Some("new body".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("body-only update");

        assert_eq!(unchanged.slug, "original-title");
        assert_eq!(unchanged.body, "new body");

        let renamed = service
            .update_article(
                "original-title",
                author,
                ArticleChanges {
                    title: Some("Renamed Title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("title update");

        assert_eq!(renamed.slug, "renamed-title");

        let missing = service.get_article("original-title", None).await;
        assert!(matches!(missing, Err(ArticleError::NotFound(_))));
    }

    #[tokio::test]
    async fn only_the_author_may_mutate() {
        let (service, store, author) = service_with_author().await;
        let other = store
            .create_user("bowser", "bowser@koopa.io", "hash")
            .await
            .unwrap();
        let other = UserId::new(other.id);

        service
            .create_article(author, draft("Castle Defense", &[]))
            .await
            .unwrap();

        let update = service
            .update_article(
                "castle-defense",
                other,
                ArticleChanges {
                    body: Some("kidnapped".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(update, Err(ArticleError::NotAuthor(_, _))));

        let delete = service.delete_article("castle-defense", other).await;
        assert!(matches!(delete, Err(ArticleError::NotAuthor(_, _))));

        // NotFound wins over ownership for slugs that never existed.
        let ghost = service.delete_article("no-such-slug", other).await;
        assert!(matches!(ghost, Err(ArticleError::NotFound(_))));
    }

    #[tokio::test]
    async fn favorite_scenario_roundtrip() {
        let (service, store, author) = service_with_author().await;
        let reader = store
            .create_user("luigi", "luigi@super.io", "hash")
            .await
            .unwrap();
        let reader = UserId::new(reader.id);

        service
            .create_article(author, draft("Super Mario Facts", &[]))
            .await
            .unwrap();

        let fetched = service
            .get_article("super-mario-facts", None)
            .await
            .expect("fetch by slug");
        assert_eq!(fetched.title, "Super Mario Facts");

        let first = service
            .favorite_article("super-mario-facts", reader)
            .await
            .unwrap();
        let second = service
            .favorite_article("super-mario-facts", reader)
            .await
            .unwrap();

        assert!(first.favorited && second.favorited);
        assert_eq!(second.favorites_count, 1);

        let after = service
            .unfavorite_article("super-mario-facts", reader)
            .await
            .unwrap();

        assert!(!after.favorited);
        assert_eq!(after.favorites_count, 0);
    }

    #[tokio::test]
    async fn list_count_matches_results_and_ordering_is_newest_first() {
        let (service, _store, author) = service_with_author().await;

        for title in ["First Post", "Second Post", "Third Post"] {
            service.create_article(author, draft(title, &[])).await.unwrap();
        }

        let (articles, total) = service
            .list_articles(ArticleFilter::default(), None)
            .await
            .unwrap();

        assert_eq!(total, 3);
        assert_eq!(articles.len() as u64, total);

        // Identical created_at timestamps fall back to id desc, which still
        // means insertion order reversed.
        let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["third-post", "second-post", "first-post"]);

        let (none, zero) = service
            .list_articles(
                ArticleFilter {
                    tag: Some("unused-tag".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(zero, 0);
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn filters_compose_over_tags_authors_and_favorites() {
        let (service, store, mario) = service_with_author().await;
        let luigi_row = store
            .create_user("luigi", "luigi@super.io", "hash")
            .await
            .unwrap();
        let luigi = UserId::new(luigi_row.id);

        service
            .create_article(mario, draft("Mushroom Guide", &["guide"]))
            .await
            .unwrap();
        service
            .create_article(luigi, draft("Mansion Guide", &["guide", "spooky"]))
            .await
            .unwrap();

        let (by_tag, n) = service
            .list_articles(
                ArticleFilter {
                    tag: Some("spooky".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(by_tag[0].slug, "mansion-guide");

        let (by_author, n) = service
            .list_articles(
                ArticleFilter {
                    author: Some("mario".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(by_author[0].slug, "mushroom-guide");

        service.favorite_article("mushroom-guide", luigi).await.unwrap();

        let (by_favorited, n) = service
            .list_articles(
                ArticleFilter {
                    favorited: Some("luigi".to_string()),
                    ..Default::default()
                },
                Some(luigi),
            )
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(by_favorited[0].slug, "mushroom-guide");
        assert!(by_favorited[0].favorited);

        // A multi-valued relation filter must not inflate the count: an
        // article with two tags matches a one-tag filter exactly once.
        let (both, n) = service
            .list_articles(
                ArticleFilter {
                    tag: Some("guide".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(both.len(), 2);
    }
}
