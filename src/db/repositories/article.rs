use crate::entities::{article_tags, articles, favorites, prelude::*, tags, users};
use crate::slug::slugify;
use anyhow::{Context, Result};
use sea_orm::sea_query::{Alias, Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::collections::HashMap;

/// Filter criteria for the article feed. All predicates are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Only articles carrying this tag label.
    pub tag: Option<String>,
    /// Only articles written by this username.
    pub author: Option<String>,
    /// Only articles favorited by this username.
    pub favorited: Option<String>,
}

/// New article payload. Input bounds (title 5-50, description <=100,
/// body <=5000) are enforced at the API boundary; this layer stores the
/// fields verbatim and never truncates.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

/// Partial update; only provided fields are merged.
#[derive(Debug, Clone, Default)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

/// An article hydrated with its author, tag labels and favorite count.
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub article: articles::Model,
    pub author: users::Model,
    pub tag_list: Vec<String>,
    pub favorites_count: i64,
}

/// Repository for article storage and feed queries.
///
/// Feed listing is two-phase: a filter-only query projecting article ids
/// (so joins on multi-valued relations cannot duplicate rows in the count),
/// then a hydration query over the matching id set. The phases must stay
/// separate; folding them into one join breaks the count.
pub struct ArticleRepository {
    conn: DatabaseConnection,
}

impl ArticleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Feed queries
    // ========================================================================

    /// Lists articles matching `filter`, newest first, with the total match
    /// count. The count reflects the filter regardless of hydration.
    pub async fn list(&self, filter: &ArticleFilter) -> Result<(Vec<ArticleRecord>, u64)> {
        let mut filter_query = Articles::find()
            .select_only()
            .column(articles::Column::Id)
            .distinct();

        if let Some(author) = &filter.author {
            filter_query = filter_query
                .join(JoinType::LeftJoin, articles::Relation::Author.def())
                .filter(users::Column::Username.eq(author.as_str()));
        }

        if let Some(tag) = &filter.tag {
            filter_query = filter_query
                .join(JoinType::LeftJoin, articles::Relation::ArticleTags.def())
                .join(JoinType::LeftJoin, article_tags::Relation::Tags.def())
                .filter(tags::Column::Label.eq(tag.as_str()));
        }

        if let Some(favorited) = &filter.favorited {
            // The author join already claims the default users alias, so the
            // favoriting user gets its own.
            let fav_user = Alias::new("favorite_users");
            filter_query = filter_query
                .join(JoinType::LeftJoin, articles::Relation::Favorites.def())
                .join_as(
                    JoinType::LeftJoin,
                    favorites::Relation::Users.def(),
                    fav_user.clone(),
                )
                .filter(Expr::col((fav_user, users::Column::Username)).eq(favorited.as_str()));
        }

        let total = filter_query.clone().count(&self.conn).await?;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let ids: Vec<i32> = filter_query.into_tuple().all(&self.conn).await?;
        let records = self.hydrate(ids).await?;

        Ok((records, total))
    }

    /// Unique-slug lookup with the same relation set as the feed.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<ArticleRecord>> {
        let Some(article) = self.find_model_by_slug(slug).await? else {
            return Ok(None);
        };

        let mut records = self.hydrate(vec![article.id]).await?;
        Ok(records.pop())
    }

    /// Bare row lookup by slug, without relations. Used for ownership checks
    /// and as the target of favorite/comment operations.
    pub async fn find_model_by_slug(&self, slug: &str) -> Result<Option<articles::Model>> {
        let article = Articles::find()
            .filter(articles::Column::Slug.eq(slug))
            .one(&self.conn)
            .await?;

        Ok(article)
    }

    /// Fetches full rows for `ids`, eagerly joined with author, tags and
    /// favorite counts, ordered created_at desc with id desc as tiebreak.
    async fn hydrate(&self, ids: Vec<i32>) -> Result<Vec<ArticleRecord>> {
        let rows: Vec<(articles::Model, Option<users::Model>)> = Articles::find()
            .find_also_related(Users)
            .filter(articles::Column::Id.is_in(ids.clone()))
            .order_by_desc(articles::Column::CreatedAt)
            .order_by_desc(articles::Column::Id)
            .all(&self.conn)
            .await?;

        let tag_rows: Vec<(i32, String)> = ArticleTags::find()
            .select_only()
            .column(article_tags::Column::ArticleId)
            .column(tags::Column::Label)
            .join(JoinType::InnerJoin, article_tags::Relation::Tags.def())
            .filter(article_tags::Column::ArticleId.is_in(ids.clone()))
            .order_by_asc(tags::Column::Label)
            .into_tuple()
            .all(&self.conn)
            .await?;

        let count_rows: Vec<(i32, i64)> = Favorites::find()
            .select_only()
            .column(favorites::Column::ArticleId)
            .column_as(favorites::Column::Id.count(), "count")
            .filter(favorites::Column::ArticleId.is_in(ids))
            .group_by(favorites::Column::ArticleId)
            .into_tuple()
            .all(&self.conn)
            .await?;

        let mut tag_map: HashMap<i32, Vec<String>> = HashMap::new();
        for (article_id, label) in tag_rows {
            tag_map.entry(article_id).or_default().push(label);
        }

        let count_map: HashMap<i32, i64> = count_rows.into_iter().collect();

        let mut records = Vec::with_capacity(rows.len());
        for (article, author) in rows {
            let author = author
                .with_context(|| format!("article {} has no author row", article.id))?;
            let tag_list = tag_map.remove(&article.id).unwrap_or_default();
            let favorites_count = count_map.get(&article.id).copied().unwrap_or(0);

            records.push(ArticleRecord {
                article,
                author,
                tag_list,
                favorites_count,
            });
        }

        Ok(records)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Inserts a new article with its tag links in one transaction and
    /// returns the slug derived from the title.
    pub async fn create(&self, author_id: i32, draft: &NewArticle) -> Result<String> {
        let slug = slugify(&draft.title);
        let now = chrono::Utc::now();

        let txn = self.conn.begin().await?;

        let inserted = Articles::insert(articles::ActiveModel {
            slug: Set(slug.clone()),
            title: Set(draft.title.clone()),
            description: Set(draft.description.clone()),
            body: Set(draft.body.clone()),
            author_id: Set(author_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        Self::attach_tags(&txn, inserted.last_insert_id, &draft.tag_list).await?;

        txn.commit().await?;

        Ok(slug)
    }

    /// Upserts tags by label and links them to the article. An existing tag
    /// row with the same label is reused, never duplicated.
    async fn attach_tags(
        txn: &DatabaseTransaction,
        article_id: i32,
        labels: &[String],
    ) -> Result<()> {
        for label in labels {
            let insert = Tags::insert(tags::ActiveModel {
                label: Set(label.clone()),
                ..Default::default()
            })
            .on_conflict(
                OnConflict::column(tags::Column::Label)
                    .do_nothing()
                    .to_owned(),
            )
            .exec(txn)
            .await;

            match insert {
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e.into()),
            }

            let tag = Tags::find()
                .filter(tags::Column::Label.eq(label.as_str()))
                .one(txn)
                .await?
                .with_context(|| format!("tag '{label}' missing after upsert"))?;

            let link = ArticleTags::insert(article_tags::ActiveModel {
                article_id: Set(article_id),
                tag_id: Set(tag.id),
            })
            .on_conflict(
                OnConflict::columns([
                    article_tags::Column::ArticleId,
                    article_tags::Column::TagId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(txn)
            .await;

            match link {
                Ok(_) | Err(DbErr::RecordNotInserted) => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Merges the provided fields into the article found by `slug` and
    /// returns the (possibly recomputed) slug, or `None` when absent.
    /// The slug is only re-derived when the title actually changed.
    pub async fn update(&self, slug: &str, changes: &ArticleChanges) -> Result<Option<String>> {
        use sea_orm::ActiveModelTrait;

        let Some(existing) = self.find_model_by_slug(slug).await? else {
            return Ok(None);
        };

        let mut active: articles::ActiveModel = existing.clone().into();

        if let Some(title) = &changes.title {
            if *title != existing.title {
                active.slug = Set(slugify(title));
            }
            active.title = Set(title.clone());
        }
        if let Some(description) = &changes.description {
            active.description = Set(description.clone());
        }
        if let Some(body) = &changes.body {
            active.body = Set(body.clone());
        }
        active.updated_at = Set(chrono::Utc::now());

        let updated = active.update(&self.conn).await?;

        Ok(Some(updated.slug))
    }

    /// Deletes the article and its dependent rows; returns false when the
    /// slug does not exist (no write is issued in that case).
    pub async fn delete(&self, slug: &str) -> Result<bool> {
        let Some(existing) = self.find_model_by_slug(slug).await? else {
            return Ok(false);
        };

        let txn = self.conn.begin().await?;

        Favorites::delete_many()
            .filter(favorites::Column::ArticleId.eq(existing.id))
            .exec(&txn)
            .await?;
        Comments::delete_many()
            .filter(crate::entities::comments::Column::ArticleId.eq(existing.id))
            .exec(&txn)
            .await?;
        ArticleTags::delete_many()
            .filter(article_tags::Column::ArticleId.eq(existing.id))
            .exec(&txn)
            .await?;
        Articles::delete_by_id(existing.id).exec(&txn).await?;

        txn.commit().await?;

        Ok(true)
    }
}
