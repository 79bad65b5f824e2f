use crate::entities::{comments, prelude::*, users};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Repository for article comments.
pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(
        &self,
        article_id: i32,
        author_id: i32,
        body: &str,
    ) -> Result<comments::Model> {
        let inserted = Comments::insert(comments::ActiveModel {
            body: Set(body.to_string()),
            article_id: Set(article_id),
            author_id: Set(author_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let comment = Comments::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .context("comment missing after insert")?;

        Ok(comment)
    }

    /// Comments for an article in creation order, each paired with its
    /// author row.
    pub async fn list_for_article(
        &self,
        article_id: i32,
    ) -> Result<Vec<(comments::Model, users::Model)>> {
        let rows: Vec<(comments::Model, Option<users::Model>)> = Comments::find()
            .find_also_related(Users)
            .filter(comments::Column::ArticleId.eq(article_id))
            .order_by_asc(comments::Column::CreatedAt)
            .order_by_asc(comments::Column::Id)
            .all(&self.conn)
            .await?;

        let mut out = Vec::with_capacity(rows.len());
        for (comment, author) in rows {
            let author =
                author.with_context(|| format!("comment {} has no author row", comment.id))?;
            out.push((comment, author));
        }

        Ok(out)
    }

    pub async fn find(&self, id: i32) -> Result<Option<comments::Model>> {
        let comment = Comments::find_by_id(id).one(&self.conn).await?;
        Ok(comment)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Comments::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
