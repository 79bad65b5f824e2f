use crate::entities::{prelude::*, tags};
use anyhow::Result;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};

/// Repository for the shared tag vocabulary.
pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_labels(&self) -> Result<Vec<String>> {
        let labels: Vec<String> = Tags::find()
            .select_only()
            .column(tags::Column::Label)
            .order_by_asc(tags::Column::Label)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(labels)
    }
}
