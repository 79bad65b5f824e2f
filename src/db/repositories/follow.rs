use crate::entities::{follows, prelude::*};
use anyhow::Result;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
    Set,
};
use std::collections::HashSet;

/// Existence ledger for the directional (follower, following) relation.
///
/// Same shape as the favorite ledger, keyed on the user pair. Self-follow
/// is not rejected here; nothing in the data model forbids it.
pub struct FollowRepository {
    conn: DatabaseConnection,
}

impl FollowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn is_following(&self, follower_id: i32, following_id: i32) -> Result<bool> {
        let count = Follows::find()
            .filter(follows::Column::FollowerId.eq(follower_id))
            .filter(follows::Column::FollowingId.eq(following_id))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Idempotent toggle-on; a lost race against an identical follow is
    /// swallowed by the unique index.
    pub async fn follow(&self, follower_id: i32, following_id: i32) -> Result<()> {
        let insert = Follows::insert(follows::ActiveModel {
            follower_id: Set(follower_id),
            following_id: Set(following_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([follows::Column::FollowerId, follows::Column::FollowingId])
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

    /// Idempotent toggle-off; absent edge is a no-op.
    pub async fn unfollow(&self, follower_id: i32, following_id: i32) -> Result<()> {
        Follows::delete_many()
            .filter(follows::Column::FollowerId.eq(follower_id))
            .filter(follows::Column::FollowingId.eq(following_id))
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    /// Subset of `user_ids` that `follower_id` follows, for batch decoration.
    pub async fn following_set(
        &self,
        follower_id: i32,
        user_ids: &[i32],
    ) -> Result<HashSet<i32>> {
        if user_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<i32> = Follows::find()
            .select_only()
            .column(follows::Column::FollowingId)
            .filter(follows::Column::FollowerId.eq(follower_id))
            .filter(follows::Column::FollowingId.is_in(user_ids.to_vec()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }
}
