//! `SeaORM` implementation of the [`ProfileService`] trait.

use crate::api::types::ProfileDto;
use crate::db::Store;
use crate::domain::UserId;
use crate::entities::users;
use crate::services::profile_service::{ProfileError, ProfileService};

pub struct SeaOrmProfileService {
    store: Store,
}

impl SeaOrmProfileService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn db_err(err: anyhow::Error) -> ProfileError {
        ProfileError::Database(err.to_string())
    }

    async fn load_user(&self, username: &str) -> Result<users::Model, ProfileError> {
        self.store
            .find_user_by_username(username)
            .await
            .map_err(Self::db_err)?
            .ok_or_else(|| ProfileError::NotFound(username.to_string()))
    }

    fn to_profile(user: users::Model, following: bool) -> ProfileDto {
        ProfileDto {
            username: user.username,
            bio: user.bio,
            image: user.image,
            following,
        }
    }
}

#[async_trait::async_trait]
impl ProfileService for SeaOrmProfileService {
    async fn get_profile(
        &self,
        username: &str,
        viewer: Option<UserId>,
    ) -> Result<ProfileDto, ProfileError> {
        let user = self.load_user(username).await?;

        let following = match viewer {
            Some(viewer) => self
                .store
                .is_following(viewer.value(), user.id)
                .await
                .map_err(Self::db_err)?,
            None => false,
        };

        Ok(Self::to_profile(user, following))
    }

    async fn follow(&self, viewer: UserId, username: &str) -> Result<ProfileDto, ProfileError> {
        let user = self.load_user(username).await?;

        self.store
            .follow(viewer.value(), user.id)
            .await
            .map_err(Self::db_err)?;

        Ok(Self::to_profile(user, true))
    }

    async fn unfollow(&self, viewer: UserId, username: &str) -> Result<ProfileDto, ProfileError> {
        let user = self.load_user(username).await?;

        self.store
            .unfollow(viewer.value(), user.id)
            .await
            .map_err(Self::db_err)?;

        Ok(Self::to_profile(user, false))
    }
}
