//! `SeaORM` implementation of the [`UserService`] trait.

use std::sync::Arc;

use crate::api::types::UserDto;
use crate::auth::JwtKeys;
use crate::db::{self, Store, UserChanges, UserRepository};
use crate::domain::UserId;
use crate::entities::users;
use crate::services::user_service::{NewUser, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    jwt: Arc<JwtKeys>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Store, jwt: Arc<JwtKeys>) -> Self {
        Self { store, jwt }
    }

    fn db_err(err: anyhow::Error) -> UserError {
        UserError::Database(err.to_string())
    }

    fn to_dto(&self, user: users::Model) -> Result<UserDto, UserError> {
        let token = self
            .jwt
            .issue(UserId::new(user.id))
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(UserDto {
            email: user.email,
            username: user.username,
            bio: user.bio,
            image: user.image,
            token,
        })
    }
}

#[async_trait::async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, new_user: NewUser) -> Result<UserDto, UserError> {
        let password_hash = UserRepository::hash_password(&new_user.password)
            .await
            .map_err(Self::db_err)?;

        let created = self
            .store
            .create_user(&new_user.username, &new_user.email, &password_hash)
            .await;

        match created {
            Ok(user) => self.to_dto(user),
            Err(e) if db::is_unique_violation(&e) => Err(UserError::Duplicate),
            Err(e) => Err(Self::db_err(e)),
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<UserDto, UserError> {
        let user = self
            .store
            .verify_credentials(email, password)
            .await
            .map_err(Self::db_err)?
            .ok_or(UserError::InvalidCredentials)?;

        self.to_dto(user)
    }

    async fn current_user(&self, user: UserId) -> Result<UserDto, UserError> {
        let row = self
            .store
            .find_user_by_id(user.value())
            .await
            .map_err(Self::db_err)?
            .ok_or(UserError::NotFound)?;

        self.to_dto(row)
    }

    async fn update_user(
        &self,
        user: UserId,
        changes: UserChanges,
    ) -> Result<UserDto, UserError> {
        let updated = self.store.update_user(user.value(), changes).await;

        match updated {
            Ok(Some(row)) => self.to_dto(row),
            Ok(None) => Err(UserError::NotFound),
            Err(e) if db::is_unique_violation(&e) => Err(UserError::Duplicate),
            Err(e) => Err(Self::db_err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt() -> Arc<JwtKeys> {
        Arc::new(JwtKeys::new("test-secret", 3600))
    }

    async fn service() -> SeaOrmUserService {
        let store = Store::new("sqlite::memory:").await.expect("store");
        SeaOrmUserService::new(store, test_jwt())
    }

    fn mario() -> NewUser {
        NewUser {
            username: "mario".to_string(),
            email: "mario@super.io".to_string(),
            password: "peach-forever".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let service = service().await;

        let registered = service.register(mario()).await.expect("register");
        assert_eq!(registered.username, "mario");
        assert!(!registered.token.is_empty());

        let logged_in = service
            .login("mario@super.io", "peach-forever")
            .await
            .expect("login");
        assert_eq!(logged_in.email, "mario@super.io");

        let wrong = service.login("mario@super.io", "bowser").await;
        assert!(matches!(wrong, Err(UserError::InvalidCredentials)));

        let unknown = service.login("waluigi@super.io", "anything").await;
        assert!(matches!(unknown, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts() {
        let service = service().await;

        service.register(mario()).await.unwrap();

        let dup = service.register(mario()).await;
        assert!(matches!(dup, Err(UserError::Duplicate)));

        // Same email under a different username is still a duplicate.
        let dup_email = service
            .register(NewUser {
                username: "mario2".to_string(),
                ..mario()
            })
            .await;
        assert!(matches!(dup_email, Err(UserError::Duplicate)));
    }

    #[tokio::test]
    async fn update_merges_partial_fields() {
        let service = service().await;

        let registered = service.register(mario()).await.unwrap();
        let token_user = test_jwt().verify(&registered.token).expect("valid token");

        let updated = service
            .update_user(
                token_user,
                UserChanges {
                    bio: Some("It's-a me".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.bio, "It's-a me");
        assert_eq!(updated.username, "mario");
        assert_eq!(updated.email, "mario@super.io");
    }
}
