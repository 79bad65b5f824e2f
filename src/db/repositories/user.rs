use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::entities::{prelude::*, users};

/// Partial user update; only provided fields are merged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

/// Repository for user accounts.
///
/// Password hashing and verification run under `spawn_blocking` because
/// Argon2 is CPU-bound and would stall the async runtime otherwise.
pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Hashes a plaintext password with Argon2id.
    pub async fn hash_password(password: &str) -> Result<String> {
        let password = password.to_string();

        let hash = task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            let argon2 = Argon2::default();
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))
        })
        .await
        .context("password hashing task panicked")??;

        Ok(hash)
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<users::Model> {
        let inserted = Users::insert(users::ActiveModel {
            username: Set(username.to_string()),
            email: Set(email.to_string()),
            bio: Set(String::new()),
            image: Set(String::new()),
            password_hash: Set(password_hash.to_string()),
            ..Default::default()
        })
        .exec(&self.conn)
        .await?;

        let user = Users::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await?
            .context("user missing after insert")?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        let user = Users::find_by_id(id).one(&self.conn).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>> {
        let user = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?;

        Ok(user)
    }

    /// Loads the user by email and checks the password against the stored
    /// hash. Returns `None` for unknown email or wrong password alike.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<users::Model>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let password = password.to_string();
        let password_hash = user.password_hash.clone();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("password verification task panicked")??;

        Ok(is_valid.then_some(user))
    }

    /// Merges the provided fields into the user row. A password change is
    /// re-hashed here; other fields are stored verbatim.
    pub async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<users::Model>> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = existing.into();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(bio);
        }
        if let Some(image) = changes.image {
            active.image = Set(image);
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(Self::hash_password(&password).await?);
        }

        let updated = active.update(&self.conn).await?;

        Ok(Some(updated))
    }
}
