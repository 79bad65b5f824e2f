use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::AuthUser;
use super::types::UserBody;
use super::{ApiError, AppState, validation};
use crate::db::UserChanges;
use crate::services::NewUser;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user: RegisterUser,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user: LoginUser,
}

#[derive(Debug, Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub user: UpdateUser,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserBody>), ApiError> {
    let username = validation::validate_username(&payload.user.username)?.to_string();
    let email = validation::validate_email(&payload.user.email)?.to_string();
    validation::validate_password(&payload.user.password)?;

    let user = state
        .users()
        .register(NewUser {
            username,
            email,
            password: payload.user.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserBody { user })))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserBody>, ApiError> {
    let user = state
        .users()
        .login(&payload.user.email, &payload.user.password)
        .await?;

    Ok(Json(UserBody { user }))
}

pub async fn current_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserBody>, ApiError> {
    let user = state.users().current_user(user_id).await?;
    Ok(Json(UserBody { user }))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserBody>, ApiError> {
    let username = payload
        .user
        .username
        .as_deref()
        .map(validation::validate_username)
        .transpose()?
        .map(ToString::to_string);
    let email = payload
        .user
        .email
        .as_deref()
        .map(validation::validate_email)
        .transpose()?
        .map(ToString::to_string);
    if let Some(password) = &payload.user.password {
        validation::validate_password(password)?;
    }

    let changes = UserChanges {
        username,
        email,
        bio: payload.user.bio,
        image: payload.user.image,
        password: payload.user.password,
    };

    let user = state.users().update_user(user_id, changes).await?;

    Ok(Json(UserBody { user }))
}
