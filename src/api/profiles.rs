use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::auth::{AuthUser, MaybeAuthUser};
use super::types::ProfileBody;
use super::{ApiError, AppState};

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileBody>, ApiError> {
    let profile = state.profiles().get_profile(&username, viewer).await?;
    Ok(Json(ProfileBody { profile }))
}

pub async fn follow(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileBody>, ApiError> {
    let profile = state.profiles().follow(viewer, &username).await?;
    Ok(Json(ProfileBody { profile }))
}

pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<ProfileBody>, ApiError> {
    let profile = state.profiles().unfollow(viewer, &username).await?;
    Ok(Json(ProfileBody { profile }))
}
