use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{AuthUser, MaybeAuthUser};
use super::types::{CommentBody, CommentListBody};
use super::{ApiError, AppState, validation};

#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub comment: AddComment,
}

#[derive(Debug, Deserialize)]
pub struct AddComment {
    pub body: String,
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(author): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentBody>), ApiError> {
    validation::validate_comment_body(&payload.comment.body)?;

    let comment = state
        .comments()
        .add_comment(&slug, author, &payload.comment.body)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentBody { comment })))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<CommentListBody>, ApiError> {
    let comments = state.comments().list_comments(&slug, viewer).await?;
    Ok(Json(CommentListBody { comments }))
}

pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    AuthUser(viewer): AuthUser,
    Path((slug, comment_id)): Path<(String, i32)>,
) -> Result<StatusCode, ApiError> {
    state
        .comments()
        .delete_comment(&slug, comment_id, viewer)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
