use axum::{Json, extract::State};
use std::sync::Arc;

use super::types::TagListBody;
use super::{ApiError, AppState};

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TagListBody>, ApiError> {
    let tags = state.articles().list_tags().await?;
    Ok(Json(TagListBody { tags }))
}
