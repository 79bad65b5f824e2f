use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::{AuthUser, MaybeAuthUser};
use super::types::{ArticleBody, ArticleListBody};
use super::{ApiError, AppState, validation};
use crate::db::{ArticleChanges, ArticleFilter, NewArticle};

#[derive(Debug, Deserialize)]
pub struct ListArticlesQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub article: CreateArticle,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub article: UpdateArticle,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<ArticleListBody>, ApiError> {
    let filter = ArticleFilter {
        tag: query.tag,
        author: query.author,
        favorited: query.favorited,
    };

    let (articles, articles_count) = state.articles().list_articles(filter, viewer).await?;

    Ok(Json(ArticleListBody {
        articles,
        articles_count,
    }))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, ApiError> {
    let article = state.articles().get_article(&slug, viewer).await?;
    Ok(Json(ArticleBody { article }))
}

pub async fn create_article(
    State(state): State<Arc<AppState>>,
    AuthUser(author): AuthUser,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleBody>), ApiError> {
    validation::validate_title(&payload.article.title)?;
    validation::validate_description(&payload.article.description)?;
    validation::validate_article_body(&payload.article.body)?;

    let draft = NewArticle {
        title: payload.article.title,
        description: payload.article.description,
        body: payload.article.body,
        tag_list: payload.article.tag_list,
    };

    let article = state.articles().create_article(author, draft).await?;

    Ok((StatusCode::CREATED, Json(ArticleBody { article })))
}

pub async fn update_article(
    State(state): State<Arc<AppState>>,
    AuthUser(author): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleBody>, ApiError> {
    if let Some(title) = &payload.article.title {
        validation::validate_title(title)?;
    }
    if let Some(description) = &payload.article.description {
        validation::validate_description(description)?;
    }
    if let Some(body) = &payload.article.body {
        validation::validate_article_body(body)?;
    }

    let changes = ArticleChanges {
        title: payload.article.title,
        description: payload.article.description,
        body: payload.article.body,
    };

    let article = state
        .articles()
        .update_article(&slug, author, changes)
        .await?;

    Ok(Json(ArticleBody { article }))
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    AuthUser(author): AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.articles().delete_article(&slug, author).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn favorite_article(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, ApiError> {
    let article = state.articles().favorite_article(&slug, user).await?;
    Ok(Json(ArticleBody { article }))
}

pub async fn unfavorite_article(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ArticleBody>, ApiError> {
    let article = state.articles().unfavorite_article(&slug, user).await?;
    Ok(Json(ArticleBody { article }))
}
