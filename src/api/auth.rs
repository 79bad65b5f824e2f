//! Viewer identity extraction.
//!
//! The token scheme of the original API is `Authorization: Token <jwt>`;
//! `Bearer` is accepted as well. [`AuthUser`] rejects anonymous requests,
//! [`MaybeAuthUser`] admits them with `None` — mirroring the required vs
//! optional authentication middleware pair of the original.

use axum::{extract::FromRequestParts, http::HeaderMap, http::request::Parts};
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::UserId;

/// An authenticated viewer. Rejects the request with 401 when the token is
/// missing, malformed, expired or carries a foreign signature.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// A possibly-anonymous viewer. A bad token is treated the same as no
/// token: the request proceeds anonymously.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<UserId>);

fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization")?.to_str().ok()?;

    auth_header
        .strip_prefix("Token ")
        .or_else(|| auth_header.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("missing authentication token"))?;

        let user = state
            .jwt()
            .verify(&token)
            .ok_or_else(|| ApiError::unauthorized("invalid or expired token"))?;

        tracing::Span::current().record("user_id", user.value());

        Ok(Self(user))
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let viewer = extract_token(&parts.headers).and_then(|token| state.jwt().verify(&token));

        if let Some(user) = viewer {
            tracing::Span::current().record("user_id", user.value());
        }

        Ok(Self(viewer))
    }
}
