use chrono::{DateTime, Utc};
use serde::Serialize;

/// Public view of a user as seen by another (or anonymous) viewer.
/// The `following` flag is computed per request, never stored.
#[derive(Debug, Serialize, Clone)]
pub struct ProfileDto {
    pub username: String,
    pub bio: String,
    pub image: String,
    pub following: bool,
}

/// Public view of an article. Internal ids and the author's credentials
/// never appear here; the author is replaced by their profile view.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDto {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: i64,
    pub author: ProfileDto,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub body: String,
    pub author: ProfileDto,
}

/// A user's own view of their account. The token is supplied by the auth
/// collaborator and passed through opaquely.
#[derive(Debug, Serialize, Clone)]
pub struct UserDto {
    pub email: String,
    pub username: String,
    pub bio: String,
    pub image: String,
    pub token: String,
}

// ============================================================================
// Response envelopes (the wire contract of the original API)
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ArticleBody {
    pub article: ArticleDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListBody {
    pub articles: Vec<ArticleDto>,
    pub articles_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ProfileBody {
    pub profile: ProfileDto,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct CommentBody {
    pub comment: CommentDto,
}

#[derive(Debug, Serialize)]
pub struct CommentListBody {
    pub comments: Vec<CommentDto>,
}

#[derive(Debug, Serialize)]
pub struct TagListBody {
    pub tags: Vec<String>,
}
