use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Closed Enumerations ---

/// ArticleStatus
///
/// Lifecycle state of an article. New articles start as `Draft`; only the
/// update path moves them forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[ts(export)]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Reaction
///
/// The reaction attached to an `ArticleLike`. Currently a single member;
/// kept as an enum so further kinds deserialize into a typed value instead
/// of a free string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[ts(export)]
pub enum Reaction {
    #[default]
    Like,
}

/// Category
///
/// Editorial category of an article. Stored and serialized with the exact
/// capitalized names the frontend filters on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, sqlx::Type, Default,
)]
#[sqlx(type_name = "TEXT")]
#[ts(export)]
pub enum Category {
    #[default]
    General,
    Technology,
    Wellness,
    Health,
    Fitness,
    Nutrition,
    Beauty,
    Fashion,
    Lifestyle,
    Motherhood,
    Parenting,
    Relationships,
    Selfcare,
    Mindset,
    Career,
    Finance,
    Business,
    Leadership,
    Empowerment,
    Education,
    Travel,
    Home,
    Entertainment,
    Community,
}

impl Category {
    /// Case-insensitive parse used by the `?category=` list filter.
    pub fn parse_ci(value: &str) -> Option<Self> {
        use Category::*;
        let all = [
            General,
            Technology,
            Wellness,
            Health,
            Fitness,
            Nutrition,
            Beauty,
            Fashion,
            Lifestyle,
            Motherhood,
            Parenting,
            Relationships,
            Selfcare,
            Mindset,
            Career,
            Finance,
            Business,
            Leadership,
            Empowerment,
            Education,
            Travel,
            Home,
            Entertainment,
            Community,
        ];
        all.into_iter()
            .find(|c| format!("{:?}", c).eq_ignore_ascii_case(value))
    }
}

// --- Core Application Schemas (Mapped to Database) ---

/// UserAccount
///
/// The raw login identity stored in the `users` table. The password hash
/// never leaves the server; the public projection is `UserOut`.
#[derive(Debug, Clone, FromRow, Default)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// UserOut
///
/// Public projection of a `UserAccount` (what the users endpoints return).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserOut {
    pub id: Uuid,
    pub username: String,
}

impl From<UserAccount> for UserOut {
    fn from(user: UserAccount) -> Self {
        UserOut {
            id: user.id,
            username: user.username,
        }
    }
}

/// Profile
///
/// The authoring identity, a 1:1 extension of a `UserAccount`. All content
/// (articles, comments, likes) references the profile, not the login record.
/// The username is joined in from `users` for display.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    // FK to users.id, unique (1:1).
    pub user_id: Uuid,
    #[sqlx(default)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub bio: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Article
///
/// An article record. The slug is derived from the title exactly once, at
/// creation; later title edits never touch it. `tags` and `likes` live in
/// side tables and are filled in by the repository after the row fetch.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Article {
    pub id: Uuid,
    // FK to profiles.id (the authoring identity).
    pub author_id: Uuid,
    #[sqlx(default)]
    pub author_username: String,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub description: Option<String>,
    pub content: String,
    pub status: ArticleStatus,
    /// Tag names attached to the article (side table `article_tags`).
    #[sqlx(default)]
    pub tags: Vec<String>,
    /// Profile ids that liked this article.
    #[sqlx(default)]
    pub likes: Vec<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// CommentView
///
/// Flat comment record as listed from the store, enriched with the author's
/// username (a join). The `article` key on the wire carries the owning
/// article id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct CommentView {
    pub id: i64,
    pub author_id: Uuid,
    #[sqlx(default)]
    pub author_username: String,
    #[serde(rename = "article")]
    #[ts(rename = "article")]
    pub article_id: Uuid,
    pub content: String,
    pub reply_to: Option<i64>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// ArticleLike
///
/// A single (user, article) like. The pair is unique; a second like by the
/// same profile on the same article is a conflict, enforced in the store.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ArticleLike {
    pub id: Uuid,
    // FK to profiles.id (the liking identity).
    pub user_id: Uuid,
    #[sqlx(default)]
    pub user_username: String,
    #[serde(rename = "article")]
    #[ts(rename = "article")]
    pub article_id: Uuid,
    pub reaction: Reaction,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for POST /auth/register. The password is validated against
/// the strength rules and hashed before it ever reaches the store.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /auth/login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// CreateArticleRequest
///
/// Input payload for POST /articles. The author is taken from the session,
/// never from the body. Slug and timestamps are assigned server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub category: Category,
    pub description: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: ArticleStatus,
}

/// UpdateArticleRequest
///
/// Partial update payload for PUT /articles/{id}. Absent fields keep their
/// stored value. The slug is immutable and has no field here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateArticleRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
}

/// CreateCommentRequest
///
/// Input payload for POST /comments. `reply_to`, when set, must name a
/// comment on the same article; that is validated before insertion.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateCommentRequest {
    #[serde(rename = "article")]
    #[ts(rename = "article")]
    pub article_id: Uuid,
    pub content: String,
    pub reply_to: Option<i64>,
}

/// UpdateCommentRequest
///
/// Input payload for PUT /comments/{id}. Only the content is editable.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// CreateLikeRequest
///
/// Input payload for POST /likes. The liking profile comes from the session.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct CreateLikeRequest {
    #[serde(rename = "article")]
    #[ts(rename = "article")]
    pub article_id: Uuid,
    #[serde(default)]
    pub reaction: Reaction,
}

/// UpdateProfileRequest
///
/// Partial update payload for PUT /profiles/{id} (owner only).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// UpdateUserRequest
///
/// Partial update payload for PUT /users/{id} (self only). A new password is
/// re-validated against the strength rules.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

// --- Response Schemas (Output) ---

/// TokenResponse
///
/// Output of POST /auth/login: the opaque API token plus the signed session
/// token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenResponse {
    pub api_token: String,
    pub session_token: String,
}

/// RegisterResponse
///
/// Output of POST /auth/register: every artifact provisioned by the atomic
/// registration flow.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterResponse {
    pub user: UserOut,
    pub profile: Profile,
    pub api_token: String,
    pub session_token: String,
}
