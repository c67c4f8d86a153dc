use crate::{
    AppState, auth,
    auth::AuthUser,
    comments::{CommentNode, build_comment_tree},
    error::ApiError,
    models::{
        Article, ArticleLike, Category, CommentView, CreateArticleRequest,
        CreateCommentRequest, CreateLikeRequest, LoginRequest, Profile, RegisterRequest,
        RegisterResponse, TokenResponse, UpdateArticleRequest, UpdateCommentRequest,
        UpdateProfileRequest, UpdateUserRequest, UserOut,
    },
    policy::{Action, Actor, Resource, Role, authorize},
    validate,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use uuid::Uuid;

// --- Filter Structs ---

/// ArticleFilter
///
/// Query parameters accepted by GET /articles: category (case-insensitive
/// exact match), tag substring, and title search.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
}

/// CommentFilter
///
/// Query parameters accepted by GET /comments.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct CommentFilter {
    pub author_id: Option<Uuid>,
}

/// LikeFilter
///
/// Query parameters accepted by GET /likes. The `article` key matches the
/// field name on the like payloads.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct LikeFilter {
    pub article: Option<Uuid>,
}

/// Shorthand for the policy gate: deny becomes the 403 taxonomy error.
fn check(actor: Option<&Actor>, action: Action, resource: Resource) -> Result<(), ApiError> {
    if authorize(actor, action, &resource) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Normalizes a tag list into a set: trimmed, de-duplicated, empty entries
/// dropped, first occurrence wins the position.
fn normalize_tags(raw: Vec<String>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

// --- Auth Handlers ---

/// register
///
/// [Public Route] Creates an account and everything that rides along with
/// it: Users-group membership, the authoring profile, an opaque API token
/// and a signed session token. The provisioning is one store transaction;
/// a failed registration leaves nothing behind.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registered", body = RegisterResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    validate::validate_username(&payload.username)?;
    validate::validate_password(&payload.username, &payload.password)?;

    let password_hash = auth::hash_password(&payload.password)?;
    let api_token = auth::generate_api_token();

    let (user, profile) = state
        .repo
        .register_user(&payload.username, &password_hash, &api_token)
        .await?;

    // A fresh registration is always exactly a Users-group member; no need
    // to re-resolve the actor we just created.
    let actor = Actor {
        user_id: user.id,
        profile_id: profile.id,
        username: user.username.clone(),
        roles: BTreeSet::from([Role::User]),
    };
    let tokens = auth::issue_tokens(&actor, api_token, &state.config.jwt_secret)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserOut::from(user),
            profile,
            api_token: tokens.api_token,
            session_token: tokens.session_token,
        }),
    ))
}

/// login
///
/// [Public Route] Verifies credentials and returns the account's API token
/// (minted anew if logout revoked it) plus a fresh session token. Bad
/// username and bad password are indistinguishable to the caller.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Bad credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user = state
        .repo
        .find_user_by_username(&payload.username)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::Unauthenticated);
    }

    let actor = state
        .repo
        .get_actor(user.id)
        .await?
        .ok_or(ApiError::Unauthenticated)?;

    let api_token = state
        .repo
        .get_or_create_api_token(user.id, &auth::generate_api_token())
        .await?;

    Ok(Json(auth::issue_tokens(
        &actor,
        api_token,
        &state.config.jwt_secret,
    )?))
}

/// logout
///
/// [Authenticated Route] Revokes the account's opaque API token. Session
/// tokens simply age out.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 200, description = "Logged out"))
)]
pub async fn logout(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.repo.delete_api_token(actor.user_id).await?;
    Ok(Json(serde_json::json!({ "message": "Logged out successfully!" })))
}

/// get_me
///
/// [Authenticated Route] The authenticated actor's own profile.
#[utoipa::path(
    get,
    path = "/me",
    responses((status = 200, description = "Profile", body = Profile))
)]
pub async fn get_me(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .repo
        .get_profile(actor.profile_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(profile))
}

// --- User Handlers ---

/// list_users
///
/// [Authenticated Route] Full account listing; admins and superusers only.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "Users", body = [UserOut]))
)]
pub async fn list_users(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserOut>>, ApiError> {
    check(Some(&actor), Action::List, Resource::User { id: None })?;
    let users = state.repo.list_users().await?;
    Ok(Json(users.into_iter().map(UserOut::from).collect()))
}

/// get_user
///
/// [Authenticated Route] A single account: self, or an elevated actor.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, description = "User", body = UserOut))
)]
pub async fn get_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserOut>, ApiError> {
    check(Some(&actor), Action::Retrieve, Resource::User { id: Some(id) })?;
    let user = state.repo.get_user(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(UserOut::from(user)))
}

/// update_user
///
/// [Authenticated Route] Username/password change, self only. A new
/// password goes back through the strength rules before hashing.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses((status = 200, description = "Updated", body = UserOut))
)]
pub async fn update_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserOut>, ApiError> {
    check(Some(&actor), Action::Update, Resource::User { id: Some(id) })?;

    if let Some(ref username) = payload.username {
        validate::validate_username(username)?;
    }

    let password_hash = match payload.password {
        Some(ref password) => {
            // Validate against the name the account will end up with.
            let username = payload.username.as_deref().unwrap_or(&actor.username);
            validate::validate_password(username, password)?;
            Some(auth::hash_password(password)?)
        }
        None => None,
    };

    let user = state
        .repo
        .update_user(id, payload.username, password_hash)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(UserOut::from(user)))
}

/// delete_user
///
/// [Authenticated Route] Removes an account and, by cascade, its profile
/// and content. Self, superuser, or Admins.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    check(Some(&actor), Action::Delete, Resource::User { id: Some(id) })?;
    if state.repo.delete_user(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Profile Handlers ---

/// list_profiles
///
/// [Public Route] All authoring profiles.
#[utoipa::path(
    get,
    path = "/profiles",
    responses((status = 200, description = "Profiles", body = [Profile]))
)]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    Ok(Json(state.repo.list_profiles().await?))
}

/// get_profile
///
/// [Public Route] A single authoring profile.
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses((status = 200, description = "Profile", body = Profile))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.repo.get_profile(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(profile))
}

/// update_profile
///
/// [Authenticated Route] Profile edits, owner only; not even admins may
/// rewrite someone else's byline.
#[utoipa::path(
    put,
    path = "/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Updated", body = Profile))
)]
pub async fn update_profile(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.repo.get_profile(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Update,
        Resource::Profile {
            owner: Some(profile.user_id),
        },
    )?;

    let updated = state
        .repo
        .update_profile(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(updated))
}

/// delete_profile
///
/// [Authenticated Route] Always denied: profiles only disappear with their
/// account. The route exists so the denial is a policy answer, not a 405.
#[utoipa::path(
    delete,
    path = "/profiles/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses((status = 403, description = "Denied"))
)]
pub async fn delete_profile(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let profile = state.repo.get_profile(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Delete,
        Resource::Profile {
            owner: Some(profile.user_id),
        },
    )?;
    // Unreachable: the policy table has no allowing arm for profile
    // deletion.
    Ok(StatusCode::NO_CONTENT)
}

// --- Article Handlers ---

/// list_articles
///
/// [Public Route] Filtered article listing, newest first. An unknown
/// category name matches nothing rather than erroring.
#[utoipa::path(
    get,
    path = "/articles",
    params(ArticleFilter),
    responses((status = 200, description = "Articles", body = [Article]))
)]
pub async fn list_articles(
    State(state): State<AppState>,
    Query(filter): Query<ArticleFilter>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let category = match filter.category.as_deref() {
        Some(raw) => match Category::parse_ci(raw) {
            Some(c) => Some(c),
            None => return Ok(Json(vec![])),
        },
        None => None,
    };

    let articles = state
        .repo
        .list_articles(category, filter.tag, filter.search)
        .await?;
    Ok(Json(articles))
}

/// get_article
///
/// [Public Route] A single article with tags and the liker list.
#[utoipa::path(
    get,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Article", body = Article))
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Article>, ApiError> {
    let article = state.repo.get_article(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(article))
}

/// create_article
///
/// [Authenticated Route] New article; moderators and up. The slug is
/// derived from the title here, once, and the assembled article goes to the
/// store in the same call, with no separate slug write to race against.
#[utoipa::path(
    post,
    path = "/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Created", body = Article),
        (status = 409, description = "Duplicate title")
    )
)]
pub async fn create_article(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    check(Some(&actor), Action::Create, Resource::Article { author: None })?;

    validate::validate_title(&payload.title)?;
    validate::validate_description(payload.description.as_deref())?;
    validate::validate_article_content(&payload.content)?;

    let article = validate::assign_slug_if_absent(Article {
        id: Uuid::new_v4(),
        author_id: actor.profile_id,
        author_username: actor.username.clone(),
        title: payload.title,
        slug: String::new(),
        category: payload.category,
        description: payload.description,
        content: payload.content,
        status: payload.status,
        tags: normalize_tags(payload.tags),
        ..Article::default()
    });

    let created = state.repo.create_article(article).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// update_article
///
/// [Authenticated Route] Edits an article. The policy arm is strict: the
/// author must also hold Moderators membership, unless the actor is an
/// admin or superuser. Title edits never touch the slug.
#[utoipa::path(
    put,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    request_body = UpdateArticleRequest,
    responses((status = 200, description = "Updated", body = Article))
)]
pub async fn update_article(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    let article = state.repo.get_article(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Update,
        Resource::Article {
            author: Some(article.author_id),
        },
    )?;

    if let Some(ref title) = payload.title {
        validate::validate_title(title)?;
    }
    validate::validate_description(payload.description.as_deref())?;
    if let Some(ref content) = payload.content {
        validate::validate_article_content(content)?;
    }

    let mut payload = payload;
    payload.tags = payload.tags.take().map(normalize_tags);

    let updated = state
        .repo
        .update_article(id, payload)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(updated))
}

/// delete_article
///
/// [Authenticated Route] Same rule as update. Comments and likes go with
/// the article.
#[utoipa::path(
    delete,
    path = "/articles/{id}",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Denied"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_article(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let article = state.repo.get_article(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Delete,
        Resource::Article {
            author: Some(article.author_id),
        },
    )?;

    if state.repo.delete_article(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// article_comments
///
/// [Public Route] The article's comments as a reply tree, roots and reply
/// lists ordered oldest first.
#[utoipa::path(
    get,
    path = "/articles/{id}/comments",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Comment tree", body = [CommentNode]))
)]
pub async fn article_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CommentNode>>, ApiError> {
    state.repo.get_article(id).await?.ok_or(ApiError::NotFound)?;
    let flat = state.repo.list_comments(Some(id), None).await?;
    Ok(Json(build_comment_tree(flat)))
}

/// article_likes
///
/// [Public Route] The article's likes, oldest first.
#[utoipa::path(
    get,
    path = "/articles/{id}/likes",
    params(("id" = Uuid, Path, description = "Article ID")),
    responses((status = 200, description = "Likes", body = [ArticleLike]))
)]
pub async fn article_likes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ArticleLike>>, ApiError> {
    state.repo.get_article(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(state.repo.list_likes(Some(id)).await?))
}

// --- Comment Handlers ---

/// list_comments
///
/// [Public Route] The comment collection as a reply tree, optionally
/// filtered by author. A reply whose parent falls outside the filtered set
/// drops out of the tree along with its subtree.
#[utoipa::path(
    get,
    path = "/comments",
    params(CommentFilter),
    responses((status = 200, description = "Comment tree", body = [CommentNode]))
)]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(filter): Query<CommentFilter>,
) -> Result<Json<Vec<CommentNode>>, ApiError> {
    let flat = state.repo.list_comments(None, filter.author_id).await?;
    Ok(Json(build_comment_tree(flat)))
}

/// get_comment
///
/// [Public Route] A single comment, flat.
#[utoipa::path(
    get,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses((status = 200, description = "Comment", body = CommentView))
)]
pub async fn get_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CommentView>, ApiError> {
    let comment = state.repo.get_comment(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(comment))
}

/// create_comment
///
/// [Authenticated Route] Posts a comment, optionally as a reply. The reply
/// target must be a comment on the same article; that is checked against
/// the looked-up parent before anything is written.
#[utoipa::path(
    post,
    path = "/comments",
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Created", body = CommentView),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_comment(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentView>), ApiError> {
    check(Some(&actor), Action::Create, Resource::Comment { author: None })?;
    validate::validate_comment_content(&payload.content)?;

    state
        .repo
        .get_article(payload.article_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if let Some(parent_id) = payload.reply_to {
        let parent = state.repo.get_comment(parent_id).await?;
        validate::validate_reply_target(payload.article_id, parent.as_ref())?;
    }

    let comment = state
        .repo
        .create_comment(
            actor.profile_id,
            payload.article_id,
            &payload.content,
            payload.reply_to,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// update_comment
///
/// [Authenticated Route] Content edit: the author, a moderator, or better.
#[utoipa::path(
    put,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    request_body = UpdateCommentRequest,
    responses((status = 200, description = "Updated", body = CommentView))
)]
pub async fn update_comment(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<Json<CommentView>, ApiError> {
    let comment = state.repo.get_comment(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Update,
        Resource::Comment {
            author: Some(comment.author_id),
        },
    )?;
    validate::validate_comment_content(&payload.content)?;

    let updated = state
        .repo
        .update_comment(id, &payload.content)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(updated))
}

/// delete_comment
///
/// [Authenticated Route] Removal: the author, an admin, or a superuser;
/// moderators may edit but not delete.
#[utoipa::path(
    delete,
    path = "/comments/{id}",
    params(("id" = i64, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_comment(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let comment = state.repo.get_comment(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Delete,
        Resource::Comment {
            author: Some(comment.author_id),
        },
    )?;

    if state.repo.delete_comment(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Like Handlers ---

/// list_likes
///
/// [Public Route] Like collection, optionally scoped to one article.
#[utoipa::path(
    get,
    path = "/likes",
    params(LikeFilter),
    responses((status = 200, description = "Likes", body = [ArticleLike]))
)]
pub async fn list_likes(
    State(state): State<AppState>,
    Query(filter): Query<LikeFilter>,
) -> Result<Json<Vec<ArticleLike>>, ApiError> {
    Ok(Json(state.repo.list_likes(filter.article).await?))
}

/// get_like
///
/// [Public Route] A single like record.
#[utoipa::path(
    get,
    path = "/likes/{id}",
    params(("id" = Uuid, Path, description = "Like ID")),
    responses((status = 200, description = "Like", body = ArticleLike))
)]
pub async fn get_like(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArticleLike>, ApiError> {
    let like = state.repo.get_like(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(like))
}

/// create_like
///
/// [Authenticated Route] Likes an article on behalf of the actor's profile.
/// One like per (user, article): the store insert is atomic and a duplicate
/// comes back as 409.
#[utoipa::path(
    post,
    path = "/likes",
    request_body = CreateLikeRequest,
    responses(
        (status = 201, description = "Liked", body = ArticleLike),
        (status = 409, description = "Already liked")
    )
)]
pub async fn create_like(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateLikeRequest>,
) -> Result<(StatusCode, Json<ArticleLike>), ApiError> {
    check(Some(&actor), Action::Create, Resource::Like { owner: None })?;

    state
        .repo
        .get_article(payload.article_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let like = state
        .repo
        .create_like(actor.profile_id, payload.article_id, payload.reaction)
        .await?;
    Ok((StatusCode::CREATED, Json(like)))
}

/// delete_like
///
/// [Authenticated Route] Takes a like back. Strictly the liking profile;
/// elevation does not help here.
#[utoipa::path(
    delete,
    path = "/likes/{id}",
    params(("id" = Uuid, Path, description = "Like ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_like(
    AuthUser(actor): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let like = state.repo.get_like(id).await?.ok_or(ApiError::NotFound)?;
    check(
        Some(&actor),
        Action::Delete,
        Resource::Like {
            owner: Some(like.user_id),
        },
    )?;

    if state.repo.delete_like(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
