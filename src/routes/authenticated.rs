use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Authenticated Router Module
///
/// Every route here sits behind the `AuthUser` extractor layer, so handlers
/// always start from a resolved actor. What the actor may actually do is
/// decided per handler by the policy engine: comment writes need any group
/// membership, article writes need Moderators or better, user records are
/// self-or-admin, and so on.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /auth/logout
        // Revokes the opaque API token.
        .route("/auth/logout", post(handlers::logout))
        // GET /me
        // The authenticated actor's own profile.
        .route("/me", get(handlers::get_me))
        // --- Articles ---
        // POST /articles: moderators and up.
        .route("/articles", post(handlers::create_article))
        // PUT/PATCH/DELETE /articles/{id}: author-and-moderator, or
        // admin+. PATCH is an alias: the update payload is already partial.
        .route(
            "/articles/{id}",
            put(handlers::update_article)
                .patch(handlers::update_article)
                .delete(handlers::delete_article),
        )
        // --- Comments ---
        // POST /comments: any group member. Replies are validated against
        // their target's article.
        .route("/comments", post(handlers::create_comment))
        .route(
            "/comments/{id}",
            put(handlers::update_comment)
                .patch(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
        // --- Likes ---
        // POST /likes: one per (user, article), duplicates are a 409.
        .route("/likes", post(handlers::create_like))
        // DELETE /likes/{id}: strictly the liking profile.
        .route("/likes/{id}", delete(handlers::delete_like))
        // --- Profiles & Users ---
        .route(
            "/profiles/{id}",
            put(handlers::update_profile)
                .patch(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .route("/users", get(handlers::list_users))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
}
