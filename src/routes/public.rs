use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without any credentials. All list/retrieve routes on
/// articles, comments, likes and profiles are safe methods and therefore
/// open to everyone; the only public writes are the identity gateway
/// (register, login).
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Monitoring/load-balancer check; returns immediately.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // Account creation. Provisions profile, group membership and both
        // tokens atomically.
        .route("/auth/register", post(handlers::register))
        // POST /auth/login
        // Credential check returning the API token + a session token.
        .route("/auth/login", post(handlers::login))
        // GET /articles?category=...&tag=...&search=...
        .route("/articles", get(handlers::list_articles))
        .route("/articles/{id}", get(handlers::get_article))
        // GET /articles/{id}/comments
        // The article's reply forest, threaded.
        .route("/articles/{id}/comments", get(handlers::article_comments))
        .route("/articles/{id}/likes", get(handlers::article_likes))
        // GET /comments?author_id=...
        // The comment collection, threaded the same way.
        .route("/comments", get(handlers::list_comments))
        .route("/comments/{id}", get(handlers::get_comment))
        .route("/likes", get(handlers::list_likes))
        .route("/likes/{id}", get(handlers::get_like))
        .route("/profiles", get(handlers::list_profiles))
        .route("/profiles/{id}", get(handlers::get_profile))
}
