use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod repository;
pub mod validate;

// Module for routing segregation (Public, Authenticated).
pub mod routes;
use auth::AuthUser;
use routes::{authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the entry point and tests.
pub use config::AppConfig;
pub use error::ApiError;
pub use policy::{Action, Actor, Resource, Role, authorize};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation for the application,
/// aggregating every annotated handler and schema. The JSON is served at
/// `/api-docs/openapi.json` behind the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register, handlers::login, handlers::logout, handlers::get_me,
        handlers::list_users, handlers::get_user, handlers::update_user, handlers::delete_user,
        handlers::list_profiles, handlers::get_profile, handlers::update_profile,
        handlers::delete_profile,
        handlers::list_articles, handlers::get_article, handlers::create_article,
        handlers::update_article, handlers::delete_article,
        handlers::article_comments, handlers::article_likes,
        handlers::list_comments, handlers::get_comment, handlers::create_comment,
        handlers::update_comment, handlers::delete_comment,
        handlers::list_likes, handlers::get_like, handlers::create_like, handlers::delete_like,
    ),
    components(
        schemas(
            models::Article, models::ArticleLike, models::ArticleStatus, models::Category,
            models::CommentView, models::CreateArticleRequest, models::CreateCommentRequest,
            models::CreateLikeRequest, models::LoginRequest, models::Profile, models::Reaction,
            models::RegisterRequest, models::RegisterResponse, models::TokenResponse,
            models::UpdateArticleRequest, models::UpdateCommentRequest,
            models::UpdateProfileRequest, models::UpdateUserRequest, models::UserOut,
            comments::CommentNode, error::ErrorBody,
        )
    ),
    tags(
        (name = "blog-engine", description = "Blogging Platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe container holding the application's shared
/// services: the repository trait object and the immutable configuration.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: abstracts all persistence behind a trait object.
    pub repo: RepositoryState,
    /// The loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Let extractors (notably AuthUser) pull individual components out of the
// shared state.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Gate for the authenticated router: extracting `AuthUser` here means a
/// request with no resolvable actor is rejected with 401 before any handler
/// runs. Handlers re-receive the extractor for their policy checks.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the full routing structure, applies global and scoped
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated routes: protected by the extractor middleware.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: span per request with the id attached.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the per-request tracing span: method, URI and the generated
/// x-request-id, so every log line of one request correlates.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
