use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    models::TokenResponse,
    policy::{Actor, Role},
    repository::RepositoryState,
};

/// Session tokens are valid for 24 hours.
pub const SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Claims
///
/// Payload of the signed session token. Besides the standard subject and
/// time claims it embeds the username and the actor's single highest role
/// (superuser > admin > moderator > user), so clients can render without a
/// second round trip. Authorization decisions never trust the embedded
/// role; the extractor resolves the actor's group set fresh from the
/// store on every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: users.id of the account.
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    /// Issued-at, seconds since the epoch.
    pub iat: usize,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// hash_password
///
/// Argon2id with a fresh per-password salt, PHC string output.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(e.to_string()))
}

/// verify_password
///
/// Constant-time verification against a stored PHC string. A malformed
/// stored hash verifies as false rather than erroring out.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
        .is_ok()
}

/// generate_api_token
///
/// Produces the opaque API token persisted alongside an account: 64 hex
/// characters of fresh randomness. Only the store's copy matters; the
/// token carries no structure.
pub fn generate_api_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

/// issue_session_token
///
/// Signs a session token for the resolved actor.
pub fn issue_session_token(actor: &Actor, secret: &str) -> Result<String, ApiError> {
    let now = unix_now();
    let claims = Claims {
        sub: actor.user_id,
        username: actor.username.clone(),
        role: actor.primary_role(),
        iat: now as usize,
        exp: (now + SESSION_TTL_SECS) as usize,
    };
    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// issue_tokens
///
/// Pairs an already-persisted opaque API token with a freshly signed
/// session token. Registration and login both end here.
pub fn issue_tokens(
    actor: &Actor,
    api_token: String,
    secret: &str,
) -> Result<TokenResponse, ApiError> {
    let session_token = issue_session_token(actor, secret)?;
    Ok(TokenResponse {
        api_token,
        session_token,
    })
}

/// decode_session_token
///
/// Validates signature and expiry, returning the embedded claims. Any
/// failure collapses to `Unauthenticated`; callers never learn why a token
/// was rejected.
pub fn decode_session_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthenticated)
}

/// AuthUser
///
/// The resolved authenticated actor, extracted from request headers. The
/// role set is loaded from the store on every request, so a demotion takes
/// effect immediately regardless of what older session tokens claim.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Actor);

/// AuthUser Extractor Implementation
///
/// Accepts either auth scheme:
/// - `Authorization: Bearer <jwt>` (signed session token),
/// - `Authorization: Token <key>` (opaque API token looked up in the store).
///
/// In `Env::Local` only, a bare `x-user-id` header resolves the actor
/// directly, which keeps local development and integration tests free of
/// token plumbing. The id must still map to a real account.
///
/// Rejection: `ApiError::Unauthenticated` (401) on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // Local development bypass.
        if config.env == Env::Local {
            if let Some(user_id) = parts
                .headers
                .get("x-user-id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| Uuid::parse_str(s).ok())
            {
                if let Some(actor) = repo.get_actor(user_id).await? {
                    return Ok(AuthUser(actor));
                }
            }
        }

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let claims = decode_session_token(token, &config.jwt_secret)?;
            // The account must still exist; a token for a deleted user is
            // dead on arrival.
            let actor = repo
                .get_actor(claims.sub)
                .await?
                .ok_or(ApiError::Unauthenticated)?;
            return Ok(AuthUser(actor));
        }

        if let Some(key) = auth_header.strip_prefix("Token ") {
            let actor = repo
                .find_actor_by_api_token(key)
                .await?
                .ok_or(ApiError::Unauthenticated)?;
            return Ok(AuthUser(actor));
        }

        Err(ApiError::Unauthenticated)
    }
}
