use async_trait::async_trait;
use axum::http::{header, HeaderMap};

use super::domain::UserId;

/// Resolves bearer tokens to users. Token validation and sessions live outside the catalog.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the token has no live session.
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a request could not be tied to a user.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed authorization header")]
    MalformedToken,
    #[error("no session for the given token")]
    UnknownSession,
    #[error(transparent)]
    Provider(#[from] IdentityError),
}

/// Authenticate a request from its `Authorization: Bearer <token>` header.
pub async fn authenticate<I>(identity: &I, headers: &HeaderMap) -> Result<UserId, AuthError>
where
    I: IdentityProvider + ?Sized,
{
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedToken)?;

    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
        _ => return Err(AuthError::MalformedToken),
    };
    if token.is_empty() {
        return Err(AuthError::MalformedToken);
    }

    identity
        .resolve(token)
        .await?
        .ok_or(AuthError::UnknownSession)
}
