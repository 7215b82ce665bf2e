//! Actor extractors backed by the authentication middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::domain::Actor;
use crate::errors::AppError;

/// The requester, possibly anonymous.
///
/// Falls back to `Actor::Anonymous` when the middleware did not run.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Actor);

/// A signed-in requester; anonymous requests are rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts.extensions.get::<Actor>().copied().unwrap_or_default();
        Ok(MaybeUser(actor))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Actor>().copied() {
            Some(actor @ Actor::Authenticated { .. }) => Ok(CurrentUser(actor)),
            _ => Err(AppError::Unauthorized),
        }
    }
}
