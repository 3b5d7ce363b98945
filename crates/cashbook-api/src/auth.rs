//! Bearer token authentication
//!
//! Tokens are looked up in the configured user list; the caller's role
//! comes from their profile record in the store.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use cashbook_config::UserConfig;
use cashbook_core::{Actor, CoreError};

use crate::error::ApiError;
use crate::AppState;

/// The authenticated caller of a request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: UserConfig,
    pub actor: Actor,
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(user) = bearer_token(&parts.headers)
            .and_then(|token| state.config.user_by_token(token))
        else {
            log::debug!("Rejected unauthenticated request to {}", parts.uri.path());
            return Err(CoreError::Unauthenticated.into());
        };

        let actor = state.books.actor(&user.id, &user.email).await?;
        Ok(CurrentUser {
            user: user.clone(),
            actor,
        })
    }
}
