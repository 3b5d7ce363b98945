//! System API endpoints - health, identity, profile, reload and settings

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::routes::ok;
use crate::AppState;

/// Store connectivity; no authentication
pub async fn api_health(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.books.health().await)
}

/// The authenticated user and their profile record
pub async fn api_me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let profile = state.books.profile(&user.user.id).await?;
    Ok(ok(json!({
        "user": {
            "id": user.user.id,
            "email": user.user.email,
        },
        "profile": profile,
    })))
}

pub async fn api_profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let profile = state.books.update_profile(&user.actor, None).await?;
    Ok(ok(json!({ "profile": profile })))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
}

pub async fn api_profile_update(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(update) = payload?;
    let profile = state
        .books
        .update_profile(&user.actor, update.full_name)
        .await?;
    Ok(ok(json!({ "profile": profile })))
}

/// Re-read the store file; operators only
pub async fn api_reload(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ok(state.books.reload(&user.actor).await?))
}

/// Business settings used by the reports
pub async fn api_settings(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<impl IntoResponse> {
    Ok(ok(state.books.settings().clone()))
}
