//! Transactions API endpoints - JSON API
//!
//! Endpoints:
//! - api_transactions: filtered list, newest first
//! - api_transaction_summary: yearly category summary
//! - api_transaction_detail / update / delete: single record by id
//! - api_transaction_create, api_bulk_create: operator writes
//! - api_bulk_delete: by ids, or by category within a year

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use cashbook_core::{BulkCreateRequest, BulkDeleteRequest, TransactionFilter, TransactionInput};
use serde_json::json;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::routes::{created, ok, YearQuery};
use crate::AppState;

pub async fn api_transactions(
    State(state): State<AppState>,
    _user: CurrentUser,
    filter: Result<Query<TransactionFilter>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(filter) = filter?;
    let listing = state.books.list_transactions(&filter).await?;
    Ok(ok(listing))
}

pub async fn api_transaction_summary(
    State(state): State<AppState>,
    _user: CurrentUser,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let year = state.books.year_or_current(query.year);
    Ok(ok(state.books.transaction_summary(year).await?))
}

pub async fn api_transaction_detail(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let transaction = state.books.transaction(&id).await?;
    Ok(ok(json!({ "transaction": transaction })))
}

pub async fn api_transaction_create(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    state
        .books
        .authorize_write(&user.actor, "create_transaction")?;
    let Json(input) = payload?;
    let transaction = state.books.create_transaction(&user.actor, input).await?;
    Ok(created(json!({ "transaction": transaction })))
}

pub async fn api_transaction_update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<TransactionInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    state
        .books
        .authorize_write(&user.actor, "update_transaction")?;
    let Json(input) = payload?;
    let transaction = state
        .books
        .update_transaction(&user.actor, &id, input)
        .await?;
    Ok(ok(json!({ "transaction": transaction })))
}

pub async fn api_transaction_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let result = state.books.delete_transaction(&user.actor, &id).await?;
    Ok(ok(result))
}

pub async fn api_bulk_create(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<BulkCreateRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    state
        .books
        .authorize_write(&user.actor, "create_transactions")?;
    let Json(request) = payload?;
    let transactions = state
        .books
        .create_transactions(&user.actor, request.transactions)
        .await?;
    Ok(created(json!({
        "count": transactions.len(),
        "transactions": transactions,
    })))
}

pub async fn api_bulk_delete(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<Json<BulkDeleteRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    state
        .books
        .authorize_write(&user.actor, "delete_transactions")?;
    let Json(request) = payload?;
    let result = state
        .books
        .delete_transactions(&user.actor, request)
        .await?;
    Ok(ok(result))
}
