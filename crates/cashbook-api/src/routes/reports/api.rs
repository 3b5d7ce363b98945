//! Reports API endpoints - JSON API

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use cashbook_core::{CoreError, PeriodMode};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::routes::{ok, YearQuery};
use crate::AppState;

/// `?year=&period=monthly|yearly&month=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomeStatementQuery {
    pub year: Option<i32>,
    pub period: Option<String>,
    pub month: Option<u32>,
}

pub async fn api_income_statement(
    State(state): State<AppState>,
    _user: CurrentUser,
    query: Result<Query<IncomeStatementQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let mode = match query.period.as_deref() {
        Some(period) => period
            .parse::<PeriodMode>()
            .map_err(CoreError::validation)?,
        None => PeriodMode::default(),
    };
    let year = state.books.year_or_current(query.year);
    let statement = state
        .books
        .income_statement(year, mode, query.month)
        .await?;
    Ok(ok(statement))
}

pub async fn api_balance_sheet(
    State(state): State<AppState>,
    _user: CurrentUser,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let year = state.books.year_or_current(query.year);
    Ok(ok(state.books.balance_sheet(year).await?))
}

pub async fn api_cash_flow(
    State(state): State<AppState>,
    _user: CurrentUser,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let year = state.books.year_or_current(query.year);
    Ok(ok(state.books.cash_flow(year).await?))
}

pub async fn api_monthly_report(
    State(state): State<AppState>,
    _user: CurrentUser,
    month: Result<Path<u32>, PathRejection>,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Path(month) = month.map_err(|_| CoreError::validation("Invalid month. Must be 1-12"))?;
    let Query(query) = query?;
    let year = state.books.year_or_current(query.year);
    Ok(ok(state.books.monthly_report(year, month).await?))
}

pub async fn api_forecast(
    State(state): State<AppState>,
    _user: CurrentUser,
    query: Result<Query<YearQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let year = state.books.year_or_current(query.year);
    Ok(ok(state.books.forecast(year).await?))
}
