//! Route modules for the API server
//!
//! - transactions: CRUD, bulk operations and the yearly summary
//! - reports: financial statements, monthly report and forecast
//! - system: health, identity, profile and settings

pub mod reports;
pub mod system;
pub mod transactions;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// 200 with the data wrapped in the success envelope
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

/// 201 with the data wrapped in the success envelope
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// `?year=` on its own
#[derive(Debug, Clone, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}
