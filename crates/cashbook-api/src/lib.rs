//! JSON HTTP API for the cash book
//!
//! Routes are organized into modules:
//! - routes::transactions: transaction CRUD, bulk operations, summary
//! - routes::reports: income statement, balance sheet, cash flow, monthly, forecast
//! - routes::system: health, current user, profile, settings

pub mod auth;
pub mod error;
pub mod routes;

use axum::routing::{get, post};
use axum::Router;
use cashbook_config::Config;
use cashbook_core::Books;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub books: Arc<Books>,
    pub config: Arc<Config>,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::reports::{
        api_balance_sheet, api_cash_flow, api_forecast, api_income_statement, api_monthly_report,
    };
    use routes::system::{
        api_health, api_me, api_profile, api_profile_update, api_reload, api_settings,
    };
    use routes::transactions::{
        api_bulk_create, api_bulk_delete, api_transaction_create, api_transaction_delete,
        api_transaction_detail, api_transaction_summary, api_transaction_update,
        api_transactions,
    };

    Router::new()
        .route("/api/health", get(api_health))
        .route("/api/auth/me", get(api_me))
        .route("/api/profile", get(api_profile).put(api_profile_update))
        .route("/api/settings", get(api_settings))
        .route("/api/reload", post(api_reload))
        // Transactions
        .route(
            "/api/transactions",
            get(api_transactions).post(api_transaction_create),
        )
        .route("/api/transactions/summary", get(api_transaction_summary))
        .route(
            "/api/transactions/bulk",
            post(api_bulk_create).delete(api_bulk_delete),
        )
        .route(
            "/api/transactions/:id",
            get(api_transaction_detail)
                .put(api_transaction_update)
                .delete(api_transaction_delete),
        )
        // Reports
        .route("/api/reports/income-statement", get(api_income_statement))
        .route("/api/reports/balance-sheet", get(api_balance_sheet))
        .route("/api/reports/cash-flow", get(api_cash_flow))
        .route("/api/reports/monthly/:month", get(api_monthly_report))
        .route("/api/forecast", get(api_forecast))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until Ctrl-C
pub async fn start_server(config: Config, books: Arc<Books>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        books,
        config: Arc::new(config),
    };
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Cashbook server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - /api/transactions (Transactions, bulk, summary)");
    log::info!("  - /api/reports/* (Income statement, balance sheet, cash flow, monthly)");
    log::info!("  - /api/forecast (ROI forecast)");
    log::info!("  - /api/health (Store connectivity)");
    log::info!("  - /api/reload (Re-read the store file)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// ==================== Tests ====================
