//! Report routes - financial statements and forecast

pub mod api;

pub use api::{
    api_balance_sheet, api_cash_flow, api_forecast, api_income_statement, api_monthly_report,
};
