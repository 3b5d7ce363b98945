//! Report structures for API responses

use cashbook_store::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::DayFlow;
use crate::types::PeriodMode;

// ==================== Income Statement ====================

/// Period covered by an income statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub mode: PeriodMode,
    pub year: i32,
    /// 1-based month, monthly mode only
    pub month: Option<u32>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// e.g. "June 2025" or "2025"
    pub display: String,
}

/// Profit and loss for a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub period: ReportPeriod,
    pub currency: String,
    pub revenue: Decimal,
    pub variable_costs: Decimal,
    pub gross_profit: Decimal,
    /// Percent, 2 decimals
    pub gross_margin: Decimal,
    pub operating_expenses: Decimal,
    pub operating_profit: Decimal,
    pub operating_margin: Decimal,
    pub taxes: Decimal,
    pub net_profit: Decimal,
    pub net_margin: Decimal,
    pub transaction_count: usize,
}

// ==================== Balance Sheet ====================

/// Where the fixed asset figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedAssetSource {
    /// Sum of the asset register
    AssetRegister,
    /// CAPEX spending used in place of an empty or unreachable register
    CapexProxy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceAssets {
    pub cash: Decimal,
    pub fixed_assets: Decimal,
    pub fixed_asset_source: FixedAssetSource,
    pub total_assets: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLiabilities {
    pub total_liabilities: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceEquity {
    pub initial_capital: Decimal,
    pub retained_earnings: Decimal,
    pub total_equity: Decimal,
}

/// Financial position at year end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub year: i32,
    pub as_of: NaiveDate,
    pub currency: String,
    pub assets: BalanceAssets,
    pub liabilities: BalanceLiabilities,
    pub equity: BalanceEquity,
    /// Assets equal liabilities plus equity within tolerance
    pub is_balanced: bool,
}

// ==================== Cash Flow ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingActivities {
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net_cash_flow: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestingActivities {
    pub outflow: Decimal,
    pub net_cash_flow: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingActivities {
    pub net_cash_flow: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCashFlow {
    pub month: u32,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net_flow: Decimal,
}

/// Sources and uses of cash for a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub year: i32,
    pub currency: String,
    pub opening_balance: Decimal,
    pub operating: OperatingActivities,
    pub investing: InvestingActivities,
    pub financing: FinancingActivities,
    pub net_cash_flow: Decimal,
    pub closing_balance: Decimal,
    pub monthly: Vec<MonthlyCashFlow>,
}

// ==================== Forecast ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearToDate {
    pub months_elapsed: u32,
    pub revenue: Decimal,
    pub expense: Decimal,
    pub profit: Decimal,
    /// Percent of initial capital, 2 decimals
    pub roi: Decimal,
}

/// Monthly averages, whole currency units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverages {
    pub revenue: Decimal,
    pub expense: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualProjection {
    pub annual_revenue: Decimal,
    pub annual_expense: Decimal,
    pub annual_profit: Decimal,
    pub annualized_roi: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// `None` when the average month is not profitable
    pub payback_period_months: Option<u64>,
    pub break_even_months: Option<u64>,
    /// Second-half revenue rate against the first half, percent
    pub growth_trend: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    pub month: u32,
    pub revenue: Decimal,
    pub expense: Decimal,
    pub profit: Decimal,
}

/// ROI and full-year projection from year-to-date actuals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub year: i32,
    pub currency: String,
    pub initial_capital: Decimal,
    pub ytd: YearToDate,
    pub averages: MonthlyAverages,
    pub projections: AnnualProjection,
    pub metrics: InvestmentMetrics,
    pub monthly_data: Vec<ForecastMonth>,
}

// ==================== Monthly Report ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub earn: Decimal,
    pub opex: Decimal,
    pub var: Decimal,
    pub capex: Decimal,
    pub tax: Decimal,
    pub fin: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// earn - opex - var - tax
    pub net_profit: Decimal,
    /// total_income - total_expense
    pub cash_flow: Decimal,
}

/// One month in detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub currency: String,
    pub summary: MonthlySummary,
    pub transaction_count: usize,
    pub transactions: Vec<Transaction>,
    pub daily_breakdown: BTreeMap<NaiveDate, DayFlow>,
}

// ==================== Transaction Summary ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncomeExpense {
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Dashboard summary for a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub year: i32,
    pub currency: String,
    pub earn: Decimal,
    pub opex: Decimal,
    pub var: Decimal,
    pub capex: Decimal,
    pub tax: Decimal,
    pub fin: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub gross_margin: Decimal,
    pub net_margin: Decimal,
    pub cash_balance: Decimal,
    pub transaction_count: usize,
    pub monthly: Vec<MonthlyIncomeExpense>,
}

/// Paged transaction listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
}

/// Outcome of a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted: usize,
    pub message: String,
}

/// Outcome of re-reading the store file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReloadResult {
    pub transactions: usize,
    pub message: String,
}
