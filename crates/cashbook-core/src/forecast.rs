//! ROI and annual projection from year-to-date actuals

use cashbook_store::Transaction;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::MonthlyFlows;
use crate::reports::{
    AnnualProjection, Forecast, ForecastMonth, InvestmentMetrics, MonthlyAverages, YearToDate,
};
use crate::types::{percent_of, round_percent, round_whole, ReportSettings};

const MONTHS_PER_YEAR: u32 = 12;
const HALF_YEAR: u32 = 6;

/// Build a forecast for `year` from its transactions.
///
/// `months_elapsed` is how many leading months count as observed (0..=12).
pub fn build(
    year: i32,
    transactions: &[Transaction],
    months_elapsed: u32,
    settings: &ReportSettings,
) -> Forecast {
    let months_elapsed = months_elapsed.min(MONTHS_PER_YEAR);
    let initial_capital = settings.initial_capital;

    let monthly_data: Vec<ForecastMonth> = MonthlyFlows::from_transactions(transactions)
        .months()
        .iter()
        .map(|m| ForecastMonth {
            month: m.month,
            revenue: m.revenue,
            expense: m.outflow,
            profit: m.revenue - m.outflow,
        })
        .collect();

    let observed = &monthly_data[..months_elapsed as usize];
    let ytd_revenue: Decimal = observed.iter().map(|m| m.revenue).sum();
    let ytd_expense: Decimal = observed.iter().map(|m| m.expense).sum();
    let ytd_profit = ytd_revenue - ytd_expense;

    let per_month = |total: Decimal| {
        if months_elapsed > 0 {
            total / Decimal::from(months_elapsed)
        } else {
            Decimal::ZERO
        }
    };
    let avg_revenue = per_month(ytd_revenue);
    let avg_expense = per_month(ytd_expense);
    let avg_profit = per_month(ytd_profit);

    let months_per_year = Decimal::from(MONTHS_PER_YEAR);
    let annual_profit = avg_profit * months_per_year;

    let payback_period_months = payback_months(initial_capital, avg_profit);

    Forecast {
        year,
        currency: settings.currency.clone(),
        initial_capital,
        ytd: YearToDate {
            months_elapsed,
            revenue: ytd_revenue,
            expense: ytd_expense,
            profit: ytd_profit,
            roi: percent_of(ytd_profit, initial_capital),
        },
        averages: MonthlyAverages {
            revenue: round_whole(avg_revenue),
            expense: round_whole(avg_expense),
            profit: round_whole(avg_profit),
        },
        projections: AnnualProjection {
            annual_revenue: round_whole(avg_revenue * months_per_year),
            annual_expense: round_whole(avg_expense * months_per_year),
            annual_profit: round_whole(annual_profit),
            annualized_roi: percent_of(annual_profit, initial_capital),
        },
        metrics: InvestmentMetrics {
            payback_period_months,
            break_even_months: payback_period_months,
            growth_trend: growth_trend(&monthly_data, months_elapsed),
        },
        monthly_data,
    }
}

/// Months of average profit needed to recover the initial capital.
///
/// Saturates at `u64::MAX` when the quotient does not fit.
pub fn payback_months(initial_capital: Decimal, avg_profit: Decimal) -> Option<u64> {
    if avg_profit <= Decimal::ZERO {
        return None;
    }
    let months = initial_capital
        .checked_div(avg_profit)
        .and_then(|quotient| quotient.ceil().to_u64())
        .unwrap_or(u64::MAX);
    Some(months)
}

/// Second-half revenue, scaled to six months, against the first half
fn growth_trend(monthly_data: &[ForecastMonth], months_elapsed: u32) -> Decimal {
    if months_elapsed <= HALF_YEAR {
        return Decimal::ZERO;
    }
    let first_half: Decimal = monthly_data
        .iter()
        .take(HALF_YEAR as usize)
        .map(|m| m.revenue)
        .sum();
    if first_half <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let h2_months = (months_elapsed - HALF_YEAR).min(HALF_YEAR);
    let second_half: Decimal = monthly_data
        .iter()
        .skip(HALF_YEAR as usize)
        .take(h2_months as usize)
        .map(|m| m.revenue)
        .sum();
    let normalized = second_half / Decimal::from(h2_months) * Decimal::from(HALF_YEAR);

    round_percent((normalized - first_half) / first_half * Decimal::ONE_HUNDRED)
}
