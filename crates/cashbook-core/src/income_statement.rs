//! Income statement builder

use cashbook_store::Transaction;

use crate::aggregate::CategoryTotals;
use crate::error::{CoreError, CoreResult};
use crate::reports::{IncomeStatement, ReportPeriod};
use crate::time::{month_name, month_range, year_range};
use crate::types::{percent_of, PeriodMode, ReportSettings};

impl ReportPeriod {
    /// Calendar year
    pub fn yearly(year: i32) -> CoreResult<Self> {
        let (start, end) = year_range(year)?;
        Ok(Self {
            mode: PeriodMode::Yearly,
            year,
            month: None,
            start,
            end,
            display: year.to_string(),
        })
    }

    /// One calendar month
    pub fn monthly(year: i32, month: u32) -> CoreResult<Self> {
        let (start, end) = month_range(year, month)?;
        Ok(Self {
            mode: PeriodMode::Monthly,
            year,
            month: Some(month),
            start,
            end,
            display: format!("{} {}", month_name(month), year),
        })
    }

    /// Resolve a period from request parameters; monthly mode needs a month
    pub fn resolve(mode: PeriodMode, year: i32, month: Option<u32>) -> CoreResult<Self> {
        match (mode, month) {
            (PeriodMode::Yearly, _) => Self::yearly(year),
            (PeriodMode::Monthly, Some(month)) => Self::monthly(year, month),
            (PeriodMode::Monthly, None) => Err(CoreError::validation(
                "Month is required for a monthly income statement",
            )),
        }
    }
}

/// Build an income statement from the transactions inside `period`
pub fn build(
    period: ReportPeriod,
    transactions: &[Transaction],
    settings: &ReportSettings,
) -> IncomeStatement {
    let totals = CategoryTotals::from_transactions(transactions);

    let revenue = totals.earn;
    let variable_costs = totals.var;
    let operating_expenses = totals.opex;
    let taxes = totals.tax;

    let gross_profit = revenue - variable_costs;
    let operating_profit = gross_profit - operating_expenses;
    let net_profit = operating_profit - taxes;

    IncomeStatement {
        period,
        currency: settings.currency.clone(),
        revenue,
        variable_costs,
        gross_profit,
        gross_margin: percent_of(gross_profit, revenue),
        operating_expenses,
        operating_profit,
        operating_margin: percent_of(operating_profit, revenue),
        taxes,
        net_profit,
        net_margin: percent_of(net_profit, revenue),
        transaction_count: totals.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::tx;
    use cashbook_store::Category;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_yearly_statement() {
        let period = ReportPeriod::yearly(2025).unwrap();
        let statement = build(
            period,
            &[
                tx("2025-02-01", Category::Earn, 1_000, 0),
                tx("2025-02-02", Category::Var, 0, 300),
                tx("2025-02-03", Category::Opex, 0, 200),
                tx("2025-02-04", Category::Tax, 0, 50),
                tx("2025-02-05", Category::Capex, 0, 900),
                tx("2025-02-06", Category::Fin, 5_000, 0),
            ],
            &ReportSettings::default(),
        );

        assert_eq!(statement.revenue, Decimal::from(1_000));
        assert_eq!(statement.gross_profit, Decimal::from(700));
        assert_eq!(statement.operating_profit, Decimal::from(500));
        assert_eq!(statement.net_profit, Decimal::from(450));
        assert_eq!(
            statement.net_profit,
            statement.gross_profit - statement.operating_expenses - statement.taxes
        );
        assert_eq!(statement.gross_margin, Decimal::from(70));
        assert_eq!(statement.operating_margin, Decimal::from(50));
        assert_eq!(statement.net_margin, Decimal::from(45));
        assert_eq!(statement.transaction_count, 6);
        assert_eq!(statement.currency, "IDR");
    }

    #[test]
    fn test_margins_zero_without_revenue() {
        let statement = build(
            ReportPeriod::yearly(2025).unwrap(),
            &[tx("2025-03-01", Category::Opex, 0, 400)],
            &ReportSettings::default(),
        );
        assert_eq!(statement.net_profit, Decimal::from(-400));
        assert_eq!(statement.gross_margin, Decimal::ZERO);
        assert_eq!(statement.operating_margin, Decimal::ZERO);
        assert_eq!(statement.net_margin, Decimal::ZERO);
    }

    #[test]
    fn test_empty_month_is_zero() {
        let statement = build(
            ReportPeriod::monthly(2025, 2).unwrap(),
            &[],
            &ReportSettings::default(),
        );
        assert_eq!(statement.revenue, Decimal::ZERO);
        assert_eq!(statement.net_profit, Decimal::ZERO);
        assert_eq!(statement.net_margin, Decimal::ZERO);
        assert_eq!(statement.transaction_count, 0);
    }

    #[test]
    fn test_margin_rounding() {
        let statement = build(
            ReportPeriod::yearly(2025).unwrap(),
            &[
                tx("2025-01-01", Category::Earn, 3, 0),
                tx("2025-01-01", Category::Var, 0, 1),
            ],
            &ReportSettings::default(),
        );
        assert_eq!(statement.gross_margin, Decimal::new(6667, 2));
    }

    #[test]
    fn test_period_resolution() {
        let period = ReportPeriod::resolve(PeriodMode::Monthly, 2024, Some(2)).unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(period.display, "February 2024");

        let yearly = ReportPeriod::resolve(PeriodMode::Yearly, 2025, Some(13)).unwrap();
        assert_eq!(yearly.month, None);
        assert_eq!(yearly.display, "2025");

        assert!(ReportPeriod::resolve(PeriodMode::Monthly, 2025, None).is_err());
        assert!(ReportPeriod::resolve(PeriodMode::Monthly, 2025, Some(13)).is_err());
        assert!(ReportPeriod::resolve(PeriodMode::Monthly, 2025, Some(0)).is_err());
    }
}
