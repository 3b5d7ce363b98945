//! Cash flow statement builder

use cashbook_store::Transaction;
use rust_decimal::Decimal;

use crate::aggregate::{CategoryTotals, MonthlyFlows};
use crate::reports::{
    CashFlowStatement, FinancingActivities, InvestingActivities, MonthlyCashFlow,
    OperatingActivities,
};
use crate::types::ReportSettings;

/// Cash on hand before the first day of a year
pub fn opening_balance(prior: &[Transaction], settings: &ReportSettings) -> Decimal {
    settings.initial_capital + CategoryTotals::from_transactions(prior).net_cash()
}

/// Build the statement for `year`.
///
/// `prior` holds every transaction dated before the year, `current` the
/// ones inside it.
pub fn build(
    year: i32,
    prior: &[Transaction],
    current: &[Transaction],
    settings: &ReportSettings,
) -> CashFlowStatement {
    let opening_balance = opening_balance(prior, settings);
    let totals = CategoryTotals::from_transactions(current);

    let operating_outflow = totals.opex + totals.var + totals.tax;
    let operating = OperatingActivities {
        inflow: totals.earn,
        outflow: operating_outflow,
        net_cash_flow: totals.earn - operating_outflow,
    };
    let investing = InvestingActivities {
        outflow: totals.capex,
        net_cash_flow: -totals.capex,
    };
    let financing = FinancingActivities {
        net_cash_flow: totals.fin,
    };

    let net_cash_flow =
        operating.net_cash_flow + investing.net_cash_flow + financing.net_cash_flow;

    let monthly = MonthlyFlows::from_transactions(current)
        .months()
        .iter()
        .map(|m| MonthlyCashFlow {
            month: m.month,
            inflow: m.inflow,
            outflow: m.outflow,
            net_flow: m.net(),
        })
        .collect();

    CashFlowStatement {
        year,
        currency: settings.currency.clone(),
        opening_balance,
        operating,
        investing,
        financing,
        net_cash_flow,
        closing_balance: opening_balance + net_cash_flow,
        monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::tx;
    use cashbook_store::Category;

    fn settings() -> ReportSettings {
        ReportSettings::default().with_initial_capital(Decimal::from(100_000))
    }

    #[test]
    fn test_sections() {
        let prior = [
            tx("2024-06-01", Category::Earn, 20_000, 0),
            tx("2024-07-01", Category::Opex, 0, 5_000),
        ];
        let current = [
            tx("2025-01-10", Category::Earn, 8_000, 0),
            tx("2025-01-11", Category::Opex, 0, 1_000),
            tx("2025-02-01", Category::Var, 0, 500),
            tx("2025-02-02", Category::Tax, 0, 300),
            tx("2025-03-01", Category::Capex, 0, 2_000),
            tx("2025-04-01", Category::Fin, 10_000, 1_000),
        ];
        let statement = build(2025, &prior, &current, &settings());

        assert_eq!(statement.opening_balance, Decimal::from(115_000));
        assert_eq!(statement.operating.inflow, Decimal::from(8_000));
        assert_eq!(statement.operating.outflow, Decimal::from(1_800));
        assert_eq!(statement.operating.net_cash_flow, Decimal::from(6_200));
        assert_eq!(statement.investing.net_cash_flow, Decimal::from(-2_000));
        assert_eq!(statement.financing.net_cash_flow, Decimal::from(9_000));
        assert_eq!(statement.net_cash_flow, Decimal::from(13_200));
        assert_eq!(statement.closing_balance, Decimal::from(128_200));
        assert_eq!(
            statement.closing_balance,
            statement.opening_balance + statement.net_cash_flow
        );
    }

    #[test]
    fn test_monthly_breakdown() {
        let current = [
            tx("2025-01-10", Category::Earn, 8_000, 0),
            tx("2025-01-11", Category::Opex, 0, 1_000),
            tx("2025-12-31", Category::Fin, 0, 400),
        ];
        let statement = build(2025, &[], &current, &settings());

        assert_eq!(statement.monthly.len(), 12);
        assert_eq!(statement.monthly[0].month, 1);
        assert_eq!(statement.monthly[0].net_flow, Decimal::from(7_000));
        assert_eq!(statement.monthly[11].month, 12);
        assert_eq!(statement.monthly[11].outflow, Decimal::from(400));
        let monthly_net: Decimal = statement.monthly.iter().map(|m| m.net_flow).sum();
        assert_eq!(monthly_net, statement.net_cash_flow);
    }

    #[test]
    fn test_empty_year() {
        let statement = build(2025, &[], &[], &settings());
        assert_eq!(statement.opening_balance, Decimal::from(100_000));
        assert_eq!(statement.net_cash_flow, Decimal::ZERO);
        assert_eq!(statement.closing_balance, Decimal::from(100_000));
        assert!(statement.monthly.iter().all(|m| m.net_flow == Decimal::ZERO));
    }
}
