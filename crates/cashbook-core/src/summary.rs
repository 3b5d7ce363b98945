//! Monthly report and yearly transaction summary

use cashbook_store::Transaction;

use crate::aggregate::{daily_flows, CategoryTotals, MonthlyFlows};
use crate::reports::{MonthlyIncomeExpense, MonthlyReport, MonthlySummary, TransactionSummary};
use crate::time::month_name;
use crate::types::{percent_of, ReportSettings};

/// Detail for one month; `transactions` should already be date-ascending
pub fn monthly_report(
    year: i32,
    month: u32,
    transactions: Vec<Transaction>,
    settings: &ReportSettings,
) -> MonthlyReport {
    let totals = CategoryTotals::from_transactions(&transactions);
    let daily_breakdown = daily_flows(&transactions);

    MonthlyReport {
        year,
        month,
        month_name: month_name(month).to_string(),
        currency: settings.currency.clone(),
        summary: MonthlySummary {
            earn: totals.earn,
            opex: totals.opex,
            var: totals.var,
            capex: totals.capex,
            tax: totals.tax,
            fin: totals.fin,
            total_income: totals.total_income,
            total_expense: totals.total_expense,
            net_profit: totals.earn - totals.opex - totals.var - totals.tax,
            cash_flow: totals.net_cash(),
        },
        transaction_count: totals.count,
        transactions,
        daily_breakdown,
    }
}

/// Category totals and monthly income/expense for a year
pub fn transaction_summary(
    year: i32,
    transactions: &[Transaction],
    settings: &ReportSettings,
) -> TransactionSummary {
    let totals = CategoryTotals::from_transactions(transactions);
    let gross_profit = totals.earn - totals.var;
    let net_profit = totals.earn - totals.opex - totals.var - totals.tax;

    let monthly = MonthlyFlows::from_transactions(transactions)
        .months()
        .iter()
        .map(|m| MonthlyIncomeExpense {
            month: m.month,
            income: m.inflow,
            expense: m.outflow,
        })
        .collect();

    TransactionSummary {
        year,
        currency: settings.currency.clone(),
        earn: totals.earn,
        opex: totals.opex,
        var: totals.var,
        capex: totals.capex,
        tax: totals.tax,
        fin: totals.fin,
        total_income: totals.total_income,
        total_expense: totals.total_expense,
        gross_profit,
        net_profit,
        gross_margin: percent_of(gross_profit, totals.earn),
        net_margin: percent_of(net_profit, totals.earn),
        cash_balance: totals.net_cash(),
        transaction_count: totals.count,
        monthly,
    }
}
