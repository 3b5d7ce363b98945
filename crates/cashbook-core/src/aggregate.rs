//! Category aggregation
//!
//! Reduces transactions into per-category totals, a 12-slot monthly
//! breakdown and a per-day breakdown. Every function here is a pure fold,
//! so results do not depend on input order.

use cashbook_store::{Category, Transaction};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which side of a transaction feeds its category bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationRule {
    /// Sum `income`
    Income,
    /// Sum `expense`
    Expense,
    /// Sum `income - expense`
    Net,
}

impl AggregationRule {
    /// Rule table for the category codes
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Earn => AggregationRule::Income,
            Category::Opex | Category::Var | Category::Capex | Category::Tax => {
                AggregationRule::Expense
            }
            Category::Fin => AggregationRule::Net,
        }
    }

    /// Amount this rule extracts from a transaction
    pub fn amount(self, tx: &Transaction) -> Decimal {
        match self {
            AggregationRule::Income => tx.income,
            AggregationRule::Expense => tx.expense,
            AggregationRule::Net => tx.income - tx.expense,
        }
    }
}

/// Totals per category code plus raw income/expense sums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Revenue (EARN income)
    pub earn: Decimal,
    pub opex: Decimal,
    pub var: Decimal,
    pub capex: Decimal,
    pub tax: Decimal,
    /// Financing net (FIN income - expense)
    pub fin: Decimal,
    /// Income across every category
    pub total_income: Decimal,
    /// Expense across every category
    pub total_expense: Decimal,
    pub count: usize,
}

impl CategoryTotals {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Self::default(), |mut totals, tx| {
                totals.add(tx);
                totals
            })
    }

    pub fn add(&mut self, tx: &Transaction) {
        let amount = AggregationRule::for_category(tx.category).amount(tx);
        *self.bucket_mut(tx.category) += amount;
        self.total_income += tx.income;
        self.total_expense += tx.expense;
        self.count += 1;
    }

    /// Bucket value for a category
    pub fn get(&self, category: Category) -> Decimal {
        match category {
            Category::Earn => self.earn,
            Category::Opex => self.opex,
            Category::Var => self.var,
            Category::Capex => self.capex,
            Category::Tax => self.tax,
            Category::Fin => self.fin,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Decimal {
        match category {
            Category::Earn => &mut self.earn,
            Category::Opex => &mut self.opex,
            Category::Var => &mut self.var,
            Category::Capex => &mut self.capex,
            Category::Tax => &mut self.tax,
            Category::Fin => &mut self.fin,
        }
    }

    /// `total_income - total_expense`
    pub fn net_cash(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

/// One month of cash movement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthFlow {
    /// 1-based month number
    pub month: u32,
    /// Σ income, all categories
    pub inflow: Decimal,
    /// Σ expense, all categories
    pub outflow: Decimal,
    /// Σ EARN income
    pub revenue: Decimal,
}

impl MonthFlow {
    pub fn net(&self) -> Decimal {
        self.inflow - self.outflow
    }
}

/// Twelve monthly slots, January first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFlows {
    months: Vec<MonthFlow>,
}

impl Default for MonthlyFlows {
    fn default() -> Self {
        Self {
            months: (1..=12)
                .map(|month| MonthFlow {
                    month,
                    ..MonthFlow::default()
                })
                .collect(),
        }
    }
}

impl MonthlyFlows {
    /// Bucket transactions by calendar month, ignoring the year
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut flows = Self::default();
        for tx in transactions {
            let slot = &mut flows.months[tx.date.month0() as usize];
            slot.inflow += tx.income;
            slot.outflow += tx.expense;
            if AggregationRule::for_category(tx.category) == AggregationRule::Income {
                slot.revenue += tx.income;
            }
        }
        flows
    }

    pub fn months(&self) -> &[MonthFlow] {
        &self.months
    }

    /// Slot for a 1-based month
    pub fn month(&self, month: u32) -> Option<&MonthFlow> {
        month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
    }
}

/// Income and expense for one calendar day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayFlow {
    pub income: Decimal,
    pub expense: Decimal,
}

/// Per-day totals, ordered by date
pub fn daily_flows<'a, I>(transactions: I) -> BTreeMap<NaiveDate, DayFlow>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut days: BTreeMap<NaiveDate, DayFlow> = BTreeMap::new();
    for tx in transactions {
        let day = days.entry(tx.date).or_default();
        day.income += tx.income;
        day.expense += tx.expense;
    }
    days
}

// ==================== Tests ====================
