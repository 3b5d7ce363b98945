//! Record types held by the store

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction category code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// Revenue inflow
    Earn,
    /// Fixed operating expense
    Opex,
    /// Variable cost tied to production
    Var,
    /// Capital expenditure (asset purchase)
    Capex,
    /// Tax expense
    Tax,
    /// Financing inflow/outflow
    Fin,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Earn,
        Category::Opex,
        Category::Var,
        Category::Capex,
        Category::Tax,
        Category::Fin,
    ];

    /// Comma separated list of the codes, for error messages
    pub fn codes() -> String {
        Self::ALL
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EARN" => Ok(Category::Earn),
            "OPEX" => Ok(Category::Opex),
            "VAR" => Ok(Category::Var),
            "CAPEX" => Ok(Category::Capex),
            "TAX" => Ok(Category::Tax),
            "FIN" => Ok(Category::Fin),
            _ => Err(format!(
                "Invalid category '{}'. Must be one of: {}",
                s,
                Category::codes()
            )),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Earn => write!(f, "EARN"),
            Category::Opex => write!(f, "OPEX"),
            Category::Var => write!(f, "VAR"),
            Category::Capex => write!(f, "CAPEX"),
            Category::Tax => write!(f, "TAX"),
            Category::Fin => write!(f, "FIN"),
        }
    }
}

/// Profile role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May create, edit and delete transactions
    Operator,
    /// Read-only access
    Viewer,
}

impl Default for Role {
    fn default() -> Self {
        Role::Viewer
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operator" => Ok(Role::Operator),
            "viewer" => Ok(Role::Viewer),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Operator => write!(f, "operator"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

/// A recorded cash event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned by the store
    pub id: String,
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    pub income: Decimal,
    pub expense: Decimal,
    /// Bank or channel the money moved through
    pub account: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Operator who recorded it
    #[serde(default)]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A validated transaction waiting for an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub category: Category,
    pub description: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub account: String,
    pub notes: Option<String>,
    pub user_id: Option<String>,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub income: Option<Decimal>,
    pub expense: Option<Decimal>,
    pub account: Option<String>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn apply(self, tx: &mut Transaction) {
        if let Some(date) = self.date {
            tx.date = date;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(description) = self.description {
            tx.description = description;
        }
        if let Some(income) = self.income {
            tx.income = income;
        }
        if let Some(expense) = self.expense {
            tx.expense = expense;
        }
        if let Some(account) = self.account {
            tx.account = account;
        }
        if let Some(notes) = self.notes {
            tx.notes = notes;
        }
    }
}

/// Fixed asset register entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub item_name: String,
    pub asset_type: String,
    pub purchase_date: NaiveDate,
    pub purchase_price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    #[serde(default = "default_asset_status")]
    pub status: String,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

fn default_asset_status() -> String {
    "active".to_string()
}

impl Asset {
    /// Book value: purchase price times quantity
    pub fn value(&self) -> Decimal {
        self.purchase_price * self.quantity
    }
}

/// User profile holding the role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Sort direction by date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateOrder {
    #[default]
    Descending,
    Ascending,
}

/// Transaction filter; date bounds are inclusive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<Category>,
    pub limit: Option<usize>,
    pub offset: usize,
    pub order: DateOrder,
}

impl TransactionQuery {
    /// Transactions dated within `[from, to]`
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Everything dated on or before `to`
    pub fn through(to: NaiveDate) -> Self {
        Self {
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn ascending(mut self) -> Self {
        self.order = DateOrder::Ascending;
        self
    }

    pub fn page(mut self, limit: Option<usize>, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Check if a transaction passes the date and category filters
    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(from) = self.from {
            if tx.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if tx.date > to {
                return false;
            }
        }
        match self.category {
            Some(category) => tx.category == category,
            None => true,
        }
    }
}
