//! Basic types shared by the report builders

use cashbook_config::BusinessConfig;
use cashbook_store::Role;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Settings injected into every report builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Owner's starting investment
    pub initial_capital: Decimal,
    pub currency: String,
    /// Accepted gap for the balance sheet check
    pub balance_tolerance: Decimal,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from(&BusinessConfig::default())
    }
}

impl From<&BusinessConfig> for ReportSettings {
    fn from(config: &BusinessConfig) -> Self {
        Self {
            initial_capital: config.initial_capital,
            currency: config.currency.clone(),
            balance_tolerance: config.balance_tolerance,
        }
    }
}

impl ReportSettings {
    pub fn with_initial_capital(mut self, initial_capital: Decimal) -> Self {
        self.initial_capital = initial_capital;
        self
    }
}

/// Income statement period mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodMode {
    Monthly,
    Yearly,
}

impl Default for PeriodMode {
    fn default() -> Self {
        PeriodMode::Yearly
    }
}

impl std::str::FromStr for PeriodMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(PeriodMode::Monthly),
            "yearly" | "year" => Ok(PeriodMode::Yearly),
            _ => Err(format!("Invalid period '{}'. Must be monthly or yearly", s)),
        }
    }
}

impl std::fmt::Display for PeriodMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeriodMode::Monthly => write!(f, "monthly"),
            PeriodMode::Yearly => write!(f, "yearly"),
        }
    }
}

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: String,
    pub email: String,
    /// Role from the profile record; `None` when no profile exists
    pub role: Option<Role>,
}

impl Actor {
    pub fn is_operator(&self) -> bool {
        self.role == Some(Role::Operator)
    }
}

// ==================== Rounding ====================

/// `part / whole * 100`, or zero when `whole` is not positive.
///
/// A ratio too large for `Decimal` saturates at `Decimal::MAX` or `Decimal::MIN`.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(round_percent)
        .unwrap_or(if part.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Two decimal places, halves away from zero
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole currency units, halves away from zero
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
