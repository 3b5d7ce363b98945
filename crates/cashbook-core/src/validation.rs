//! Request payloads and their validation
//!
//! Payload fields are all optional so that a missing field surfaces as a
//! validation error with a readable message instead of a JSON rejection.

use cashbook_store::{Category, NewTransaction, TransactionPatch, TransactionQuery};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::time::{month_range, validate_month, year_range};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted income or expense; report totals stay far from `Decimal::MAX`
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Body of a create or update request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub income: Option<Decimal>,
    #[serde(default)]
    pub expense: Option<Decimal>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TransactionInput {
    /// Validate a complete record; `user_id` is the creating operator
    pub fn into_new(self, user_id: Option<String>) -> CoreResult<NewTransaction> {
        let (Some(date), Some(category), Some(description), Some(account)) = (
            non_empty(self.date),
            non_empty(self.category),
            non_empty(self.description),
            non_empty(self.account),
        ) else {
            return Err(CoreError::validation(
                "Missing required fields: date, category, description, account",
            ));
        };

        Ok(NewTransaction {
            date: parse_date(&date)?,
            category: parse_category(&category)?,
            description,
            income: amount("income", self.income)?.unwrap_or(Decimal::ZERO),
            expense: amount("expense", self.expense)?.unwrap_or(Decimal::ZERO),
            account,
            notes: non_empty(self.notes),
            user_id,
        })
    }

    /// Validate only the fields present; an empty `notes` clears it
    pub fn into_patch(self) -> CoreResult<TransactionPatch> {
        Ok(TransactionPatch {
            date: self.date.as_deref().map(parse_date).transpose()?,
            category: self.category.as_deref().map(parse_category).transpose()?,
            description: required_if_present("description", self.description)?,
            income: amount("income", self.income)?,
            expense: amount("expense", self.expense)?,
            account: required_if_present("account", self.account)?,
            notes: self.notes.map(|n| non_empty(Some(n))),
        })
    }
}

/// Validate a bulk payload all-or-nothing
pub fn validate_bulk(
    inputs: Vec<TransactionInput>,
    user_id: Option<String>,
) -> CoreResult<Vec<NewTransaction>> {
    if inputs.is_empty() {
        return Err(CoreError::validation("Transactions array is required"));
    }
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            input.into_new(user_id.clone()).map_err(|e| match e {
                CoreError::ValidationError { message } => {
                    CoreError::validation(format!("Transaction {}: {}", i + 1, message))
                }
                other => other,
            })
        })
        .collect()
}

/// Body of `POST /api/transactions/bulk`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkCreateRequest {
    #[serde(default)]
    pub transactions: Vec<TransactionInput>,
}

/// Body of `DELETE /api/transactions/bulk`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Validated bulk delete selector
#[derive(Debug, Clone, PartialEq)]
pub enum BulkDelete {
    Ids(Vec<String>),
    CategoryInYear { category: Category, year: i32 },
}

impl BulkDeleteRequest {
    /// Ids win over a category selector; deleting by category needs a year
    pub fn selector(self) -> CoreResult<BulkDelete> {
        if let Some(ids) = self.ids.filter(|ids| !ids.is_empty()) {
            return Ok(BulkDelete::Ids(ids));
        }
        match (non_empty(self.category), self.year) {
            (Some(category), Some(year)) => {
                let category = parse_category(&category)?;
                year_range(year)?;
                Ok(BulkDelete::CategoryInYear { category, year })
            }
            (Some(category), None) => {
                parse_category(&category)?;
                Err(CoreError::validation(
                    "Year is required when deleting by category",
                ))
            }
            (None, _) => Err(CoreError::validation(
                "Must provide either ids array or category with year",
            )),
        }
    }
}

/// Query string of `GET /api/transactions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub category: Option<String>,
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

impl TransactionFilter {
    /// Translate to a store query, newest first
    pub fn to_query(&self) -> CoreResult<TransactionQuery> {
        let mut query = match (self.year, self.month) {
            (Some(year), Some(month)) => {
                let (from, to) = month_range(year, month)?;
                TransactionQuery::between(from, to)
            }
            (Some(year), None) => {
                let (from, to) = year_range(year)?;
                TransactionQuery::between(from, to)
            }
            (None, Some(month)) => {
                validate_month(month)?;
                return Err(CoreError::validation("Month filter requires a year"));
            }
            (None, None) => TransactionQuery::default(),
        };
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query = query.with_category(parse_category(category)?);
        }
        Ok(query.page(self.limit, self.offset))
    }
}

// ==================== Field Helpers ====================

pub fn parse_category(value: &str) -> CoreResult<Category> {
    value.parse::<Category>().map_err(CoreError::validation)
}

pub fn parse_date(value: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        CoreError::validation(format!("Invalid date '{}'. Expected YYYY-MM-DD", value))
    })
}

fn amount(field: &str, value: Option<Decimal>) -> CoreResult<Option<Decimal>> {
    match value {
        Some(v) if v.is_sign_negative() && !v.is_zero() => Err(CoreError::validation(format!(
            "Income and expense must be non-negative ({} was {})",
            field, v
        ))),
        Some(v) if v > MAX_AMOUNT => Err(CoreError::validation(format!(
            "Income and expense must not exceed {} ({} was {})",
            MAX_AMOUNT, field, v
        ))),
        other => Ok(other),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_if_present(field: &str, value: Option<String>) -> CoreResult<Option<String>> {
    match value {
        Some(v) => match non_empty(Some(v)) {
            Some(v) => Ok(Some(v)),
            None => Err(CoreError::validation(format!("{} must not be empty", field))),
        },
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TransactionInput {
        TransactionInput {
            date: Some("2025-06-15".to_string()),
            category: Some("EARN".to_string()),
            description: Some("Catering order".to_string()),
            income: Some(Decimal::from(5_000_000)),
            expense: None,
            account: Some("BCA".to_string()),
            notes: None,
        }
    }

    fn message(error: CoreError) -> String {
        match error {
            CoreError::ValidationError { message } => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_new() {
        let record = input().into_new(Some("u1".to_string())).unwrap();
        assert_eq!(record.category, Category::Earn);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(record.income, Decimal::from(5_000_000));
        assert_eq!(record.expense, Decimal::ZERO);
        assert_eq!(record.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_missing_fields() {
        let err = TransactionInput {
            account: None,
            ..input()
        }
        .into_new(None)
        .unwrap_err();
        assert!(message(err).contains("Missing required fields"));

        let blank = TransactionInput {
            description: Some("   ".to_string()),
            ..input()
        };
        assert!(blank.into_new(None).is_err());
    }

    #[test]
    fn test_invalid_category_and_date() {
        let err = TransactionInput {
            category: Some("SALES".to_string()),
            ..input()
        }
        .into_new(None)
        .unwrap_err();
        assert!(message(err).contains("Must be one of"));

        let err = TransactionInput {
            date: Some("15/06/2025".to_string()),
            ..input()
        }
        .into_new(None)
        .unwrap_err();
        assert!(message(err).contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = TransactionInput {
            expense: Some(Decimal::from(-1)),
            ..input()
        }
        .into_new(None)
        .unwrap_err();
        assert!(message(err).contains("non-negative"));
    }

    #[test]
    fn test_oversized_amount_rejected() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000_000i64));

        let at_limit = TransactionInput {
            income: Some(MAX_AMOUNT),
            ..input()
        }
        .into_new(None)
        .unwrap();
        assert_eq!(at_limit.income, MAX_AMOUNT);

        let err = TransactionInput {
            income: Some(Decimal::MAX / Decimal::TWO + Decimal::ONE),
            ..input()
        }
        .into_new(None)
        .unwrap_err();
        assert!(message(err).contains("must not exceed"));

        let err = TransactionInput {
            expense: Some(MAX_AMOUNT + Decimal::ONE),
            ..TransactionInput::default()
        }
        .into_patch()
        .unwrap_err();
        assert!(message(err).contains("expense"));
    }

    #[test]
    fn test_patch_validates_present_fields() {
        let patch = TransactionInput {
            income: Some(Decimal::from(10)),
            notes: Some(String::new()),
            ..TransactionInput::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.income, Some(Decimal::from(10)));
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.date, None);

        assert!(TransactionInput {
            category: Some("nope".to_string()),
            ..TransactionInput::default()
        }
        .into_patch()
        .is_err());
        assert!(TransactionInput {
            account: Some(String::new()),
            ..TransactionInput::default()
        }
        .into_patch()
        .is_err());
    }

    #[test]
    fn test_bulk_is_all_or_nothing() {
        assert!(validate_bulk(vec![], None).is_err());

        let bad = TransactionInput {
            category: Some("BAD".to_string()),
            ..input()
        };
        let err = validate_bulk(vec![input(), bad], None).unwrap_err();
        assert!(message(err).starts_with("Transaction 2:"));

        assert_eq!(validate_bulk(vec![input(), input()], None).unwrap().len(), 2);
    }

    #[test]
    fn test_bulk_delete_selector() {
        let by_ids = BulkDeleteRequest {
            ids: Some(vec!["a".to_string()]),
            category: Some("EARN".to_string()),
            year: None,
        };
        assert_eq!(by_ids.selector().unwrap(), BulkDelete::Ids(vec!["a".to_string()]));

        let by_category = BulkDeleteRequest {
            ids: Some(vec![]),
            category: Some("OPEX".to_string()),
            year: Some(2025),
        };
        assert_eq!(
            by_category.selector().unwrap(),
            BulkDelete::CategoryInYear {
                category: Category::Opex,
                year: 2025
            }
        );

        let no_year = BulkDeleteRequest {
            category: Some("OPEX".to_string()),
            ..BulkDeleteRequest::default()
        };
        assert!(message(no_year.selector().unwrap_err()).contains("Year is required"));
        assert!(BulkDeleteRequest::default().selector().is_err());
    }

    #[test]
    fn test_filter_to_query() {
        let query = TransactionFilter {
            year: Some(2024),
            month: Some(2),
            category: Some("VAR".to_string()),
            limit: Some(10),
            offset: 5,
        }
        .to_query()
        .unwrap();
        assert_eq!(query.from, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(query.to, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(query.category, Some(Category::Var));
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, 5);

        let month_only = TransactionFilter {
            month: Some(3),
            ..TransactionFilter::default()
        };
        assert!(month_only.to_query().is_err());

        let bad_month = TransactionFilter {
            year: Some(2025),
            month: Some(13),
            ..TransactionFilter::default()
        };
        assert!(bad_month.to_query().is_err());

        assert_eq!(
            TransactionFilter::default().to_query().unwrap(),
            TransactionQuery::default()
        );
    }
}
