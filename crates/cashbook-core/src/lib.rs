//! Core cash book processing and business logic
//!
//! `Books` is the request-facing service: it validates input, resolves the
//! date range, queries the stores and hands the records to the pure report
//! builders. Writes require the operator role.

pub mod aggregate;
pub mod balance_sheet;
pub mod cash_flow;
pub mod error;
pub mod forecast;
pub mod income_statement;
pub mod reports;
pub mod summary;
pub mod time;
pub mod types;
pub mod validation;

use cashbook_store::{
    AssetStore, AssetStoreRef, Profile, ProfileStore, ProfileStoreRef, Transaction,
    TransactionQuery, TransactionStore, TransactionStoreRef,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorContext, ErrorDetails, ErrorSeverity};
pub use reports::*;
pub use time::{Clock, ClockRef, FixedClock, SystemClock};
pub use types::{Actor, PeriodMode, ReportSettings};
pub use validation::{
    BulkCreateRequest, BulkDelete, BulkDeleteRequest, TransactionFilter, TransactionInput,
};

use error::{DefaultErrorLogger, ErrorLogger};

/// Store connectivity as reported by `/api/health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub store: String,
}

/// Report and transaction service over the store traits
pub struct Books {
    transactions: TransactionStoreRef,
    assets: AssetStoreRef,
    profiles: ProfileStoreRef,
    clock: ClockRef,
    settings: ReportSettings,
    error_logger: Arc<dyn ErrorLogger>,
}

impl Books {
    /// Service backed by one store implementing every collection
    pub fn new<S>(settings: ReportSettings, store: Arc<S>) -> Self
    where
        S: TransactionStore + AssetStore + ProfileStore + 'static,
    {
        Self {
            transactions: store.clone(),
            assets: store.clone(),
            profiles: store,
            clock: Arc::new(SystemClock),
            settings,
            error_logger: Arc::new(DefaultErrorLogger),
        }
    }

    /// Read the fixed asset register from somewhere else
    pub fn with_asset_store(mut self, assets: AssetStoreRef) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_clock(mut self, clock: ClockRef) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Requested year, or the clock's year when absent
    pub fn year_or_current(&self, year: Option<i32>) -> i32 {
        year.unwrap_or_else(|| self.today().year())
    }

    // ==================== Identity ====================

    /// Resolve the caller's role from their profile record
    pub async fn actor(&self, user_id: &str, email: &str) -> CoreResult<Actor> {
        let profile = self.profile(user_id).await?;
        Ok(Actor {
            user_id: user_id.to_string(),
            email: email.to_string(),
            role: profile.map(|p| p.role),
        })
    }

    pub async fn profile(&self, user_id: &str) -> CoreResult<Option<Profile>> {
        self.profiles.profile(user_id).await.map_err(|e| {
            self.failure(
                e.into(),
                ErrorContext::new("profile").with_user_id(user_id),
            )
        })
    }

    /// Change the caller's display name; `None` returns the profile unchanged
    pub async fn update_profile(
        &self,
        actor: &Actor,
        full_name: Option<String>,
    ) -> CoreResult<Profile> {
        let not_found = || CoreError::ProfileNotFound {
            id: actor.user_id.clone(),
        };
        let Some(full_name) = full_name else {
            return self.profile(&actor.user_id).await?.ok_or_else(not_found);
        };
        let full_name = full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(CoreError::validation("Full name must be a non-empty string"));
        }

        let context = ErrorContext::new("update_profile").with_user_id(&actor.user_id);
        let updated = self
            .profiles
            .rename_profile(&actor.user_id, full_name)
            .await
            .map_err(|e| self.failure(e.into(), context))?;
        updated.ok_or_else(not_found)
    }

    /// Reject anyone who is not an operator
    pub fn authorize_write(&self, actor: &Actor, operation: &str) -> CoreResult<()> {
        if actor.is_operator() {
            return Ok(());
        }
        let error = CoreError::Forbidden {
            message: "Only the operator can perform this action".to_string(),
        };
        self.error_logger.log_error(
            &error,
            &ErrorContext::new(operation).with_user_id(&actor.user_id),
        );
        Err(error)
    }

    pub async fn health(&self) -> HealthStatus {
        let store = match self.profiles.ping().await {
            Ok(()) => "connected".to_string(),
            Err(e) => {
                self.error_logger
                    .log_warning(&e.to_string(), &ErrorContext::new("health"));
                "error".to_string()
            }
        };
        HealthStatus {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store,
        }
    }

    // ==================== Reports ====================

    pub async fn income_statement(
        &self,
        year: i32,
        mode: PeriodMode,
        month: Option<u32>,
    ) -> CoreResult<IncomeStatement> {
        let period = reports::ReportPeriod::resolve(mode, year, month)?;
        log::debug!("Building income statement for {}", period.display);

        let context = ErrorContext::new("income_statement")
            .with_data("period", json!(period.display.clone()));
        let transactions = self
            .fetch(&TransactionQuery::between(period.start, period.end), context)
            .await?;
        Ok(income_statement::build(period, &transactions, &self.settings))
    }

    pub async fn balance_sheet(&self, year: i32) -> CoreResult<BalanceSheet> {
        let as_of = time::year_end(year)?;
        log::debug!("Building balance sheet as of {}", as_of);

        let context = ErrorContext::new("balance_sheet").with_data("year", json!(year));
        let transactions = self
            .fetch(&TransactionQuery::through(as_of), context.clone())
            .await?;

        let assets = match self.assets.assets_through(as_of).await {
            Ok(assets) => Some(assets),
            Err(e) => {
                self.error_logger.log_warning(
                    &format!("Asset register unavailable, using CAPEX total: {}", e),
                    &context,
                );
                None
            }
        };

        Ok(balance_sheet::build(
            year,
            as_of,
            &transactions,
            assets.as_deref(),
            &self.settings,
        ))
    }

    pub async fn cash_flow(&self, year: i32) -> CoreResult<CashFlowStatement> {
        let (start, end) = time::year_range(year)?;
        log::debug!("Building cash flow statement for {}", year);

        let context = ErrorContext::new("cash_flow").with_data("year", json!(year));
        let current = self
            .fetch(&TransactionQuery::between(start, end), context.clone())
            .await?;
        let prior = match start.pred_opt() {
            Some(prior_end) => self.fetch(&TransactionQuery::through(prior_end), context).await?,
            None => Vec::new(),
        };

        Ok(cash_flow::build(year, &prior, &current, &self.settings))
    }

    pub async fn forecast(&self, year: i32) -> CoreResult<Forecast> {
        let (start, end) = time::year_range(year)?;
        let months_elapsed = time::months_elapsed(year, self.today());
        log::debug!(
            "Building forecast for {} ({} months observed)",
            year,
            months_elapsed
        );

        let context = ErrorContext::new("forecast").with_data("year", json!(year));
        let transactions = self
            .fetch(&TransactionQuery::between(start, end), context)
            .await?;
        Ok(forecast::build(
            year,
            &transactions,
            months_elapsed,
            &self.settings,
        ))
    }

    pub async fn monthly_report(&self, year: i32, month: u32) -> CoreResult<MonthlyReport> {
        let (start, end) = time::month_range(year, month)?;

        let context = ErrorContext::new("monthly_report")
            .with_data("year", json!(year))
            .with_data("month", json!(month));
        let transactions = self
            .fetch(&TransactionQuery::between(start, end).ascending(), context)
            .await?;
        Ok(summary::monthly_report(
            year,
            month,
            transactions,
            &self.settings,
        ))
    }

    pub async fn transaction_summary(&self, year: i32) -> CoreResult<TransactionSummary> {
        let (start, end) = time::year_range(year)?;

        let context = ErrorContext::new("transaction_summary").with_data("year", json!(year));
        let transactions = self
            .fetch(&TransactionQuery::between(start, end), context)
            .await?;
        Ok(summary::transaction_summary(
            year,
            &transactions,
            &self.settings,
        ))
    }

    // ==================== Transactions ====================

    pub async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> CoreResult<TransactionsResponse> {
        let query = filter.to_query()?;
        let transactions = self
            .fetch(&query, ErrorContext::new("list_transactions"))
            .await?;
        Ok(TransactionsResponse {
            count: transactions.len(),
            transactions,
        })
    }

    pub async fn transaction(&self, id: &str) -> CoreResult<Transaction> {
        let context = ErrorContext::new("get_transaction").with_data("id", json!(id));
        self.transactions
            .get(id)
            .await
            .map_err(|e| self.failure(e.into(), context))?
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })
    }

    pub async fn create_transaction(
        &self,
        actor: &Actor,
        input: TransactionInput,
    ) -> CoreResult<Transaction> {
        self.authorize_write(actor, "create_transaction")?;
        let record = input.into_new(Some(actor.user_id.clone()))?;

        let context = ErrorContext::new("create_transaction").with_user_id(&actor.user_id);
        let created = self
            .transactions
            .insert(vec![record])
            .await
            .map_err(|e| self.failure(e.into(), context))?
            .pop()
            .ok_or_else(|| CoreError::InternalError {
                message: "store returned no record for insert".to_string(),
            })?;

        log::info!(
            "Transaction {} created by {} ({} {})",
            created.id,
            actor.user_id,
            created.category,
            created.date
        );
        Ok(created)
    }

    /// Insert every record or none of them
    pub async fn create_transactions(
        &self,
        actor: &Actor,
        inputs: Vec<TransactionInput>,
    ) -> CoreResult<Vec<Transaction>> {
        self.authorize_write(actor, "create_transactions")?;
        let records = validation::validate_bulk(inputs, Some(actor.user_id.clone()))?;

        let context = ErrorContext::new("create_transactions")
            .with_user_id(&actor.user_id)
            .with_data("count", json!(records.len()));
        let created = self
            .transactions
            .insert(records)
            .await
            .map_err(|e| self.failure(e.into(), context))?;

        log::info!("{} transactions created by {}", created.len(), actor.user_id);
        Ok(created)
    }

    pub async fn update_transaction(
        &self,
        actor: &Actor,
        id: &str,
        input: TransactionInput,
    ) -> CoreResult<Transaction> {
        self.authorize_write(actor, "update_transaction")?;
        let patch = input.into_patch()?;

        let context = ErrorContext::new("update_transaction")
            .with_user_id(&actor.user_id)
            .with_data("id", json!(id));
        let updated = self
            .transactions
            .update(id, patch)
            .await
            .map_err(|e| self.failure(e.into(), context))?
            .ok_or_else(|| CoreError::TransactionNotFound { id: id.to_string() })?;

        log::info!("Transaction {} updated by {}", id, actor.user_id);
        Ok(updated)
    }

    pub async fn delete_transaction(&self, actor: &Actor, id: &str) -> CoreResult<DeleteResult> {
        self.authorize_write(actor, "delete_transaction")?;

        let context = ErrorContext::new("delete_transaction")
            .with_user_id(&actor.user_id)
            .with_data("id", json!(id));
        let deleted = self
            .transactions
            .delete(&[id.to_string()])
            .await
            .map_err(|e| self.failure(e.into(), context))?;
        if deleted == 0 {
            return Err(CoreError::TransactionNotFound { id: id.to_string() });
        }

        log::info!("Transaction {} deleted by {}", id, actor.user_id);
        Ok(DeleteResult {
            deleted,
            message: "Transaction deleted successfully".to_string(),
        })
    }

    pub async fn delete_transactions(
        &self,
        actor: &Actor,
        request: BulkDeleteRequest,
    ) -> CoreResult<DeleteResult> {
        self.authorize_write(actor, "delete_transactions")?;
        let selector = request.selector()?;

        let context = ErrorContext::new("delete_transactions").with_user_id(&actor.user_id);
        let (result, message) = match &selector {
            BulkDelete::Ids(ids) => (
                self.transactions.delete(ids).await,
                format!("Deleted {} transaction(s)", ids.len()),
            ),
            BulkDelete::CategoryInYear { category, year } => {
                let (start, end) = time::year_range(*year)?;
                let query = TransactionQuery::between(start, end).with_category(*category);
                (
                    self.transactions.delete_matching(&query).await,
                    format!("Deleted {} transactions for year {}", category, year),
                )
            }
        };
        let deleted = result.map_err(|e| self.failure(e.into(), context))?;

        log::info!("{} ({} removed) by {}", message, deleted, actor.user_id);
        Ok(DeleteResult { deleted, message })
    }

    /// Discard in-memory state and re-read the store file
    pub async fn reload(&self, actor: &Actor) -> CoreResult<ReloadResult> {
        self.authorize_write(actor, "reload")?;
        let context = ErrorContext::new("reload").with_user_id(&actor.user_id);
        let transactions = self
            .transactions
            .reload()
            .await
            .map_err(|e| self.failure(e.into(), context))?;

        log::info!("Store reloaded by {} ({} transactions)", actor.user_id, transactions);
        Ok(ReloadResult {
            transactions,
            message: format!("Reloaded {} transaction(s)", transactions),
        })
    }

    // ==================== Helpers ====================

    async fn fetch(
        &self,
        query: &TransactionQuery,
        context: ErrorContext,
    ) -> CoreResult<Vec<Transaction>> {
        self.transactions
            .query(query)
            .await
            .map_err(|e| self.failure(e.into(), context))
    }

    fn failure(&self, error: CoreError, context: ErrorContext) -> CoreError {
        self.error_logger.log_error(&error, &context);
        error
    }
}

// ==================== Tests ====================
