//! Transaction routes

pub mod api;

pub use api::{
    api_bulk_create, api_bulk_delete, api_transaction_create, api_transaction_delete,
    api_transaction_detail, api_transaction_summary, api_transaction_update, api_transactions,
};
