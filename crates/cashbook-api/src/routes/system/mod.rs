//! Health, identity, reload and settings routes

pub mod api;

pub use api::{api_health, api_me, api_profile, api_profile_update, api_reload, api_settings};
