//! Multi-provider payout core for a multi-seller marketplace.
//!
//! Owns the payout account lifecycle (creation, provider reconciliation,
//! hosted onboarding), payout and reversal execution, and the webhook
//! ingestion pipeline that demultiplexes inbound provider events. All
//! provider traffic flows through the adapters registered in
//! [`core::registry::ProviderRegistry`]; the services themselves are
//! provider-agnostic.

pub mod configs;
pub mod consts;
pub mod core;
pub mod db;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;

pub use payout_env::logger;

pub use self::routes::AppState;
