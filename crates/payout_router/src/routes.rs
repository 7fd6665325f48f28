//! HTTP surface: thin handlers that validate, call the core, and map the
//! error taxonomy onto statuses.

pub mod app;
pub mod health;
pub mod payout_accounts;
pub mod payouts;
pub mod webhooks;

pub use app::AppState;
