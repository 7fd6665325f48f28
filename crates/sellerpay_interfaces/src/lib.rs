#![warn(missing_docs)]

//! Provider adapter contract for the payout core.
//!
//! Every payout rail (Stripe Connect, Adyen Balance Platform, ...) is wired
//! into the system through the traits in this crate. The services never speak
//! to an external provider except through an adapter implementing
//! [`api::PayoutProvider`], and the adapters never know about each other.

pub mod api;
pub mod errors;
pub mod types;
pub mod webhooks;
