//! Payout provider adapters.
//!
//! One module per external payout rail. Each adapter translates between the
//! uniform internal payout contract ([`sellerpay_interfaces::api`]) and its
//! provider's API and webhook format, including signature verification over
//! the exact raw webhook bytes.

pub mod connectors;
pub mod consts;
pub mod utils;

pub use connectors::{adyen_connect, stripe_connect, AdyenConnect, StripeConnect};
