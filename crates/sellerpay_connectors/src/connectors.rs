//! Connector modules.

pub mod adyen_connect;
pub mod stripe_connect;

pub use adyen_connect::AdyenConnect;
pub use stripe_connect::StripeConnect;
