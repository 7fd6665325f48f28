#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Environment of the payout router: logger, basic config, its environment
//! awareness.
//!

pub mod env;
pub mod logger;

#[doc(inline)]
pub use logger::*;
use strum::Display;
pub use tracing;
pub use tracing::instrument;
pub use tracing_appender;

#[doc(inline)]
pub use self::env::*;

/// API flows of the payout router, used to tag request-scoped spans.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Create a payout account for a seller.
    PayoutAccountsCreate,
    /// Retrieve a payout account.
    PayoutAccountsRetrieve,
    /// Reconcile a payout account's status against its provider.
    PayoutAccountsSync,
    /// Initialize (or refresh) hosted onboarding for a payout account.
    OnboardingInitialize,
    /// Create a payout against an account.
    PayoutsCreate,
    /// Retrieve a payout.
    PayoutsRetrieve,
    /// Reverse a previously created payout.
    PayoutReversalsCreate,
    /// Ingest an inbound payout webhook.
    IncomingWebhookReceive,
    /// Liveness probe.
    HealthCheck,
}
