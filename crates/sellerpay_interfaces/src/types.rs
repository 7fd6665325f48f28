//! Request and response types crossing the adapter boundary.
//!
//! The account/payout payloads returned by providers are opaque to the
//! services: they are carried as `serde_json::Value` and only interpreted by
//! the adapter that produced them.

use common_enums::Currency;
use serde::{Deserialize, Serialize};

/// Request to create a provider-side account for a seller.
#[derive(Clone, Debug, Serialize)]
pub struct CreatePayoutAccountRequest {
    /// Internal id of the (already inserted, still placeholder) payout
    /// account row; forwarded to the provider as idempotency/linking context.
    pub internal_account_id: String,
    /// Caller-supplied context forwarded to the provider (e.g. country,
    /// business profile fields).
    pub context: serde_json::Value,
}

/// Result of a successful provider-side account creation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatePayoutAccountResponse {
    /// Provider-specific serializable account state.
    pub data: serde_json::Value,
    /// The provider's identifier for the created account.
    pub external_reference_id: String,
}

/// Request to create or refresh a hosted-onboarding artifact.
#[derive(Clone, Debug, Serialize)]
pub struct InitializeOnboardingRequest {
    /// The provider's identifier for the account being onboarded.
    pub reference_id: String,
    /// Caller-supplied parameters forwarded to the provider (e.g. return and
    /// refresh URLs).
    pub context: serde_json::Value,
}

/// Result of onboarding initialization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InitializeOnboardingResponse {
    /// Provider-specific onboarding session payload (hosted link, session
    /// token).
    pub data: serde_json::Value,
}

/// Request to transfer funds to a provider-side account.
#[derive(Clone, Debug, Serialize)]
pub struct CreatePayoutRequest {
    /// The provider's identifier for the destination account.
    pub account_reference_id: String,
    /// Amount in minor units.
    pub amount: i64,
    /// Marketplace commission withheld from the seller, in minor units.
    pub commission_amount: i64,
    /// Payout currency.
    pub currency: Currency,
    /// Internal transaction id, used as the transfer reference.
    pub transaction_id: String,
    /// Provider charge/transaction the transfer should be sourced from, when
    /// the rail supports it.
    pub source_transaction: Option<String>,
    /// Opaque payment-session details forwarded to the provider.
    pub payment_session: Option<serde_json::Value>,
}

/// Result of a confirmed provider transfer.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProviderPayoutResponse {
    /// Provider transfer object. Guaranteed by every adapter to carry the
    /// transfer identifier at `data.id`.
    pub data: serde_json::Value,
}

impl ProviderPayoutResponse {
    /// The stable transfer identifier inside the provider payload.
    pub fn transfer_id(&self) -> Option<&str> {
        self.data.get("id").and_then(serde_json::Value::as_str)
    }
}

/// Request to reverse a previously created transfer.
#[derive(Clone, Debug, Serialize)]
pub struct ReversePayoutRequest {
    /// The provider transfer identifier being reversed.
    pub transfer_id: String,
    /// Amount to reverse, in minor units.
    pub amount: i64,
    /// Reversal currency.
    pub currency: Currency,
}
