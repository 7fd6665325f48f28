//! API request and response models.

use common_enums::{Currency, PayoutAccountStatus, PayoutProviderId};
use common_utils::pii;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::types::storage;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatePayoutAccountRequest {
    pub seller_id: String,
    pub payment_provider_id: PayoutProviderId,
    /// Free-form context forwarded to the provider on creation.
    pub context: Option<pii::SecretSerdeValue>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PayoutAccountResponse {
    pub id: String,
    pub payment_provider_id: Option<PayoutProviderId>,
    pub reference_id: String,
    pub status: PayoutAccountStatus,
    pub data: Option<pii::SecretSerdeValue>,
    pub created_at: PrimitiveDateTime,
    pub modified_at: PrimitiveDateTime,
}

impl From<storage::PayoutAccount> for PayoutAccountResponse {
    fn from(account: storage::PayoutAccount) -> Self {
        Self {
            id: account.id,
            payment_provider_id: account.payment_provider_id,
            reference_id: account.reference_id,
            status: account.status,
            data: account.data,
            created_at: account.created_at,
            modified_at: account.modified_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InitializeOnboardingRequest {
    pub payout_account_id: String,
    /// Free-form parameters forwarded to the provider (return URLs, locale).
    pub context: Option<pii::SecretSerdeValue>,
}

#[derive(Clone, Debug, Serialize)]
pub struct OnboardingResponse {
    pub id: String,
    pub payout_account_id: String,
    pub data: Option<pii::SecretSerdeValue>,
    pub context: Option<pii::SecretSerdeValue>,
    pub created_at: PrimitiveDateTime,
    pub modified_at: PrimitiveDateTime,
}

impl From<storage::Onboarding> for OnboardingResponse {
    fn from(onboarding: storage::Onboarding) -> Self {
        Self {
            id: onboarding.id,
            payout_account_id: onboarding.payout_account_id,
            data: onboarding.data,
            context: onboarding.context,
            created_at: onboarding.created_at,
            modified_at: onboarding.modified_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatePayoutRequest {
    pub account_id: String,
    pub amount: i64,
    pub commission_amount: i64,
    pub currency_code: Currency,
    pub transaction_id: String,
    pub source_transaction: Option<String>,
    pub payment_session: Option<pii::SecretSerdeValue>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PayoutResponse {
    pub id: String,
    pub payout_account_id: String,
    pub amount: i64,
    pub commission_amount: i64,
    pub currency_code: Currency,
    pub data: pii::SecretSerdeValue,
    pub created_at: PrimitiveDateTime,
}

impl From<storage::Payout> for PayoutResponse {
    fn from(payout: storage::Payout) -> Self {
        Self {
            id: payout.id,
            payout_account_id: payout.payout_account_id,
            amount: payout.amount,
            commission_amount: payout.commission_amount,
            currency_code: payout.currency_code,
            data: payout.data,
            created_at: payout.created_at,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreatePayoutReversalRequest {
    pub payout_id: String,
    pub amount: i64,
    pub currency_code: Currency,
}

#[derive(Clone, Debug, Serialize)]
pub struct PayoutReversalResponse {
    pub id: String,
    pub payout_id: String,
    pub amount: i64,
    pub currency_code: Currency,
    pub data: pii::SecretSerdeValue,
    pub created_at: PrimitiveDateTime,
}

impl From<storage::PayoutReversal> for PayoutReversalResponse {
    fn from(reversal: storage::PayoutReversal) -> Self {
        Self {
            id: reversal.id,
            payout_id: reversal.payout_id,
            amount: reversal.amount,
            currency_code: reversal.currency_code,
            data: reversal.data,
            created_at: reversal.created_at,
        }
    }
}

/// Raw payout webhook event as delivered by the event subscription: the raw
/// request body (possibly byte-buffer-encoded by the transport) plus the
/// original HTTP headers.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PayoutWebhookEvent {
    /// Either a JSON string holding the exact body, or a Node-style
    /// serialized buffer (`{"type": "Buffer", "data": [...]}`).
    pub raw_data: serde_json::Value,
    /// Lower-cased header name/value pairs of the original request.
    pub headers: std::collections::HashMap<String, String>,
}
