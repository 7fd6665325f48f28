//! The provider adapter traits.
//!
//! Split by capability the way the rails themselves split: account lifecycle,
//! moving money, and webhook interpretation. A full payout rail implements
//! all of them and gets the umbrella [`PayoutProvider`] marker for free via an
//! empty impl.

use common_enums::{PayoutAccountStatus, PayoutProviderId};
use common_utils::errors::CustomResult;

use crate::{
    errors::ConnectorError,
    types::{
        CreatePayoutAccountRequest, CreatePayoutAccountResponse, CreatePayoutRequest,
        InitializeOnboardingRequest, InitializeOnboardingResponse, ProviderPayoutResponse,
        ReversePayoutRequest,
    },
    webhooks::{IncomingWebhookRequestDetails, WebhookActionAndData},
};

/// Identification shared by every adapter.
pub trait ConnectorCommon {
    /// The provider id this adapter serves.
    fn id(&self) -> PayoutProviderId;
}

/// Account lifecycle operations: creation, state fetch, onboarding, and the
/// provider-owned interpretation rules (readiness, merge policy).
///
/// Readiness is not a uniform boolean across providers, so translating a raw
/// provider account object into a [`PayoutAccountStatus`] lives here, behind
/// the adapter boundary. Same for the sync merge policy: which parts of the
/// persisted account blob a fresh provider object may overwrite is a property
/// of the provider's integration, not of the sync algorithm.
#[async_trait::async_trait]
pub trait PayoutAccountLifecycle: ConnectorCommon {
    /// Create the provider-side account. Any transport or API-level rejection
    /// is a [`ConnectorError`].
    async fn create_payout_account(
        &self,
        req: CreatePayoutAccountRequest,
    ) -> CustomResult<CreatePayoutAccountResponse, ConnectorError>;

    /// Fetch the current provider-side account state for reconciliation.
    async fn get_account(
        &self,
        reference_id: &str,
    ) -> CustomResult<serde_json::Value, ConnectorError>;

    /// Create or refresh a hosted-onboarding artifact. Safe to call
    /// repeatedly.
    async fn initialize_onboarding(
        &self,
        req: InitializeOnboardingRequest,
    ) -> CustomResult<InitializeOnboardingResponse, ConnectorError>;

    /// Translate a raw provider account object into the internal status.
    /// Missing or malformed readiness fields count as not ready.
    fn compute_account_status(&self, account: &serde_json::Value) -> PayoutAccountStatus;

    /// Merge a freshly fetched provider object into the persisted account
    /// data blob.
    fn merge_account_data(
        &self,
        existing: serde_json::Value,
        incoming: serde_json::Value,
    ) -> serde_json::Value;
}

/// Moving money: transfers to the account and their reversals.
#[async_trait::async_trait]
pub trait PayoutExecution: ConnectorCommon {
    /// Initiate a transfer of funds to the account. The returned payload
    /// carries the provider transfer identifier at `data.id`.
    async fn create_payout(
        &self,
        req: CreatePayoutRequest,
    ) -> CustomResult<ProviderPayoutResponse, ConnectorError>;

    /// Request a reversal of a previously created transfer.
    async fn reverse_payout(
        &self,
        req: ReversePayoutRequest,
    ) -> CustomResult<serde_json::Value, ConnectorError>;
}

/// Webhook interpretation for this provider.
pub trait IncomingPayoutWebhook: ConnectorCommon {
    /// Verify the provider signature over the exact raw bytes and parse the
    /// event into a normalized `{action, data}` pair. `Ok(None)` marks a
    /// well-formed but non-actionable event.
    fn get_webhook_action_and_data(
        &self,
        request: &IncomingWebhookRequestDetails<'_>,
    ) -> CustomResult<Option<WebhookActionAndData>, ConnectorError>;
}

/// A complete payout rail.
pub trait PayoutProvider:
    ConnectorCommon + PayoutAccountLifecycle + PayoutExecution + IncomingPayoutWebhook + Send + Sync
{
}
