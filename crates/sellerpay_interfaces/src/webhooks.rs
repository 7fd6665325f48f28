//! Normalized webhook types shared by all provider adapters.

use common_utils::pii;
use serde::{Deserialize, Serialize};

/// An inbound webhook request, reduced to what signature verification and
/// parsing need. `body` holds the exact raw bytes the provider signed;
/// reconstituting them from any transport-level encoding is the caller's
/// responsibility.
#[derive(Debug)]
pub struct IncomingWebhookRequestDetails<'a> {
    /// HTTP headers of the inbound request.
    pub headers: &'a http::HeaderMap,
    /// Exact raw body bytes.
    pub body: &'a [u8],
}

/// Provider-agnostic interpretation of a webhook event.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PayoutWebhookAction {
    /// The provider-side account changed; the owning payout account should be
    /// re-reconciled.
    AccountStatusUpdated,
    /// A transfer reached a terminal success state.
    PayoutCompleted,
    /// A transfer reached a terminal failure state.
    PayoutFailed,
    /// A transfer was reversed on the provider side.
    PayoutReversed,
}

/// The resource a webhook action refers to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebhookResourceData {
    /// Provider-side identifier of the affected resource (account reference
    /// or transfer id).
    pub resource_id: String,
    /// The provider's event payload, kept opaque for downstream processing.
    pub payload: pii::SecretSerdeValue,
}

/// A parsed, actionable webhook event: what happened and to which resource.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WebhookActionAndData {
    /// Normalized action.
    pub action: PayoutWebhookAction,
    /// Affected resource and raw payload.
    pub data: WebhookResourceData,
}
