use common_enums::PayoutAccountStatus;
use error_stack::report;
use sellerpay_interfaces::{
    errors::ConnectorError,
    types::{CreatePayoutAccountRequest, CreatePayoutRequest, InitializeOnboardingRequest, ReversePayoutRequest},
    webhooks::{PayoutWebhookAction, WebhookActionAndData, WebhookResourceData},
};
use serde::{Deserialize, Serialize};

use crate::utils;

// Stripe takes form-encoded bodies; nested objects are spelled with bracketed
// field names rather than real nesting.

#[derive(Debug, Serialize)]
pub struct StripeAccountCreateRequest {
    #[serde(rename = "type")]
    account_type: StripeAccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    business_type: Option<String>,
    #[serde(rename = "capabilities[transfers][requested]")]
    transfers_requested: bool,
    #[serde(rename = "capabilities[card_payments][requested]")]
    card_payments_requested: bool,
    #[serde(rename = "metadata[internal_account_id]")]
    internal_account_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StripeAccountType {
    Express,
    Standard,
    Custom,
}

impl From<&CreatePayoutAccountRequest> for StripeAccountCreateRequest {
    fn from(req: &CreatePayoutAccountRequest) -> Self {
        Self {
            account_type: StripeAccountType::Express,
            country: utils::get_optional_context_str(&req.context, "country")
                .map(str::to_uppercase),
            email: utils::get_optional_context_str(&req.context, "email").map(str::to_string),
            business_type: utils::get_optional_context_str(&req.context, "business_type")
                .map(str::to_string),
            transfers_requested: true,
            card_payments_requested: true,
            internal_account_id: req.internal_account_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StripeAccountLinkRequest {
    account: String,
    refresh_url: String,
    return_url: String,
    #[serde(rename = "type")]
    link_type: StripeAccountLinkType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StripeAccountLinkType {
    AccountOnboarding,
    AccountUpdate,
}

impl TryFrom<&InitializeOnboardingRequest> for StripeAccountLinkRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(req: &InitializeOnboardingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            account: req.reference_id.clone(),
            refresh_url: utils::get_context_str(&req.context, "refresh_url")?.to_string(),
            return_url: utils::get_context_str(&req.context, "return_url")?.to_string(),
            link_type: StripeAccountLinkType::AccountOnboarding,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StripeTransferRequest {
    amount: i64,
    currency: String,
    destination: String,
    transfer_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_transaction: Option<String>,
    #[serde(rename = "metadata[commission_amount]")]
    commission_amount: i64,
    #[serde(rename = "metadata[transaction_id]")]
    transaction_id: String,
}

impl From<&CreatePayoutRequest> for StripeTransferRequest {
    fn from(req: &CreatePayoutRequest) -> Self {
        Self {
            amount: req.amount,
            currency: req.currency.to_lowercase(),
            destination: req.account_reference_id.clone(),
            transfer_group: req.transaction_id.clone(),
            source_transaction: req.source_transaction.clone(),
            commission_amount: req.commission_amount,
            transaction_id: req.transaction_id.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StripeTransferReversalRequest {
    amount: i64,
}

impl From<&ReversePayoutRequest> for StripeTransferReversalRequest {
    fn from(req: &ReversePayoutRequest) -> Self {
        Self { amount: req.amount }
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorDetails {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl std::fmt::Display for StripeErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "stripe error: type={:?} code={:?} message={:?}",
            self.error.error_type, self.error.code, self.error.message
        )
    }
}

/// The subset of a Stripe account object that decides payout readiness.
#[derive(Debug, Default, Deserialize)]
pub struct StripeAccountStatusView {
    #[serde(default)]
    pub details_submitted: bool,
    #[serde(default)]
    pub payouts_enabled: bool,
    #[serde(default)]
    pub charges_enabled: bool,
    #[serde(default)]
    pub tos_acceptance: Option<StripeTosAcceptance>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StripeTosAcceptance {
    pub date: Option<i64>,
}

/// A connected account is ready once the seller finished onboarding
/// (details submitted, terms accepted) and Stripe enabled both charges and
/// payouts on it. Anything less keeps the internal account pending.
pub(crate) fn compute_account_status(account: &serde_json::Value) -> PayoutAccountStatus {
    let view: StripeAccountStatusView = match serde_json::from_value(account.clone()) {
        Ok(view) => view,
        Err(_) => return PayoutAccountStatus::Pending,
    };

    let tos_accepted = view
        .tos_acceptance
        .as_ref()
        .and_then(|tos| tos.date)
        .is_some();

    if view.details_submitted && view.payouts_enabled && view.charges_enabled && tos_accepted {
        PayoutAccountStatus::Active
    } else {
        PayoutAccountStatus::Pending
    }
}

/// Parsed form of the `stripe-signature` header: `t=<ts>,v1=<hex>`.
#[derive(Debug)]
pub struct StripeSignature {
    pub timestamp: String,
    pub v1: String,
}

impl TryFrom<&str> for StripeSignature {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(header: &str) -> Result<Self, Self::Error> {
        let mut timestamp = None;
        let mut v1 = None;
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value.to_string()),
                Some(("v1", value)) => v1 = Some(value.to_string()),
                _ => {}
            }
        }
        match (timestamp, v1) {
            (Some(timestamp), Some(v1)) => Ok(Self { timestamp, v1 }),
            _ => Err(report!(ConnectorError::WebhookSignatureNotFound)),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeWebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeWebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeWebhookEventData {
    pub object: serde_json::Value,
}

pub(crate) fn get_webhook_action_and_data(
    event: StripeWebhookEvent,
) -> Option<WebhookActionAndData> {
    let action = match event.event_type.as_str() {
        "account.updated" => PayoutWebhookAction::AccountStatusUpdated,
        "payout.paid" => PayoutWebhookAction::PayoutCompleted,
        "payout.failed" => PayoutWebhookAction::PayoutFailed,
        "transfer.reversed" => PayoutWebhookAction::PayoutReversed,
        _ => return None,
    };

    let resource_id = event
        .data
        .object
        .get("id")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(WebhookActionAndData {
        action,
        data: WebhookResourceData {
            resource_id,
            payload: event.data.object.into(),
        },
    })
}

#[cfg(test)]
mod stripe_connect_transformers_tests {
    use serde_json::json;

    use super::*;

    fn ready_account() -> serde_json::Value {
        json!({
            "id": "acct_1A2b3C",
            "details_submitted": true,
            "payouts_enabled": true,
            "charges_enabled": true,
            "tos_acceptance": { "date": 1_704_067_200 },
        })
    }

    #[test]
    fn fully_enabled_account_is_active() {
        assert_eq!(
            compute_account_status(&ready_account()),
            PayoutAccountStatus::Active
        );
    }

    #[test]
    fn any_disabled_flag_keeps_account_pending() {
        for flag in ["details_submitted", "payouts_enabled", "charges_enabled"] {
            let mut account = ready_account();
            account[flag] = json!(false);
            assert_eq!(
                compute_account_status(&account),
                PayoutAccountStatus::Pending,
                "flag {flag} = false must not be ready"
            );
        }
    }

    #[test]
    fn absent_tos_acceptance_date_keeps_account_pending() {
        let mut account = ready_account();
        account["tos_acceptance"] = json!({});
        assert_eq!(compute_account_status(&account), PayoutAccountStatus::Pending);

        let mut account = ready_account();
        account.as_object_mut().unwrap().remove("tos_acceptance");
        assert_eq!(compute_account_status(&account), PayoutAccountStatus::Pending);
    }

    #[test]
    fn malformed_account_object_is_pending() {
        assert_eq!(
            compute_account_status(&json!("not an account")),
            PayoutAccountStatus::Pending
        );
    }

    #[test]
    fn signature_header_parses_timestamp_and_v1() {
        let signature =
            StripeSignature::try_from("t=1712000000,v1=abcdef0123,v0=ignored").unwrap();
        assert_eq!(signature.timestamp, "1712000000");
        assert_eq!(signature.v1, "abcdef0123");
    }

    #[test]
    fn signature_header_without_v1_is_rejected() {
        assert!(StripeSignature::try_from("t=1712000000").is_err());
    }

    #[test]
    fn account_updated_event_maps_to_account_status_action() {
        let event: StripeWebhookEvent = serde_json::from_value(json!({
            "type": "account.updated",
            "data": { "object": ready_account() },
        }))
        .unwrap();
        let parsed = get_webhook_action_and_data(event).unwrap();
        assert_eq!(parsed.action, PayoutWebhookAction::AccountStatusUpdated);
        assert_eq!(parsed.data.resource_id, "acct_1A2b3C");
    }

    #[test]
    fn unrelated_event_is_not_actionable() {
        let event: StripeWebhookEvent = serde_json::from_value(json!({
            "type": "invoice.created",
            "data": { "object": { "id": "in_1" } },
        }))
        .unwrap();
        assert!(get_webhook_action_and_data(event).is_none());
    }

    #[test]
    fn transfer_request_uses_lowercase_currency_and_bracketed_metadata() {
        let req = CreatePayoutRequest {
            account_reference_id: "acct_1A2b3C".to_string(),
            amount: 10_000,
            commission_amount: 1_500,
            currency: common_enums::Currency::EUR,
            transaction_id: "order_42".to_string(),
            source_transaction: None,
            payment_session: None,
        };
        let encoded = serde_urlencoded::to_string(StripeTransferRequest::from(&req)).unwrap();
        assert!(encoded.contains("currency=eur"));
        assert!(encoded.contains("destination=acct_1A2b3C"));
        assert!(encoded.contains("metadata%5Bcommission_amount%5D=1500"));
        assert!(!encoded.contains("source_transaction"));
    }
}
