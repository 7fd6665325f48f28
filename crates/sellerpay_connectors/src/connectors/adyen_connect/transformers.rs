use common_enums::PayoutAccountStatus;
use masking::Secret;
use sellerpay_interfaces::{
    errors::ConnectorError,
    types::{CreatePayoutAccountRequest, CreatePayoutRequest, InitializeOnboardingRequest, ReversePayoutRequest},
    webhooks::{PayoutWebhookAction, WebhookActionAndData, WebhookResourceData},
};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::utils;

/// The capabilities a legal entity must hold, each `allowed`, before the
/// platform may move money to the seller.
pub(crate) const REQUIRED_CAPABILITIES: [&str; 6] = [
    "sendToTransferInstrument",
    "receiveFromTransferInstrument",
    "sendToBalanceAccount",
    "receivePayments",
    "receiveFromPlatformPayments",
    "receiveFromBalanceAccount",
];

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenLegalEntityRequest {
    #[serde(rename = "type")]
    pub entity_type: AdyenLegalEntityType,
    pub individual: Option<serde_json::Value>,
    pub organization: Option<serde_json::Value>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdyenLegalEntityType {
    Individual,
    Organization,
}

impl From<&CreatePayoutAccountRequest> for AdyenLegalEntityRequest {
    fn from(req: &CreatePayoutAccountRequest) -> Self {
        let entity_type = match utils::get_optional_context_str(&req.context, "entity_type") {
            Some("organization") => AdyenLegalEntityType::Organization,
            _ => AdyenLegalEntityType::Individual,
        };
        Self {
            entity_type,
            individual: matches!(entity_type, AdyenLegalEntityType::Individual)
                .then(|| req.context.get("individual").cloned())
                .flatten(),
            organization: matches!(entity_type, AdyenLegalEntityType::Organization)
                .then(|| req.context.get("organization").cloned())
                .flatten(),
            reference: Some(req.internal_account_id.clone()),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenAccountHolderRequest {
    pub legal_entity_id: String,
    pub reference: Option<String>,
    pub description: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenBalanceAccountRequest {
    pub account_holder_id: String,
    pub description: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenOnboardingLinkRequest {
    pub redirect_url: Option<String>,
    pub locale: Option<String>,
    pub theme_id: Option<String>,
}

impl From<&InitializeOnboardingRequest> for AdyenOnboardingLinkRequest {
    fn from(req: &InitializeOnboardingRequest) -> Self {
        Self {
            redirect_url: utils::get_optional_context_str(&req.context, "redirect_url")
                .map(str::to_string),
            locale: utils::get_optional_context_str(&req.context, "locale").map(str::to_string),
            theme_id: utils::get_optional_context_str(&req.context, "theme_id")
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdyenAmount {
    pub value: i64,
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdyenTransferCategory {
    Bank,
    Card,
    Internal,
    PlatformPayment,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenCounterparty {
    pub balance_account_id: Option<String>,
    pub account_holder_id: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenTransferRequest {
    pub amount: AdyenAmount,
    pub balance_account_id: Secret<String>,
    pub category: AdyenTransferCategory,
    pub counterparty: AdyenCounterparty,
    pub reference: String,
    pub reference_for_beneficiary: String,
    pub description: Option<String>,
}

impl TryFrom<(&CreatePayoutRequest, Secret<String>)> for AdyenTransferRequest {
    type Error = error_stack::Report<ConnectorError>;

    fn try_from(
        (req, source_balance_account): (&CreatePayoutRequest, Secret<String>),
    ) -> Result<Self, Self::Error> {
        use masking::PeekInterface;

        if source_balance_account.peek().is_empty() {
            return Err(error_stack::report!(ConnectorError::MissingRequiredField {
                field_name: "source_balance_account",
            }));
        }

        let description = req
            .payment_session
            .as_ref()
            .and_then(|session| utils::get_optional_context_str(session, "description"))
            .map(str::to_string);

        Ok(Self {
            amount: AdyenAmount {
                value: req.amount,
                currency: req.currency.to_string(),
            },
            balance_account_id: source_balance_account,
            category: AdyenTransferCategory::Internal,
            counterparty: AdyenCounterparty {
                balance_account_id: Some(req.account_reference_id.clone()),
                account_holder_id: None,
            },
            reference: req.transaction_id.clone(),
            reference_for_beneficiary: req.transaction_id.clone(),
            description,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AdyenTransferReturnRequest {
    pub amount: AdyenAmount,
    pub reference: String,
}

impl From<&ReversePayoutRequest> for AdyenTransferReturnRequest {
    fn from(req: &ReversePayoutRequest) -> Self {
        Self {
            amount: AdyenAmount {
                value: req.amount,
                currency: req.currency.to_string(),
            },
            reference: format!("return_{}", req.transfer_id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenErrorResponse {
    pub status: Option<u16>,
    pub error_code: Option<String>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl std::fmt::Display for AdyenErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "adyen error: status={:?} code={:?} title={:?} detail={:?}",
            self.status, self.error_code, self.title, self.detail
        )
    }
}

/// All six transfer/payment capabilities must be `allowed` on the legal
/// entity before the account counts as ready. A missing capability map, a
/// missing entry, or a non-boolean `allowed` all keep the account pending.
pub(crate) fn compute_account_status(account: &serde_json::Value) -> PayoutAccountStatus {
    let capabilities = match account.get("capabilities").and_then(serde_json::Value::as_object) {
        Some(capabilities) => capabilities,
        None => return PayoutAccountStatus::Pending,
    };

    let all_allowed = REQUIRED_CAPABILITIES.iter().all(|name| {
        capabilities
            .get(*name)
            .and_then(|capability| capability.get("allowed"))
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    });

    if all_allowed {
        PayoutAccountStatus::Active
    } else {
        PayoutAccountStatus::Pending
    }
}

/// Refresh only the `legal_entity` sub-object; balance account, account
/// holder, business line and store entries are written by other integration
/// paths and must survive a sync.
pub(crate) fn merge_account_data(
    existing: serde_json::Value,
    incoming: serde_json::Value,
) -> serde_json::Value {
    let mut root = match existing {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    root.insert("legal_entity".to_string(), incoming);
    serde_json::Value::Object(root)
}

#[derive(Debug, Deserialize)]
pub struct AdyenConnectIncomingWebhook {
    #[serde(rename = "type")]
    pub webhook_type: AdyenWebhookType,
    pub data: AdyenWebhookData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AdyenWebhookType {
    #[serde(rename = "balancePlatform.accountHolder.updated")]
    AccountHolderUpdated,
    #[serde(rename = "balancePlatform.legalEntity.updated")]
    LegalEntityUpdated,
    #[serde(rename = "balancePlatform.transfer.updated")]
    TransferUpdated,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdyenWebhookData {
    pub id: Option<String>,
    pub legal_entity_id: Option<String>,
    pub status: Option<AdyenTransferStatus>,
    #[serde(flatten)]
    pub rest: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdyenTransferStatus {
    Authorised,
    Refused,
    Error,
    Returned,
    #[serde(other)]
    Unknown,
}

pub(crate) fn get_webhook_action_and_data(
    webhook: AdyenConnectIncomingWebhook,
) -> Option<WebhookActionAndData> {
    let action = match webhook.webhook_type {
        AdyenWebhookType::AccountHolderUpdated | AdyenWebhookType::LegalEntityUpdated => {
            PayoutWebhookAction::AccountStatusUpdated
        }
        AdyenWebhookType::TransferUpdated => match webhook.data.status? {
            AdyenTransferStatus::Authorised => PayoutWebhookAction::PayoutCompleted,
            AdyenTransferStatus::Refused | AdyenTransferStatus::Error => {
                PayoutWebhookAction::PayoutFailed
            }
            AdyenTransferStatus::Returned => PayoutWebhookAction::PayoutReversed,
            AdyenTransferStatus::Unknown => return None,
        },
        AdyenWebhookType::Unknown => return None,
    };

    let resource_id = match action {
        PayoutWebhookAction::AccountStatusUpdated => webhook
            .data
            .legal_entity_id
            .clone()
            .or_else(|| webhook.data.id.clone()),
        _ => webhook.data.id.clone(),
    }
    .unwrap_or_default();

    let mut payload = webhook.data.rest;
    if let serde_json::Value::Object(map) = &mut payload {
        if let Some(id) = webhook.data.id {
            map.insert("id".to_string(), serde_json::Value::String(id));
        }
        if let Some(status) = webhook.data.status {
            map.insert(
                "status".to_string(),
                serde_json::Value::String(status.to_string()),
            );
        }
    }

    Some(WebhookActionAndData {
        action,
        data: WebhookResourceData {
            resource_id,
            payload: payload.into(),
        },
    })
}

#[cfg(test)]
mod adyen_connect_transformers_tests {
    use serde_json::json;

    use super::*;

    fn ready_legal_entity() -> serde_json::Value {
        let mut capabilities = serde_json::Map::new();
        for name in REQUIRED_CAPABILITIES {
            capabilities.insert(name.to_string(), json!({ "allowed": true }));
        }
        json!({
            "id": "LE322JV223222D5GG4CFJ8M2L",
            "type": "individual",
            "capabilities": capabilities,
        })
    }

    #[test]
    fn all_capabilities_allowed_is_active() {
        assert_eq!(
            compute_account_status(&ready_legal_entity()),
            PayoutAccountStatus::Active
        );
    }

    #[test]
    fn any_single_capability_refused_is_pending() {
        for name in REQUIRED_CAPABILITIES {
            let mut legal_entity = ready_legal_entity();
            legal_entity["capabilities"][name] = json!({ "allowed": false });
            assert_eq!(
                compute_account_status(&legal_entity),
                PayoutAccountStatus::Pending,
                "capability {name} = false must not be ready"
            );
        }
    }

    #[test]
    fn missing_capability_map_is_pending() {
        assert_eq!(
            compute_account_status(&json!({ "id": "LE1" })),
            PayoutAccountStatus::Pending
        );
    }

    #[test]
    fn merge_overwrites_legal_entity_and_preserves_siblings() {
        let existing = json!({
            "legal_entity": { "id": "LE1", "stale": true },
            "balance_account": { "id": "BA1" },
            "account_holder": { "id": "AH1" },
        });
        let incoming = json!({ "id": "LE1", "stale": false });

        let merged = merge_account_data(existing, incoming.clone());
        assert_eq!(merged["legal_entity"], incoming);
        assert_eq!(merged["balance_account"], json!({ "id": "BA1" }));
        assert_eq!(merged["account_holder"], json!({ "id": "AH1" }));
    }

    #[test]
    fn merge_with_non_object_existing_starts_fresh() {
        let merged = merge_account_data(json!(null), json!({ "id": "LE1" }));
        assert_eq!(merged, json!({ "legal_entity": { "id": "LE1" } }));
    }

    #[test]
    fn account_holder_update_maps_to_account_status_action() {
        let webhook: AdyenConnectIncomingWebhook = serde_json::from_value(json!({
            "type": "balancePlatform.accountHolder.updated",
            "data": { "id": "AH1", "legalEntityId": "LE1" },
        }))
        .unwrap();
        let parsed = get_webhook_action_and_data(webhook).unwrap();
        assert_eq!(parsed.action, PayoutWebhookAction::AccountStatusUpdated);
        assert_eq!(parsed.data.resource_id, "LE1");
    }

    #[test]
    fn authorised_transfer_maps_to_payout_completed() {
        let webhook: AdyenConnectIncomingWebhook = serde_json::from_value(json!({
            "type": "balancePlatform.transfer.updated",
            "data": { "id": "TR1", "status": "authorised" },
        }))
        .unwrap();
        let parsed = get_webhook_action_and_data(webhook).unwrap();
        assert_eq!(parsed.action, PayoutWebhookAction::PayoutCompleted);
        assert_eq!(parsed.data.resource_id, "TR1");
    }

    #[test]
    fn refused_transfer_maps_to_payout_failed() {
        let webhook: AdyenConnectIncomingWebhook = serde_json::from_value(json!({
            "type": "balancePlatform.transfer.updated",
            "data": { "id": "TR1", "status": "refused" },
        }))
        .unwrap();
        assert_eq!(
            get_webhook_action_and_data(webhook).unwrap().action,
            PayoutWebhookAction::PayoutFailed
        );
    }

    #[test]
    fn unknown_webhook_type_is_not_actionable() {
        let webhook: AdyenConnectIncomingWebhook = serde_json::from_value(json!({
            "type": "balancePlatform.paymentInstrument.created",
            "data": { "id": "PI1" },
        }))
        .unwrap();
        assert!(get_webhook_action_and_data(webhook).is_none());
    }

    #[test]
    fn transfer_request_addresses_counterparty_by_account_reference() {
        let req = CreatePayoutRequest {
            account_reference_id: "BA_SELLER".to_string(),
            amount: 5_000,
            commission_amount: 500,
            currency: common_enums::Currency::EUR,
            transaction_id: "order_7".to_string(),
            source_transaction: None,
            payment_session: None,
        };
        let transfer =
            AdyenTransferRequest::try_from((&req, Secret::new("BA_PLATFORM".to_string())))
                .unwrap();
        let encoded = serde_json::to_value(&transfer).unwrap();
        assert_eq!(encoded["counterparty"]["balanceAccountId"], "BA_SELLER");
        assert_eq!(encoded["balanceAccountId"], "BA_PLATFORM");
        assert_eq!(encoded["amount"], json!({ "value": 5_000, "currency": "EUR" }));
        assert_eq!(encoded["category"], "internal");
    }

    #[test]
    fn transfer_request_requires_source_balance_account() {
        let req = CreatePayoutRequest {
            account_reference_id: "BA_SELLER".to_string(),
            amount: 5_000,
            commission_amount: 500,
            currency: common_enums::Currency::EUR,
            transaction_id: "order_7".to_string(),
            source_transaction: None,
            payment_session: None,
        };
        assert!(AdyenTransferRequest::try_from((&req, Secret::new(String::new()))).is_err());
    }
}
