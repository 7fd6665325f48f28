pub mod transformers;

use async_trait::async_trait;
use bytes::Bytes;
use common_enums::{PayoutAccountStatus, PayoutProviderId};
use common_utils::{errors::CustomResult, ext_traits::{ByteSliceExt, BytesExt}};
use error_stack::{report, ResultExt};
use masking::{PeekInterface, Secret};
use payout_env::logger;
use sellerpay_interfaces::{
    api::{
        ConnectorCommon, IncomingPayoutWebhook, PayoutAccountLifecycle, PayoutExecution,
        PayoutProvider,
    },
    errors::ConnectorError,
    types::{
        CreatePayoutAccountRequest, CreatePayoutAccountResponse, CreatePayoutRequest,
        InitializeOnboardingRequest, InitializeOnboardingResponse, ProviderPayoutResponse,
        ReversePayoutRequest,
    },
    webhooks::{IncomingWebhookRequestDetails, WebhookActionAndData},
};
use serde::Serialize;

use self::transformers as adyen_connect;
use crate::{consts, utils};

const CONNECTOR: &str = "adyen_connect";

/// Adyen Balance Platform configuration. The three base URLs cover the legal
/// entity management, configuration and transfer APIs, which Adyen hosts
/// separately. `hmac_key` is the hex-encoded webhook HMAC key;
/// `source_balance_account` is the platform's liable balance account that
/// funds seller transfers.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct AdyenConnectConfig {
    pub lem_base_url: String,
    pub bcl_base_url: String,
    pub btl_base_url: String,
    pub api_key: Secret<String>,
    pub hmac_key: Secret<String>,
    pub source_balance_account: Secret<String>,
}

impl Default for AdyenConnectConfig {
    fn default() -> Self {
        Self {
            lem_base_url: "https://kyc-test.adyen.com/lem/v3".to_string(),
            bcl_base_url: "https://balanceplatform-api-test.adyen.com/bcl/v2".to_string(),
            btl_base_url: "https://balanceplatform-api-test.adyen.com/btl/v4".to_string(),
            api_key: Secret::default(),
            hmac_key: Secret::default(),
            source_balance_account: Secret::default(),
        }
    }
}

/// Adapter for payouts over the Adyen Balance Platform: legal entities,
/// account holders, balance accounts and transfers.
pub struct AdyenConnect {
    config: AdyenConnectConfig,
    client: reqwest::Client,
}

impl AdyenConnect {
    pub fn new(config: AdyenConnectConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn post_json<R: Serialize>(
        &self,
        base_url: &str,
        path: &str,
        body: &R,
    ) -> CustomResult<Bytes, ConnectorError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        let request = self
            .client
            .post(url)
            .header("X-API-Key", self.config.api_key.peek().as_str())
            .json(body);
        let response = utils::send_request(CONNECTOR, request).await?;
        self.receive_response(response).await
    }

    async fn get(&self, base_url: &str, path: &str) -> CustomResult<Bytes, ConnectorError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), path);
        let request = self
            .client
            .get(url)
            .header("X-API-Key", self.config.api_key.peek().as_str());
        let response = utils::send_request(CONNECTOR, request).await?;
        self.receive_response(response).await
    }

    async fn receive_response(
        &self,
        response: reqwest::Response,
    ) -> CustomResult<Bytes, ConnectorError> {
        match utils::handle_response(CONNECTOR, response).await {
            Ok(body) => Ok(body),
            Err(err) => {
                let detail = match err.current_context() {
                    ConnectorError::ProcessingStepFailed(Some(body)) => {
                        serde_json::from_slice::<adyen_connect::AdyenErrorResponse>(body)
                            .ok()
                            .map(|parsed| parsed.to_string())
                    }
                    _ => None,
                };
                match detail {
                    Some(detail) => Err(err.attach_printable(detail)),
                    None => Err(err),
                }
            }
        }
    }

    fn parse_id(value: &serde_json::Value, object: &'static str) -> CustomResult<String, ConnectorError> {
        value
            .get("id")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or(report!(ConnectorError::ResponseDeserializationFailed))
            .attach_printable_lazy(|| format!("Adyen {object} response carried no id"))
    }
}

impl ConnectorCommon for AdyenConnect {
    fn id(&self) -> PayoutProviderId {
        PayoutProviderId::AdyenConnect
    }
}

#[async_trait]
impl PayoutAccountLifecycle for AdyenConnect {
    /// Creating an Adyen "account" is a composite of three calls: the legal
    /// entity, an account holder referencing it, and a balance account under
    /// the holder. The composite result is persisted as one blob; the legal
    /// entity id becomes the account's external reference.
    async fn create_payout_account(
        &self,
        req: CreatePayoutAccountRequest,
    ) -> CustomResult<CreatePayoutAccountResponse, ConnectorError> {
        let legal_entity_req = adyen_connect::AdyenLegalEntityRequest::from(&req);
        let body = self
            .post_json(&self.config.lem_base_url, "/legalEntities", &legal_entity_req)
            .await?;
        let legal_entity: serde_json::Value = body.parse_struct("AdyenLegalEntity")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        let legal_entity_id = Self::parse_id(&legal_entity, "legal entity")?;

        let holder_req = adyen_connect::AdyenAccountHolderRequest {
            legal_entity_id: legal_entity_id.clone(),
            reference: Some(req.internal_account_id.clone()),
            description: utils::get_optional_context_str(&req.context, "description")
                .map(str::to_string),
        };
        let body = self
            .post_json(&self.config.bcl_base_url, "/accountHolders", &holder_req)
            .await?;
        let account_holder: serde_json::Value = body.parse_struct("AdyenAccountHolder")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        let account_holder_id = Self::parse_id(&account_holder, "account holder")?;

        let balance_req = adyen_connect::AdyenBalanceAccountRequest {
            account_holder_id,
            description: Some(format!("payout balance for {}", req.internal_account_id)),
        };
        let body = self
            .post_json(&self.config.bcl_base_url, "/balanceAccounts", &balance_req)
            .await?;
        let balance_account: serde_json::Value = body.parse_struct("AdyenBalanceAccount")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        logger::info!(connector = CONNECTOR, %legal_entity_id, "balance platform account created");

        Ok(CreatePayoutAccountResponse {
            data: serde_json::json!({
                "legal_entity": legal_entity,
                "account_holder": account_holder,
                "balance_account": balance_account,
            }),
            external_reference_id: legal_entity_id,
        })
    }

    async fn get_account(
        &self,
        reference_id: &str,
    ) -> CustomResult<serde_json::Value, ConnectorError> {
        let body = self
            .get(&self.config.lem_base_url, &format!("/legalEntities/{reference_id}"))
            .await?;
        body.parse_struct("AdyenLegalEntity")
            .change_context(ConnectorError::ResponseDeserializationFailed)
    }

    async fn initialize_onboarding(
        &self,
        req: InitializeOnboardingRequest,
    ) -> CustomResult<InitializeOnboardingResponse, ConnectorError> {
        let connector_req = adyen_connect::AdyenOnboardingLinkRequest::from(&req);
        let path = format!("/legalEntities/{}/onboardingLinks", req.reference_id);
        let body = self
            .post_json(&self.config.lem_base_url, &path, &connector_req)
            .await?;
        let data: serde_json::Value = body.parse_struct("AdyenOnboardingLink")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        Ok(InitializeOnboardingResponse { data })
    }

    fn compute_account_status(&self, account: &serde_json::Value) -> PayoutAccountStatus {
        adyen_connect::compute_account_status(account)
    }

    /// Adyen account state accumulates from several external calls
    /// (onboarding, instrument attachment, store configuration), so a sync
    /// may only refresh the legal entity sub-object without clobbering its
    /// siblings.
    fn merge_account_data(
        &self,
        existing: serde_json::Value,
        incoming: serde_json::Value,
    ) -> serde_json::Value {
        adyen_connect::merge_account_data(existing, incoming)
    }
}

#[async_trait]
impl PayoutExecution for AdyenConnect {
    async fn create_payout(
        &self,
        req: CreatePayoutRequest,
    ) -> CustomResult<ProviderPayoutResponse, ConnectorError> {
        let connector_req = adyen_connect::AdyenTransferRequest::try_from((
            &req,
            self.config.source_balance_account.clone(),
        ))?;
        let body = self
            .post_json(&self.config.btl_base_url, "/transfers", &connector_req)
            .await?;
        let data: serde_json::Value = body.parse_struct("AdyenTransfer")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        if data.get("id").and_then(serde_json::Value::as_str).is_none() {
            return Err(report!(ConnectorError::MissingConnectorTransferID))
                .attach_printable("Adyen transfer response carried no id");
        }

        Ok(ProviderPayoutResponse { data })
    }

    async fn reverse_payout(
        &self,
        req: ReversePayoutRequest,
    ) -> CustomResult<serde_json::Value, ConnectorError> {
        let connector_req = adyen_connect::AdyenTransferReturnRequest::from(&req);
        let path = format!("/transfers/{}/returns", req.transfer_id);
        let body = self
            .post_json(&self.config.btl_base_url, &path, &connector_req)
            .await?;
        body.parse_struct("AdyenTransferReturn")
            .change_context(ConnectorError::ResponseDeserializationFailed)
    }
}

impl IncomingPayoutWebhook for AdyenConnect {
    fn get_webhook_action_and_data(
        &self,
        request: &IncomingWebhookRequestDetails<'_>,
    ) -> CustomResult<Option<WebhookActionAndData>, ConnectorError> {
        let signature = utils::get_header_value(request.headers, "hmacsignature")
            .or_else(|| utils::get_header_value(request.headers, "adyen-signature"))
            .ok_or(report!(ConnectorError::WebhookSignatureNotFound))?;

        let raw_key = hex::decode(self.config.hmac_key.peek())
            .change_context(ConnectorError::WebhookSourceVerificationFailed)
            .attach_printable("webhook HMAC key is not valid hex")?;

        let signed_message = utils::sign_hmac_sha256(&raw_key, request.body);
        let expected = {
            use base64::Engine;
            consts::BASE64_ENGINE.encode(signed_message)
        };
        if expected.as_bytes() != signature.as_bytes() {
            return Err(report!(ConnectorError::WebhookSourceVerificationFailed));
        }

        let webhook: adyen_connect::AdyenConnectIncomingWebhook =
            request.body.parse_struct("AdyenConnectIncomingWebhook")
                .change_context(ConnectorError::WebhookBodyDecodingFailed)?;

        Ok(adyen_connect::get_webhook_action_and_data(webhook))
    }
}

impl PayoutProvider for AdyenConnect {}

#[cfg(test)]
mod adyen_connect_webhook_tests {
    use base64::Engine;
    use sellerpay_interfaces::webhooks::PayoutWebhookAction;

    use super::*;

    const RAW_HMAC_KEY: &[u8] = b"an-adyen-hmac-key-used-in-tests!";

    fn connector() -> AdyenConnect {
        AdyenConnect::new(AdyenConnectConfig {
            hmac_key: Secret::new(hex::encode(RAW_HMAC_KEY)),
            ..Default::default()
        })
    }

    fn signed_headers(body: &[u8]) -> http::HeaderMap {
        let signature =
            consts::BASE64_ENGINE.encode(utils::sign_hmac_sha256(RAW_HMAC_KEY, body));
        let mut headers = http::HeaderMap::new();
        headers.insert("hmacsignature", signature.parse().unwrap());
        headers
    }

    #[test]
    fn valid_signature_yields_the_parsed_action() {
        let body =
            br#"{"type":"balancePlatform.transfer.updated","data":{"id":"TR1","status":"authorised"}}"#;
        let headers = signed_headers(body);
        let parsed = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body,
            })
            .unwrap()
            .unwrap();
        assert_eq!(parsed.action, PayoutWebhookAction::PayoutCompleted);
        assert_eq!(parsed.data.resource_id, "TR1");
    }

    #[test]
    fn wrong_key_fails_verification() {
        let body =
            br#"{"type":"balancePlatform.transfer.updated","data":{"id":"TR1","status":"authorised"}}"#;
        let signature = consts::BASE64_ENGINE
            .encode(utils::sign_hmac_sha256(b"some-other-key", body));
        let mut headers = http::HeaderMap::new();
        headers.insert("hmacsignature", signature.parse().unwrap());

        let err = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body,
            })
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::WebhookSourceVerificationFailed
        ));
    }

    #[test]
    fn signature_is_accepted_from_the_alternate_header() {
        let body = br#"{"type":"balancePlatform.legalEntity.updated","data":{"legalEntityId":"LE1"}}"#;
        let signature =
            consts::BASE64_ENGINE.encode(utils::sign_hmac_sha256(RAW_HMAC_KEY, body));
        let mut headers = http::HeaderMap::new();
        headers.insert("adyen-signature", signature.parse().unwrap());

        let parsed = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body,
            })
            .unwrap()
            .unwrap();
        assert_eq!(parsed.action, PayoutWebhookAction::AccountStatusUpdated);
        assert_eq!(parsed.data.resource_id, "LE1");
    }
}
