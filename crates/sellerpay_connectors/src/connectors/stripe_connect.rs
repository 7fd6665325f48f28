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

use self::transformers as stripe_connect;
use crate::utils;

const CONNECTOR: &str = "stripe_connect";

/// Stripe Connect configuration. The webhook secret is the endpoint secret
/// (`whsec_...`) Stripe issues per webhook endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct StripeConnectConfig {
    pub base_url: String,
    pub secret_key: Secret<String>,
    pub webhook_secret: Secret<String>,
}

impl Default for StripeConnectConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.stripe.com".to_string(),
            secret_key: Secret::default(),
            webhook_secret: Secret::default(),
        }
    }
}

/// Adapter for payouts over Stripe Connect (express connected accounts and
/// transfers).
pub struct StripeConnect {
    config: StripeConnectConfig,
    client: reqwest::Client,
}

impl StripeConnect {
    pub fn new(config: StripeConnectConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST a form-encoded request the way every Stripe endpoint expects.
    async fn post_form<R: Serialize>(
        &self,
        path: &str,
        body: &R,
    ) -> CustomResult<Bytes, ConnectorError> {
        let request = self
            .client
            .post(self.url(path))
            .bearer_auth(self.config.secret_key.peek())
            .form(body);
        let response = utils::send_request(CONNECTOR, request).await?;
        self.receive_response(response).await
    }

    async fn get(&self, path: &str) -> CustomResult<Bytes, ConnectorError> {
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(self.config.secret_key.peek());
        let response = utils::send_request(CONNECTOR, request).await?;
        self.receive_response(response).await
    }

    /// Attach Stripe's own error message to failed calls before propagating.
    async fn receive_response(
        &self,
        response: reqwest::Response,
    ) -> CustomResult<Bytes, ConnectorError> {
        match utils::handle_response(CONNECTOR, response).await {
            Ok(body) => Ok(body),
            Err(err) => {
                let detail = match err.current_context() {
                    ConnectorError::ProcessingStepFailed(Some(body)) => {
                        serde_json::from_slice::<stripe_connect::StripeErrorResponse>(body)
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
}

impl ConnectorCommon for StripeConnect {
    fn id(&self) -> PayoutProviderId {
        PayoutProviderId::StripeConnect
    }
}

#[async_trait]
impl PayoutAccountLifecycle for StripeConnect {
    async fn create_payout_account(
        &self,
        req: CreatePayoutAccountRequest,
    ) -> CustomResult<CreatePayoutAccountResponse, ConnectorError> {
        let connector_req = stripe_connect::StripeAccountCreateRequest::from(&req);
        let body = self.post_form("/v1/accounts", &connector_req).await?;
        let account: serde_json::Value = body.parse_struct("StripeAccount")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        let external_reference_id = account
            .get("id")
            .and_then(serde_json::Value::as_str)
            .ok_or(report!(ConnectorError::ResponseDeserializationFailed))
            .attach_printable("Stripe account response carried no id")?
            .to_string();

        logger::info!(connector = CONNECTOR, %external_reference_id, "connected account created");

        Ok(CreatePayoutAccountResponse {
            data: account,
            external_reference_id,
        })
    }

    async fn get_account(
        &self,
        reference_id: &str,
    ) -> CustomResult<serde_json::Value, ConnectorError> {
        let body = self.get(&format!("/v1/accounts/{reference_id}")).await?;
        body.parse_struct("StripeAccount")
            .change_context(ConnectorError::ResponseDeserializationFailed)
    }

    async fn initialize_onboarding(
        &self,
        req: InitializeOnboardingRequest,
    ) -> CustomResult<InitializeOnboardingResponse, ConnectorError> {
        let connector_req = stripe_connect::StripeAccountLinkRequest::try_from(&req)?;
        let body = self.post_form("/v1/account_links", &connector_req).await?;
        let data: serde_json::Value = body.parse_struct("StripeAccountLink")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;
        Ok(InitializeOnboardingResponse { data })
    }

    fn compute_account_status(&self, account: &serde_json::Value) -> PayoutAccountStatus {
        stripe_connect::compute_account_status(account)
    }

    fn merge_account_data(
        &self,
        _existing: serde_json::Value,
        incoming: serde_json::Value,
    ) -> serde_json::Value {
        // Stripe account state comes from a single API object, so a fresh
        // fetch supersedes everything previously stored.
        incoming
    }
}

#[async_trait]
impl PayoutExecution for StripeConnect {
    async fn create_payout(
        &self,
        req: CreatePayoutRequest,
    ) -> CustomResult<ProviderPayoutResponse, ConnectorError> {
        let connector_req = stripe_connect::StripeTransferRequest::from(&req);
        let body = self.post_form("/v1/transfers", &connector_req).await?;
        let data: serde_json::Value = body.parse_struct("StripeTransfer")
            .change_context(ConnectorError::ResponseDeserializationFailed)?;

        if data.get("id").and_then(serde_json::Value::as_str).is_none() {
            return Err(report!(ConnectorError::MissingConnectorTransferID))
                .attach_printable("Stripe transfer response carried no id");
        }

        Ok(ProviderPayoutResponse { data })
    }

    async fn reverse_payout(
        &self,
        req: ReversePayoutRequest,
    ) -> CustomResult<serde_json::Value, ConnectorError> {
        let connector_req = stripe_connect::StripeTransferReversalRequest::from(&req);
        let path = format!("/v1/transfers/{}/reversals", req.transfer_id);
        let body = self.post_form(&path, &connector_req).await?;
        body.parse_struct("StripeTransferReversal")
            .change_context(ConnectorError::ResponseDeserializationFailed)
    }
}

impl IncomingPayoutWebhook for StripeConnect {
    fn get_webhook_action_and_data(
        &self,
        request: &IncomingWebhookRequestDetails<'_>,
    ) -> CustomResult<Option<WebhookActionAndData>, ConnectorError> {
        let signature_header = utils::get_header_value(request.headers, "stripe-signature")
            .ok_or(report!(ConnectorError::WebhookSignatureNotFound))?;
        let signature = stripe_connect::StripeSignature::try_from(signature_header)?;

        let payload = std::str::from_utf8(request.body)
            .change_context(ConnectorError::WebhookBodyDecodingFailed)?;
        let message = format!("{}.{payload}", signature.timestamp);
        let expected =
            utils::sign_hmac_sha256(self.config.webhook_secret.peek().as_bytes(), message.as_bytes());

        if !hex::encode(expected).eq_ignore_ascii_case(&signature.v1) {
            return Err(report!(ConnectorError::WebhookSourceVerificationFailed));
        }

        let event: stripe_connect::StripeWebhookEvent =
            request.body.parse_struct("StripeWebhookEvent")
                .change_context(ConnectorError::WebhookBodyDecodingFailed)?;

        Ok(stripe_connect::get_webhook_action_and_data(event))
    }
}

impl PayoutProvider for StripeConnect {}

#[cfg(test)]
mod stripe_connect_webhook_tests {
    use sellerpay_interfaces::webhooks::PayoutWebhookAction;

    use super::*;

    const ENDPOINT_SECRET: &str = "whsec_test_secret";

    fn connector() -> StripeConnect {
        StripeConnect::new(StripeConnectConfig {
            webhook_secret: Secret::new(ENDPOINT_SECRET.to_string()),
            ..Default::default()
        })
    }

    fn signed_headers(timestamp: &str, body: &[u8]) -> http::HeaderMap {
        let message = format!("{timestamp}.{}", std::str::from_utf8(body).unwrap());
        let signature = hex::encode(crate::utils::sign_hmac_sha256(
            ENDPOINT_SECRET.as_bytes(),
            message.as_bytes(),
        ));
        let mut headers = http::HeaderMap::new();
        headers.insert(
            "stripe-signature",
            format!("t={timestamp},v1={signature}").parse().unwrap(),
        );
        headers
    }

    #[test]
    fn valid_signature_yields_the_parsed_action() {
        let body = br#"{"type":"account.updated","data":{"object":{"id":"acct_1"}}}"#;
        let headers = signed_headers("1712000000", body);
        let parsed = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body,
            })
            .unwrap()
            .unwrap();
        assert_eq!(parsed.action, PayoutWebhookAction::AccountStatusUpdated);
        assert_eq!(parsed.data.resource_id, "acct_1");
    }

    #[test]
    fn tampered_body_fails_verification() {
        let body = br#"{"type":"account.updated","data":{"object":{"id":"acct_1"}}}"#;
        let headers = signed_headers("1712000000", body);
        let tampered = br#"{"type":"account.updated","data":{"object":{"id":"acct_2"}}}"#;
        let err = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body: tampered,
            })
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::WebhookSourceVerificationFailed
        ));
    }

    #[test]
    fn missing_signature_header_is_an_error() {
        let headers = http::HeaderMap::new();
        let err = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body: b"{}",
            })
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConnectorError::WebhookSignatureNotFound
        ));
    }

    #[test]
    fn merge_replaces_stored_data_wholesale() {
        let merged = connector().merge_account_data(
            serde_json::json!({ "foo": 1 }),
            serde_json::json!({ "bar": 2 }),
        );
        assert_eq!(merged, serde_json::json!({ "bar": 2 }));
    }

    #[test]
    fn unhandled_event_type_is_not_actionable() {
        let body = br#"{"type":"customer.created","data":{"object":{"id":"cus_1"}}}"#;
        let headers = signed_headers("1712000000", body);
        let parsed = connector()
            .get_webhook_action_and_data(&IncomingWebhookRequestDetails {
                headers: &headers,
                body,
            })
            .unwrap();
        assert!(parsed.is_none());
    }
}
