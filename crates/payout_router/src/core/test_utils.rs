//! Scripted provider adapter and state builders shared by the core tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use common_enums::{PayoutAccountStatus, PayoutProviderId};
use common_utils::errors::CustomResult;
use error_stack::report;
use futures::lock::Mutex;
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
    webhooks::{
        IncomingWebhookRequestDetails, PayoutWebhookAction, WebhookActionAndData,
        WebhookResourceData,
    },
};

use crate::{
    configs::settings::Settings,
    core::{
        errors::RouterResult,
        registry::ProviderRegistry,
        webhooks::{NoopPayoutWebhookProcessor, PayoutWebhookProcessor},
    },
    db::InMemoryStore,
    routes::AppState,
};

/// A provider adapter with scripted behavior.
///
/// `compute_account_status` reports `Active` when the account object carries
/// `"ready": true`; `merge_account_data` stores the incoming object under a
/// `latest` key so tests can tell the adapter-owned merge from a wholesale
/// replace.
pub(crate) struct MockProvider {
    provider_id: PayoutProviderId,
    fail_account_create: bool,
    fail_payout: bool,
    account_object: serde_json::Value,
    pub create_account_calls: AtomicUsize,
    pub onboarding_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(provider_id: PayoutProviderId) -> Self {
        Self {
            provider_id,
            fail_account_create: false,
            fail_payout: false,
            account_object: serde_json::json!({ "id": "ext_mock", "ready": false }),
            create_account_calls: AtomicUsize::new(0),
            onboarding_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_account_create(mut self) -> Self {
        self.fail_account_create = true;
        self
    }

    pub fn with_failing_payout(mut self) -> Self {
        self.fail_payout = true;
        self
    }

    pub fn with_account_object(mut self, account_object: serde_json::Value) -> Self {
        self.account_object = account_object;
        self
    }
}

impl ConnectorCommon for MockProvider {
    fn id(&self) -> PayoutProviderId {
        self.provider_id
    }
}

#[async_trait]
impl PayoutAccountLifecycle for MockProvider {
    async fn create_payout_account(
        &self,
        req: CreatePayoutAccountRequest,
    ) -> CustomResult<CreatePayoutAccountResponse, ConnectorError> {
        self.create_account_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_account_create {
            return Err(report!(ConnectorError::ProcessingStepFailed(None)));
        }
        Ok(CreatePayoutAccountResponse {
            data: serde_json::json!({
                "id": "ext_mock",
                "requested_by": req.internal_account_id,
            }),
            external_reference_id: "ext_mock".to_string(),
        })
    }

    async fn get_account(
        &self,
        _reference_id: &str,
    ) -> CustomResult<serde_json::Value, ConnectorError> {
        Ok(self.account_object.clone())
    }

    async fn initialize_onboarding(
        &self,
        _req: InitializeOnboardingRequest,
    ) -> CustomResult<InitializeOnboardingResponse, ConnectorError> {
        let call = self.onboarding_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(InitializeOnboardingResponse {
            data: serde_json::json!({ "url": format!("https://onboarding.test/{call}") }),
        })
    }

    fn compute_account_status(&self, account: &serde_json::Value) -> PayoutAccountStatus {
        if account.get("ready") == Some(&serde_json::Value::Bool(true)) {
            PayoutAccountStatus::Active
        } else {
            PayoutAccountStatus::Pending
        }
    }

    fn merge_account_data(
        &self,
        existing: serde_json::Value,
        incoming: serde_json::Value,
    ) -> serde_json::Value {
        let mut root = match existing {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        root.insert("latest".to_string(), incoming);
        serde_json::Value::Object(root)
    }
}

#[async_trait]
impl PayoutExecution for MockProvider {
    async fn create_payout(
        &self,
        req: CreatePayoutRequest,
    ) -> CustomResult<ProviderPayoutResponse, ConnectorError> {
        if self.fail_payout {
            return Err(report!(ConnectorError::ProcessingStepFailed(None)));
        }
        Ok(ProviderPayoutResponse {
            data: serde_json::json!({
                "id": "tr_mock",
                "amount": req.amount,
                "destination": req.account_reference_id,
            }),
        })
    }

    async fn reverse_payout(
        &self,
        req: ReversePayoutRequest,
    ) -> CustomResult<serde_json::Value, ConnectorError> {
        Ok(serde_json::json!({
            "id": "trr_mock",
            "transfer": req.transfer_id,
            "amount": req.amount,
        }))
    }
}

impl IncomingPayoutWebhook for MockProvider {
    fn get_webhook_action_and_data(
        &self,
        request: &IncomingWebhookRequestDetails<'_>,
    ) -> CustomResult<Option<WebhookActionAndData>, ConnectorError> {
        let body: serde_json::Value = serde_json::from_slice(request.body)
            .map_err(|_| report!(ConnectorError::WebhookBodyDecodingFailed))?;
        let action = match body.get("action").and_then(serde_json::Value::as_str) {
            Some("account_status_updated") => PayoutWebhookAction::AccountStatusUpdated,
            Some("payout_completed") => PayoutWebhookAction::PayoutCompleted,
            _ => return Ok(None),
        };
        Ok(Some(WebhookActionAndData {
            action,
            data: WebhookResourceData {
                resource_id: body
                    .get("resource_id")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                payload: body.into(),
            },
        }))
    }
}

impl PayoutProvider for MockProvider {}

/// Webhook processor that records every delivered action.
#[derive(Default)]
pub(crate) struct RecordingProcessor {
    pub events: Mutex<Vec<(PayoutProviderId, WebhookActionAndData)>>,
}

#[async_trait]
impl PayoutWebhookProcessor for RecordingProcessor {
    async fn process_payout_webhook_action(
        &self,
        provider_id: PayoutProviderId,
        event: WebhookActionAndData,
    ) -> RouterResult<()> {
        self.events.lock().await.push((provider_id, event));
        Ok(())
    }
}

/// App state backed by an in-memory store and the given adapters.
pub(crate) fn mk_state(providers: Vec<Arc<dyn PayoutProvider>>) -> AppState {
    AppState {
        conf: Arc::new(Settings::default()),
        store: Arc::new(InMemoryStore::new()),
        registry: Arc::new(ProviderRegistry::from_providers(providers)),
        webhook_processor: Arc::new(NoopPayoutWebhookProcessor),
    }
}
