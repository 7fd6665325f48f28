//! Webhook ingestion for payout providers.

pub mod incoming;

use async_trait::async_trait;
use common_enums::PayoutProviderId;
use payout_env::logger;
use sellerpay_interfaces::webhooks::WebhookActionAndData;

use crate::core::errors::RouterResult;

pub use self::incoming::{incoming_webhook_core, process_payout_account_webhook_event};

/// Downstream consumer of normalized webhook actions. The ingestion
/// pipeline's responsibility ends at producing the `{action, data}` pair;
/// the side effects (marking accounts active, recording payout confirmations)
/// belong to the workflow engine behind this trait.
#[async_trait]
pub trait PayoutWebhookProcessor: Send + Sync {
    async fn process_payout_webhook_action(
        &self,
        provider_id: PayoutProviderId,
        event: WebhookActionAndData,
    ) -> RouterResult<()>;
}

/// Processor that only records the action; stands in until a workflow engine
/// is attached.
pub struct NoopPayoutWebhookProcessor;

#[async_trait]
impl PayoutWebhookProcessor for NoopPayoutWebhookProcessor {
    async fn process_payout_webhook_action(
        &self,
        provider_id: PayoutProviderId,
        event: WebhookActionAndData,
    ) -> RouterResult<()> {
        logger::info!(
            %provider_id,
            action = %event.action,
            resource_id = %event.data.resource_id,
            "payout webhook action received"
        );
        Ok(())
    }
}

#[cfg(test)]
mod webhook_pipeline_tests {
    use std::{collections::HashMap, sync::Arc};

    use sellerpay_interfaces::webhooks::PayoutWebhookAction;
    use serde_json::json;

    use super::*;
    use crate::{
        core::test_utils::{mk_state, MockProvider, RecordingProcessor},
        types::api,
    };

    fn buffer_event(
        body: &serde_json::Value,
        headers: &[(&str, &str)],
    ) -> api::PayoutWebhookEvent {
        api::PayoutWebhookEvent {
            raw_data: json!({
                "type": "Buffer",
                "data": serde_json::to_vec(body).unwrap(),
            }),
            headers: headers
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn actionable_event_reaches_the_processor() {
        let processor = Arc::new(RecordingProcessor::default());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_webhook_processor(processor.clone());

        let event = buffer_event(
            &json!({ "action": "account_status_updated", "resource_id": "acct_1" }),
            &[("stripe-signature", "t=1,v1=feed")],
        );
        incoming::process_payout_account_webhook_event(&state, event)
            .await
            .unwrap();

        let events = processor.events.lock().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, PayoutProviderId::StripeConnect);
        assert_eq!(events[0].1.action, PayoutWebhookAction::AccountStatusUpdated);
        assert_eq!(events[0].1.data.resource_id, "acct_1");
    }

    #[tokio::test]
    async fn non_actionable_event_is_silently_ignored() {
        let processor = Arc::new(RecordingProcessor::default());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_webhook_processor(processor.clone());

        let event = buffer_event(
            &json!({ "kind": "something.else" }),
            &[("stripe-signature", "t=1,v1=feed")],
        );
        incoming::process_payout_account_webhook_event(&state, event)
            .await
            .unwrap();

        assert!(processor.events.lock().await.is_empty());
    }

    #[tokio::test]
    async fn missing_signature_headers_use_the_configured_default_provider() {
        let processor = Arc::new(RecordingProcessor::default());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_webhook_processor(processor.clone());

        let event = buffer_event(
            &json!({ "action": "payout_completed", "resource_id": "tr_9" }),
            &[("content-type", "application/json")],
        );
        incoming::process_payout_account_webhook_event(&state, event)
            .await
            .unwrap();

        let events = processor.events.lock().await;
        assert_eq!(events.len(), 1);
        // Default provider from configuration, not from the payload.
        assert_eq!(events[0].0, state.conf.webhooks.default_provider);
        assert_eq!(events[0].1.action, PayoutWebhookAction::PayoutCompleted);
    }
}
