//! Inbound webhook pipeline: reconstitute the exact raw bytes, infer the
//! provider from headers, dispatch to its adapter, and hand any actionable
//! event to the downstream processor.

use common_enums::PayoutProviderId;
use error_stack::report;
use payout_env::{instrument, logger, tracing};
use sellerpay_interfaces::webhooks::IncomingWebhookRequestDetails;

use crate::{
    core::{
        errors::{self, RouterResult},
        payouts,
    },
    routes::AppState,
    types::api,
};

/// Header carrying a Stripe webhook signature.
const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";
/// Headers carrying an Adyen webhook signature.
const ADYEN_SIGNATURE_HEADERS: [&str; 2] = ["hmacsignature", "adyen-signature"];

/// Infer the payout provider from signature headers. Returns the provider and
/// whether the configured default had to be assumed because no known
/// signature header was present.
pub fn infer_provider(
    headers: &http::HeaderMap,
    default_provider: PayoutProviderId,
) -> (PayoutProviderId, bool) {
    if headers.contains_key(STRIPE_SIGNATURE_HEADER) {
        return (PayoutProviderId::StripeConnect, false);
    }
    if ADYEN_SIGNATURE_HEADERS
        .iter()
        .any(|header| headers.contains_key(*header))
    {
        return (PayoutProviderId::AdyenConnect, false);
    }
    (default_provider, true)
}

/// Restore the exact raw bytes of a webhook body from its transport form.
///
/// Event transports serialize the captured request body; a body that crossed
/// a JSON boundary arrives either as a plain string or as a Node-style
/// serialized buffer (`{"type": "Buffer", "data": [...]}`). Signature
/// verification operates on exact bytes, so both forms are reconstituted
/// rather than re-encoded.
pub fn reconstitute_raw_body(raw_data: &serde_json::Value) -> RouterResult<Vec<u8>> {
    match raw_data {
        serde_json::Value::String(body) => Ok(body.clone().into_bytes()),
        serde_json::Value::Object(map)
            if map.get("type").and_then(serde_json::Value::as_str) == Some("Buffer") =>
        {
            let data = map
                .get("data")
                .and_then(serde_json::Value::as_array)
                .ok_or_else(|| {
                    report!(errors::ApiErrorResponse::InvalidRequestData {
                        message: "Serialized buffer carries no `data` array".to_string(),
                    })
                })?;
            data.iter()
                .map(|byte| {
                    byte.as_u64()
                        .and_then(|byte| u8::try_from(byte).ok())
                        .ok_or_else(|| {
                            report!(errors::ApiErrorResponse::InvalidRequestData {
                                message: "Serialized buffer holds a non-byte value".to_string(),
                            })
                        })
                })
                .collect()
        }
        _ => Err(report!(errors::ApiErrorResponse::InvalidRequestData {
            message: "Webhook body is neither a string nor a serialized buffer".to_string(),
        })),
    }
}

/// Core of webhook ingestion, once exact bytes and headers are at hand.
#[instrument(skip_all)]
pub async fn incoming_webhook_core(
    state: &AppState,
    headers: &http::HeaderMap,
    body: &[u8],
) -> RouterResult<()> {
    let default_provider = state.conf.webhooks.default_provider;
    let (provider_id, default_provider_assumed) = infer_provider(headers, default_provider);

    if default_provider_assumed {
        // Deliberate backward-compatibility behavior; the log is the signal
        // for spotting misrouted events from providers with unexpected
        // header names.
        logger::warn!(
            %provider_id,
            default_provider_assumed = true,
            "no recognizable webhook signature header; applying configured default provider"
        );
    }

    let request = IncomingWebhookRequestDetails { headers, body };
    let action_and_data =
        payouts::get_payout_webhook_action_and_data(state, provider_id, &request)?;

    match action_and_data {
        Some(event) => {
            state
                .webhook_processor
                .process_payout_webhook_action(provider_id, event)
                .await
        }
        None => {
            logger::debug!(%provider_id, "webhook event not actionable; ignoring");
            Ok(())
        }
    }
}

/// Entry point for the event subscription: a captured webhook request whose
/// body may have been buffer-serialized in transit.
#[instrument(skip_all)]
pub async fn process_payout_account_webhook_event(
    state: &AppState,
    event: api::PayoutWebhookEvent,
) -> RouterResult<()> {
    let body = reconstitute_raw_body(&event.raw_data)?;

    let mut headers = http::HeaderMap::new();
    for (name, value) in &event.headers {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::header::HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    incoming_webhook_core(state, &headers, &body).await
}

#[cfg(test)]
mod webhook_inference_tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> http::HeaderMap {
        let mut map = http::HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn stripe_signature_header_selects_stripe() {
        let (provider, defaulted) = infer_provider(
            &headers(&[("stripe-signature", "t=1,v1=abc")]),
            PayoutProviderId::AdyenConnect,
        );
        assert_eq!(provider, PayoutProviderId::StripeConnect);
        assert!(!defaulted);
    }

    #[test]
    fn hmac_and_adyen_signature_headers_select_adyen() {
        for header in ["hmacsignature", "adyen-signature"] {
            let (provider, defaulted) = infer_provider(
                &headers(&[(header, "c2ln")]),
                PayoutProviderId::StripeConnect,
            );
            assert_eq!(provider, PayoutProviderId::AdyenConnect, "header {header}");
            assert!(!defaulted);
        }
    }

    #[test]
    fn unrecognized_headers_fall_back_to_configured_default() {
        let (provider, defaulted) = infer_provider(
            &headers(&[("content-type", "application/json")]),
            PayoutProviderId::StripeConnect,
        );
        assert_eq!(provider, PayoutProviderId::StripeConnect);
        assert!(defaulted);

        let (provider, _) = infer_provider(&headers(&[]), PayoutProviderId::AdyenConnect);
        assert_eq!(provider, PayoutProviderId::AdyenConnect);
    }

    #[test]
    fn string_body_reconstitutes_to_exact_bytes() {
        let body = reconstitute_raw_body(&serde_json::json!(r#"{"id":"evt_1"}"#)).unwrap();
        assert_eq!(body, br#"{"id":"evt_1"}"#);
    }

    #[test]
    fn serialized_buffer_reconstitutes_to_exact_bytes() {
        let original = br#"{"id":"evt_1"}"#;
        let buffer = serde_json::json!({
            "type": "Buffer",
            "data": original.to_vec(),
        });
        assert_eq!(reconstitute_raw_body(&buffer).unwrap(), original);
    }

    #[test]
    fn non_buffer_object_is_rejected() {
        let err = reconstitute_raw_body(&serde_json::json!({ "id": "evt_1" })).unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::InvalidRequestData { .. }
        ));
    }

    #[test]
    fn buffer_with_out_of_range_value_is_rejected() {
        let buffer = serde_json::json!({ "type": "Buffer", "data": [72, 300] });
        assert!(reconstitute_raw_body(&buffer).is_err());
    }
}
