//! Helpers shared by the connector implementations.

use bytes::Bytes;
use common_utils::errors::CustomResult;
use error_stack::{report, ResultExt};
use payout_env::logger;
use sellerpay_interfaces::errors::ConnectorError;

/// Await an outbound provider call, surfacing transport failures as
/// [`ConnectorError::RequestExecutionFailed`].
pub(crate) async fn send_request(
    connector: &'static str,
    request: reqwest::RequestBuilder,
) -> CustomResult<reqwest::Response, ConnectorError> {
    request
        .send()
        .await
        .change_context(ConnectorError::RequestExecutionFailed)
        .attach_printable_lazy(|| format!("Failed to reach {connector}"))
}

/// Read the response body and fold non-2xx statuses into
/// [`ConnectorError::ProcessingStepFailed`] carrying the raw provider bytes,
/// so callers can attach the provider's own error payload to the report.
pub(crate) async fn handle_response(
    connector: &'static str,
    response: reqwest::Response,
) -> CustomResult<Bytes, ConnectorError> {
    let status_code = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .change_context(ConnectorError::ResponseDeserializationFailed)?;

    logger::info!(connector, status_code, "connector response received");

    if (200..300).contains(&status_code) {
        Ok(body)
    } else {
        Err(report!(ConnectorError::ProcessingStepFailed(Some(body)))
            .attach_printable(format!("{connector} responded with HTTP {status_code}")))
    }
}

/// HMAC-SHA256 signature of `message` under `key`.
pub(crate) fn sign_hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let signing_key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key);
    ring::hmac::sign(&signing_key, message).as_ref().to_vec()
}

/// Constant-time HMAC-SHA256 verification.
pub(crate) fn verify_hmac_sha256(key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let verification_key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key);
    ring::hmac::verify(&verification_key, message, signature).is_ok()
}

/// Fetch a header as a UTF-8 string, if present.
pub(crate) fn get_header_value<'a>(headers: &'a http::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Extract a required string field from a caller-supplied context object.
pub(crate) fn get_context_str<'a>(
    context: &'a serde_json::Value,
    field_name: &'static str,
) -> CustomResult<&'a str, ConnectorError> {
    get_optional_context_str(context, field_name)
        .ok_or(report!(ConnectorError::MissingRequiredField { field_name }))
}

/// Extract an optional string field from a caller-supplied context object.
pub(crate) fn get_optional_context_str<'a>(
    context: &'a serde_json::Value,
    field_name: &str,
) -> Option<&'a str> {
    context.get(field_name).and_then(serde_json::Value::as_str)
}
