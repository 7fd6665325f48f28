//! Error taxonomy of the provider adapter boundary.

/// Failures raised by a provider adapter, or while resolving one.
#[allow(missing_docs)] // Only to prevent warnings about enum variants not being documented
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("No payout provider is registered for `{provider_id}`")]
    UnknownProvider {
        /// The id that failed to resolve.
        provider_id: String,
    },
    #[error("Error while obtaining URL for the integration")]
    FailedToObtainIntegrationUrl,
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    #[error("Failed to execute the connector request")]
    RequestExecutionFailed,
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    #[error("Failed to execute a processing step: {0:?}")]
    ProcessingStepFailed(Option<bytes::Bytes>),
    #[error("The connector returned an unexpected response: {0:?}")]
    UnexpectedResponseError(bytes::Bytes),
    #[error("Missing required field: {field_name}")]
    MissingRequiredField {
        /// Name of the absent field.
        field_name: &'static str,
    },
    #[error("Missing connector transfer ID")]
    MissingConnectorTransferID,
    #[error("Failed to decode webhook event body")]
    WebhookBodyDecodingFailed,
    #[error("Signature not found for incoming webhook")]
    WebhookSignatureNotFound,
    #[error("Failed to verify webhook source")]
    WebhookSourceVerificationFailed,
    #[error("Incoming webhook event type not found")]
    WebhookEventTypeNotFound,
}
