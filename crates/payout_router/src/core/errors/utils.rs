use common_enums::PayoutProviderId;

use crate::{core::errors, logger};

pub trait StorageErrorExt {
    fn to_not_found_response(
        self,
        not_found_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse>;

    fn to_duplicate_response(
        self,
        duplicate_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse>;
}

impl StorageErrorExt for error_stack::Report<errors::StorageError> {
    fn to_not_found_response(
        self,
        not_found_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse> {
        if self.current_context().is_db_not_found() {
            self.change_context(not_found_response)
        } else {
            self.change_context(errors::ApiErrorResponse::InternalServerError)
        }
    }

    fn to_duplicate_response(
        self,
        duplicate_response: errors::ApiErrorResponse,
    ) -> error_stack::Report<errors::ApiErrorResponse> {
        if self.current_context().is_db_unique_violation() {
            self.change_context(duplicate_response)
        } else {
            self.change_context(errors::ApiErrorResponse::InternalServerError)
        }
    }
}

pub trait ConnectorErrorExt {
    /// Fold an adapter failure into the API taxonomy: resolution misses are
    /// the caller's bad data, webhook verification problems are bad requests,
    /// everything else is the provider's fault.
    fn to_provider_failed_response(
        self,
        provider: PayoutProviderId,
    ) -> error_stack::Report<errors::ApiErrorResponse>;
}

impl ConnectorErrorExt for error_stack::Report<errors::ConnectorError> {
    fn to_provider_failed_response(
        self,
        provider: PayoutProviderId,
    ) -> error_stack::Report<errors::ApiErrorResponse> {
        let response = match self.current_context() {
            errors::ConnectorError::UnknownProvider { provider_id } => {
                errors::ApiErrorResponse::InvalidRequestData {
                    message: format!("No payout provider is registered for `{provider_id}`"),
                }
            }
            errors::ConnectorError::MissingRequiredField { field_name } => {
                errors::ApiErrorResponse::MissingRequiredField {
                    field_name: *field_name,
                }
            }
            errors::ConnectorError::WebhookSignatureNotFound
            | errors::ConnectorError::WebhookBodyDecodingFailed
            | errors::ConnectorError::WebhookSourceVerificationFailed
            | errors::ConnectorError::WebhookEventTypeNotFound => {
                errors::ApiErrorResponse::InvalidRequestData {
                    message: format!("Malformed {provider} webhook"),
                }
            }
            _ => {
                logger::error!(provider = %provider, "provider call failed");
                errors::ApiErrorResponse::ExternalProviderError {
                    provider: provider.to_string(),
                }
            }
        };
        self.change_context(response)
    }
}
