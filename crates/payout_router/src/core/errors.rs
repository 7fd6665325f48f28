//! Error taxonomy of the payout core.

pub mod utils;

use actix_web::{body::BoxBody, http::StatusCode, HttpResponse, ResponseError};

pub use common_utils::errors::CustomResult;
pub use sellerpay_interfaces::errors::ConnectorError;

pub use self::utils::{ConnectorErrorExt, StorageErrorExt};

/// Result of a core operation, surfaced to the HTTP layer.
pub type RouterResult<T> = CustomResult<T, ApiErrorResponse>;

/// Failures of the storage layer, with discriminators the core uses to map
/// them onto the API taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("ValueNotFound: {0}")]
    ValueNotFound(String),
    #[error("DuplicateValue: {entity} already exists {key:?}")]
    DuplicateValue {
        entity: &'static str,
        key: Option<String>,
    },
    #[error("Serialization failure")]
    SerializationFailed,
    #[error("Unexpected storage failure")]
    KVError,
}

impl StorageError {
    pub fn is_db_not_found(&self) -> bool {
        matches!(self, Self::ValueNotFound(_))
    }

    pub fn is_db_unique_violation(&self) -> bool {
        matches!(self, Self::DuplicateValue { .. })
    }
}

/// API-level errors: what a caller of this core observes. Mapped onto HTTP
/// statuses at the route boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiErrorResponse {
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: &'static str },
    #[error("{message}")]
    InvalidRequestData { message: String },
    #[error("{message}")]
    GenericNotFoundError { message: String },
    #[error("{message}")]
    GenericDuplicateError { message: String },
    #[error("Provider error from {provider}")]
    ExternalProviderError { provider: String },
    #[error("Something went wrong")]
    InternalServerError,
}

impl ApiErrorResponse {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } | Self::InvalidRequestData { .. } => "invalid_data",
            Self::GenericNotFoundError { .. } => "not_found",
            Self::GenericDuplicateError { .. } => "duplicate",
            Self::ExternalProviderError { .. } => "provider_error",
            Self::InternalServerError => "internal_error",
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

impl ResponseError for ApiErrorResponse {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingRequiredField { .. } | Self::InvalidRequestData { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::GenericNotFoundError { .. } => StatusCode::NOT_FOUND,
            Self::GenericDuplicateError { .. } => StatusCode::CONFLICT,
            Self::ExternalProviderError { .. } => StatusCode::BAD_GATEWAY,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ErrorBody {
            code: self.error_code(),
            message: &message,
        })
    }
}
