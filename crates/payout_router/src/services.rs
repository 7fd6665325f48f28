//! Service-layer helpers for the HTTP surface.

use actix_web::{HttpResponse, ResponseError};
use payout_env::logger;

use crate::core::errors::ApiErrorResponse;

/// Log the full report and answer with the API error's HTTP form.
pub fn log_and_return_error_response(
    error: error_stack::Report<ApiErrorResponse>,
) -> HttpResponse {
    logger::error!(?error);
    error.current_context().error_response()
}
