use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse};
use payout_env::{instrument, tracing, Flow};

use super::app::AppState;
use crate::{core::webhooks, services, types::api};

/// Inbound payout webhook. The exact request body is captured as a
/// serialized buffer and handed to the event pipeline, the same path the
/// event subscription delivers on, so signature verification always sees the
/// bytes the provider signed.
#[instrument(skip_all, fields(flow = ?Flow::IncomingWebhookReceive))]
pub async fn receive_payout_webhook(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> HttpResponse {
    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();

    let event = api::PayoutWebhookEvent {
        raw_data: serde_json::json!({
            "type": "Buffer",
            "data": body.to_vec(),
        }),
        headers,
    };

    match webhooks::process_payout_account_webhook_event(&state, event).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(err) => services::log_and_return_error_response(err),
    }
}
