use actix_web::{web, HttpResponse};
use payout_env::{instrument, tracing, Flow};

use super::app::AppState;
use crate::{core::payouts, services, types::api};

/// Payouts - Create
#[instrument(skip_all, fields(flow = ?Flow::PayoutsCreate))]
pub async fn payouts_create(
    state: web::Data<AppState>,
    json_payload: web::Json<api::CreatePayoutRequest>,
) -> HttpResponse {
    match payouts::create_payout(&state, json_payload.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}

/// Payouts - Retrieve
#[instrument(skip_all, fields(flow = ?Flow::PayoutsRetrieve))]
pub async fn payouts_retrieve(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match payouts::retrieve_payout(&state, &path.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct ReversalBody {
    amount: i64,
    currency_code: common_enums::Currency,
}

/// Payout reversals - Create
#[instrument(skip_all, fields(flow = ?Flow::PayoutReversalsCreate))]
pub async fn payout_reversals_create(
    state: web::Data<AppState>,
    path: web::Path<String>,
    json_payload: web::Json<ReversalBody>,
) -> HttpResponse {
    let body = json_payload.into_inner();
    let request = api::CreatePayoutReversalRequest {
        payout_id: path.into_inner(),
        amount: body.amount,
        currency_code: body.currency_code,
    };
    match payouts::create_payout_reversal(&state, request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}
