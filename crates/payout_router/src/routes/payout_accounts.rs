use actix_web::{web, HttpResponse};
use payout_env::{instrument, tracing, Flow};

use super::app::AppState;
use crate::{core::payout_accounts, services, types::api};

/// Payout accounts - Create
#[instrument(skip_all, fields(flow = ?Flow::PayoutAccountsCreate))]
pub async fn payout_accounts_create(
    state: web::Data<AppState>,
    json_payload: web::Json<api::CreatePayoutAccountRequest>,
) -> HttpResponse {
    match payout_accounts::create_payout_account(&state, json_payload.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}

/// Payout accounts - Retrieve
#[instrument(skip_all, fields(flow = ?Flow::PayoutAccountsRetrieve))]
pub async fn payout_accounts_retrieve(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match payout_accounts::retrieve_payout_account(&state, &path.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}

/// Payout accounts - Sync against the provider
#[instrument(skip_all, fields(flow = ?Flow::PayoutAccountsSync))]
pub async fn payout_accounts_sync(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match payout_accounts::sync_payout_account(&state, &path.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct OnboardingBody {
    context: Option<common_utils::pii::SecretSerdeValue>,
}

/// Payout accounts - Initialize hosted onboarding
#[instrument(skip_all, fields(flow = ?Flow::OnboardingInitialize))]
pub async fn payout_accounts_onboarding(
    state: web::Data<AppState>,
    path: web::Path<String>,
    json_payload: web::Json<OnboardingBody>,
) -> HttpResponse {
    let request = api::InitializeOnboardingRequest {
        payout_account_id: path.into_inner(),
        context: json_payload.into_inner().context,
    };
    match payout_accounts::initialize_onboarding(&state, request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => services::log_and_return_error_response(err),
    }
}
