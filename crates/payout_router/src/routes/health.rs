use actix_web::{web, HttpResponse};
use payout_env::{instrument, logger, tracing, Flow};

use super::app::AppState;

/// Liveness probe.
#[instrument(skip_all, fields(flow = ?Flow::HealthCheck))]
pub async fn health(_state: web::Data<AppState>) -> HttpResponse {
    logger::info!("health was called");
    HttpResponse::Ok().body("health is good")
}
