use std::sync::Arc;

use actix_web::{web, Scope};

use super::{health, payout_accounts, payouts, webhooks};
use crate::{
    configs::settings::Settings,
    core::{
        registry::ProviderRegistry,
        webhooks::{NoopPayoutWebhookProcessor, PayoutWebhookProcessor},
    },
    db::{InMemoryStore, StorageInterface},
};

/// Shared state of the payout router. The registry is built once here and
/// never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub conf: Arc<Settings>,
    pub store: Arc<dyn StorageInterface>,
    pub registry: Arc<ProviderRegistry>,
    pub webhook_processor: Arc<dyn PayoutWebhookProcessor>,
}

impl AppState {
    pub fn new(conf: Settings) -> Self {
        let registry = Arc::new(ProviderRegistry::new(&conf.providers));
        Self {
            conf: Arc::new(conf),
            store: Arc::new(InMemoryStore::new()),
            registry,
            webhook_processor: Arc::new(NoopPayoutWebhookProcessor),
        }
    }

    /// Swap in the deployment's storage implementation.
    pub fn with_storage(mut self, store: Arc<dyn StorageInterface>) -> Self {
        self.store = store;
        self
    }

    /// Attach the workflow engine that consumes webhook actions.
    pub fn with_webhook_processor(mut self, processor: Arc<dyn PayoutWebhookProcessor>) -> Self {
        self.webhook_processor = processor;
        self
    }
}

pub struct PayoutAccounts;

impl PayoutAccounts {
    pub fn server(state: AppState) -> Scope {
        web::scope("/payout_accounts")
            .app_data(web::Data::new(state))
            .service(
                web::resource("")
                    .route(web::post().to(payout_accounts::payout_accounts_create)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(payout_accounts::payout_accounts_retrieve)),
            )
            .service(
                web::resource("/{id}/sync")
                    .route(web::post().to(payout_accounts::payout_accounts_sync)),
            )
            .service(
                web::resource("/{id}/onboarding")
                    .route(web::post().to(payout_accounts::payout_accounts_onboarding)),
            )
    }
}

pub struct Payouts;

impl Payouts {
    pub fn server(state: AppState) -> Scope {
        web::scope("/payouts")
            .app_data(web::Data::new(state))
            .service(web::resource("").route(web::post().to(payouts::payouts_create)))
            .service(web::resource("/{id}").route(web::get().to(payouts::payouts_retrieve)))
            .service(
                web::resource("/{id}/reversals")
                    .route(web::post().to(payouts::payout_reversals_create)),
            )
    }
}

pub struct Webhooks;

impl Webhooks {
    pub fn server(state: AppState) -> Scope {
        web::scope("/webhooks")
            .app_data(web::Data::new(state))
            .service(
                web::resource("/payouts").route(web::post().to(webhooks::receive_payout_webhook)),
            )
    }
}

pub struct Health;

impl Health {
    pub fn server(state: AppState) -> Scope {
        web::scope("/health")
            .app_data(web::Data::new(state))
            .service(web::resource("").route(web::get().to(health::health)))
    }
}
