//! Payout account lifecycle: creation, provider reconciliation, onboarding.

pub mod validator;

use std::sync::Arc;

use async_trait::async_trait;
use common_enums::PayoutProviderId;
use error_stack::report;
use masking::ExposeInterface;
use payout_env::{instrument, logger, tracing};
use sellerpay_interfaces::{api::PayoutProvider, types as provider_types};

use crate::{
    core::{
        errors::{self, ConnectorErrorExt, RouterResult, StorageErrorExt},
        workflows::{self, WorkflowStep},
    },
    db::StorageInterface,
    routes::AppState,
    types::{api, storage},
    utils::OptionExt,
};

/// Create a payout account for a seller.
///
/// Two-phase create-then-confirm: the internal row must exist before the
/// provider call so its id can travel as idempotency/linking context, and the
/// external account must exist before the row gets its real reference. The
/// insert step declares row deletion as its compensation, so a provider
/// failure leaves no orphaned placeholder behind.
#[instrument(skip_all)]
pub async fn create_payout_account(
    state: &AppState,
    req: api::CreatePayoutAccountRequest,
) -> RouterResult<api::PayoutAccountResponse> {
    validator::validate_create_request(&req)?;

    ensure_no_existing_account(state, &req.seller_id, req.payment_provider_id).await?;

    let adapter = state
        .registry
        .resolve(req.payment_provider_id)
        .map_err(|err| err.to_provider_failed_response(req.payment_provider_id))?
        .clone();

    let context = req
        .context
        .clone()
        .map(ExposeInterface::expose)
        .unwrap_or_else(|| serde_json::json!({}));

    let mut ctx = CreateAccountContext::default();
    let steps: Vec<Box<dyn WorkflowStep<CreateAccountContext>>> = vec![
        Box::new(InsertPlaceholderAccount {
            store: state.store.clone(),
            account: storage::PayoutAccountNew::pending(req.payment_provider_id, req.context),
        }),
        Box::new(ConfirmAccountWithProvider {
            store: state.store.clone(),
            adapter,
            provider_id: req.payment_provider_id,
            seller_id: req.seller_id,
            context,
        }),
    ];
    workflows::run_steps(&mut ctx, &steps).await?;

    ctx.account
        .map(api::PayoutAccountResponse::from)
        .ok_or_else(|| report!(errors::ApiErrorResponse::InternalServerError))
}

/// Reconcile an account's status and data against its provider.
///
/// The algorithm is provider-agnostic: readiness translation and the merge
/// policy both come from the resolved adapter.
#[instrument(skip_all, fields(payout_account_id = %account_id))]
pub async fn sync_payout_account(
    state: &AppState,
    account_id: &str,
) -> RouterResult<api::PayoutAccountResponse> {
    let account = state
        .store
        .find_payout_account_by_id(account_id)
        .await
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout account {account_id} does not exist"),
            })
        })?;

    let provider_id = account
        .payment_provider_id
        .get_required_value("payment_provider_id")?;
    let adapter = state
        .registry
        .resolve(provider_id)
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let incoming = adapter
        .get_account(&account.reference_id)
        .await
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let status = adapter.compute_account_status(&incoming);
    let existing = account
        .data
        .map(ExposeInterface::expose)
        .unwrap_or(serde_json::Value::Null);
    let merged = adapter.merge_account_data(existing, incoming);

    logger::info!(%provider_id, %status, "payout account reconciled");

    let updated = state
        .store
        .update_payout_account(
            account_id,
            storage::PayoutAccountUpdate::Sync {
                status,
                data: merged.into(),
            },
        )
        .await
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout account {account_id} does not exist"),
            })
        })?;

    Ok(updated.into())
}

/// Initialize (or refresh) hosted onboarding for an account. Re-initialization
/// updates the single onboarding row in place, never duplicates it.
#[instrument(skip_all)]
pub async fn initialize_onboarding(
    state: &AppState,
    req: api::InitializeOnboardingRequest,
) -> RouterResult<api::OnboardingResponse> {
    validator::validate_onboarding_request(&req)?;

    let existing = state
        .store
        .find_onboarding_by_account_id(&req.payout_account_id)
        .await
        .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

    let account = state
        .store
        .find_payout_account_by_id(&req.payout_account_id)
        .await
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout account {} does not exist", req.payout_account_id),
            })
        })?;

    let provider_id = account
        .payment_provider_id
        .get_required_value("payment_provider_id")?;
    let adapter = state
        .registry
        .resolve(provider_id)
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let context = req
        .context
        .clone()
        .map(ExposeInterface::expose)
        .unwrap_or_else(|| serde_json::json!({}));

    let response = adapter
        .initialize_onboarding(provider_types::InitializeOnboardingRequest {
            reference_id: account.reference_id.clone(),
            context,
        })
        .await
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let onboarding = match existing {
        Some(onboarding) => onboarding,
        None => state
            .store
            .insert_onboarding(storage::OnboardingNew::for_account(account.id))
            .await
            .map_err(|err| {
                err.to_duplicate_response(errors::ApiErrorResponse::GenericDuplicateError {
                    message: "Onboarding already exists for this payout account".to_string(),
                })
            })?,
    };

    let updated = state
        .store
        .update_onboarding(
            &onboarding.id,
            storage::OnboardingUpdate {
                data: response.data.into(),
                context: req.context,
            },
        )
        .await
        .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

    Ok(updated.into())
}

/// Read path used by the HTTP layer.
#[instrument(skip_all)]
pub async fn retrieve_payout_account(
    state: &AppState,
    account_id: &str,
) -> RouterResult<api::PayoutAccountResponse> {
    state
        .store
        .find_payout_account_by_id(account_id)
        .await
        .map(api::PayoutAccountResponse::from)
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout account {account_id} does not exist"),
            })
        })
}

/// One account per seller and provider: reject before any provider call when
/// the seller already holds an account on this rail. Accounts on other rails
/// are fine.
async fn ensure_no_existing_account(
    state: &AppState,
    seller_id: &str,
    provider_id: PayoutProviderId,
) -> RouterResult<()> {
    let links = state
        .store
        .find_seller_account_links_by_seller_id(seller_id)
        .await
        .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

    for link in links {
        let account = match state
            .store
            .find_payout_account_by_id(&link.payout_account_id)
            .await
        {
            Ok(account) => account,
            // A dangling link cannot hold a provider; skip it.
            Err(err) if err.current_context().is_db_not_found() => continue,
            Err(err) => {
                return Err(err.change_context(errors::ApiErrorResponse::InternalServerError))
            }
        };
        if account.payment_provider_id == Some(provider_id) {
            return Err(report!(errors::ApiErrorResponse::GenericDuplicateError {
                message: format!(
                    "Seller {seller_id} already has a payout account with {provider_id}"
                ),
            }));
        }
    }
    Ok(())
}

#[derive(Default)]
struct CreateAccountContext {
    account: Option<storage::PayoutAccount>,
}

struct InsertPlaceholderAccount {
    store: Arc<dyn StorageInterface>,
    account: storage::PayoutAccountNew,
}

#[async_trait]
impl WorkflowStep<CreateAccountContext> for InsertPlaceholderAccount {
    fn name(&self) -> &'static str {
        "insert_placeholder_account"
    }

    async fn execute(&self, ctx: &mut CreateAccountContext) -> RouterResult<()> {
        let account = self
            .store
            .insert_payout_account(self.account.clone())
            .await
            .map_err(|err| {
                err.to_duplicate_response(errors::ApiErrorResponse::GenericDuplicateError {
                    message: "Payout account already exists".to_string(),
                })
            })?;
        ctx.account = Some(account);
        Ok(())
    }

    async fn compensate(&self, ctx: &mut CreateAccountContext) -> RouterResult<()> {
        if let Some(account) = ctx.account.take() {
            self.store
                .delete_payout_account(&account.id)
                .await
                .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;
            logger::info!(payout_account_id = %account.id, "placeholder payout account rolled back");
        }
        Ok(())
    }
}

struct ConfirmAccountWithProvider {
    store: Arc<dyn StorageInterface>,
    adapter: Arc<dyn PayoutProvider>,
    provider_id: PayoutProviderId,
    seller_id: String,
    context: serde_json::Value,
}

#[async_trait]
impl WorkflowStep<CreateAccountContext> for ConfirmAccountWithProvider {
    fn name(&self) -> &'static str {
        "confirm_account_with_provider"
    }

    async fn execute(&self, ctx: &mut CreateAccountContext) -> RouterResult<()> {
        let account_id = ctx
            .account
            .as_ref()
            .map(|account| account.id.clone())
            .ok_or_else(|| report!(errors::ApiErrorResponse::InternalServerError))?;

        let response = self
            .adapter
            .create_payout_account(provider_types::CreatePayoutAccountRequest {
                internal_account_id: account_id.clone(),
                context: self.context.clone(),
            })
            .await
            .map_err(|err| err.to_provider_failed_response(self.provider_id))?;

        self.store
            .update_payout_account(
                &account_id,
                storage::PayoutAccountUpdate::ProviderConfirm {
                    reference_id: response.external_reference_id,
                    data: response.data.into(),
                },
            )
            .await
            .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

        self.store
            .insert_seller_account_link(storage::SellerAccountLinkNew::link(
                self.seller_id.clone(),
                account_id.clone(),
            ))
            .await
            .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

        let confirmed = self
            .store
            .find_payout_account_by_id(&account_id)
            .await
            .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;
        ctx.account = Some(confirmed);
        Ok(())
    }
}

#[cfg(test)]
mod payout_account_tests {
    use std::sync::{atomic::Ordering, Arc};

    use common_enums::PayoutAccountStatus;
    use masking::{PeekInterface, Secret};
    use serde_json::json;

    use super::*;
    use crate::{
        core::test_utils::{mk_state, MockProvider},
        db::{InMemoryStore, PayoutAccountInterface},
    };

    fn create_request(seller_id: &str, provider: PayoutProviderId) -> api::CreatePayoutAccountRequest {
        api::CreatePayoutAccountRequest {
            seller_id: seller_id.to_string(),
            payment_provider_id: provider,
            context: Some(Secret::new(json!({ "country": "de" }))),
        }
    }

    #[tokio::test]
    async fn create_confirms_reference_and_links_seller() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_storage(store.clone());

        let account = create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap();

        assert_eq!(account.status, PayoutAccountStatus::Pending);
        assert_eq!(account.reference_id, "ext_mock");
        assert!(account.data.is_some());

        let links = store.seller_account_links.lock().await;
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].seller_id, "seller_1");
        assert_eq!(links[0].payout_account_id, account.id);
    }

    #[tokio::test]
    async fn provider_failure_leaves_no_orphan_account() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(
            MockProvider::new(PayoutProviderId::StripeConnect).with_failing_account_create(),
        )])
        .with_storage(store.clone());

        let err = create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::ExternalProviderError { .. }
        ));
        assert!(store.payout_accounts.lock().await.is_empty());
        assert!(store.seller_account_links.lock().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_seller_provider_pair_is_rejected_before_the_provider_call() {
        let adapter = Arc::new(MockProvider::new(PayoutProviderId::StripeConnect));
        let state = mk_state(vec![adapter.clone()]);

        create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap();
        assert_eq!(adapter.create_account_calls.load(Ordering::SeqCst), 1);

        let err = create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::GenericDuplicateError { .. }
        ));
        // The provider never saw the second attempt.
        assert_eq!(adapter.create_account_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn seller_may_hold_accounts_on_different_rails() {
        let state = mk_state(vec![
            Arc::new(MockProvider::new(PayoutProviderId::StripeConnect)),
            Arc::new(MockProvider::new(PayoutProviderId::AdyenConnect)),
        ]);

        create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap();
        create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::AdyenConnect),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn onboarding_is_idempotent_and_updates_in_place() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_storage(store.clone());

        let account = create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap();

        let request = api::InitializeOnboardingRequest {
            payout_account_id: account.id.clone(),
            context: Some(Secret::new(json!({ "return_url": "https://shop.test/done" }))),
        };
        let first = initialize_onboarding(&state, request.clone()).await.unwrap();
        let second = initialize_onboarding(&state, request).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.onboardings.lock().await.len(), 1);
        // The record reflects the second provider response.
        assert_eq!(
            second.data.unwrap().peek()["url"],
            json!("https://onboarding.test/2")
        );
    }

    #[tokio::test]
    async fn sync_applies_adapter_status_and_merge() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(
            MockProvider::new(PayoutProviderId::StripeConnect)
                .with_account_object(json!({ "id": "ext_mock", "ready": true })),
        )])
        .with_storage(store.clone());

        let account = create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap();

        let synced = sync_payout_account(&state, &account.id).await.unwrap();

        assert_eq!(synced.status, PayoutAccountStatus::Active);
        let data = synced.data.unwrap();
        // The adapter's merge ran over the previously stored blob.
        assert_eq!(data.peek()["latest"]["ready"], json!(true));
        assert_eq!(data.peek()["requested_by"], json!(account.id));
    }

    #[tokio::test]
    async fn sync_downgrades_when_readiness_regresses() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(
            MockProvider::new(PayoutProviderId::StripeConnect)
                .with_account_object(json!({ "id": "ext_mock", "ready": false })),
        )])
        .with_storage(store.clone());

        let account = create_payout_account(
            &state,
            create_request("seller_1", PayoutProviderId::StripeConnect),
        )
        .await
        .unwrap();

        // Force the account active, then observe a provider object that no
        // longer satisfies readiness.
        store
            .update_payout_account(
                &account.id,
                storage::PayoutAccountUpdate::Sync {
                    status: PayoutAccountStatus::Active,
                    data: Secret::new(json!({})),
                },
            )
            .await
            .unwrap();

        let synced = sync_payout_account(&state, &account.id).await.unwrap();
        assert_eq!(synced.status, PayoutAccountStatus::Pending);
    }

    #[tokio::test]
    async fn sync_requires_a_provider_on_the_account() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_storage(store.clone());

        store
            .insert_payout_account(storage::PayoutAccountNew {
                id: "pacct_legacy".to_string(),
                payment_provider_id: None,
                reference_id: "ref_legacy".to_string(),
                status: PayoutAccountStatus::Pending,
                context: None,
            })
            .await
            .unwrap();

        let err = sync_payout_account(&state, "pacct_legacy").await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::MissingRequiredField {
                field_name: "payment_provider_id"
            }
        ));
    }

    #[tokio::test]
    async fn sync_of_unknown_account_is_not_found() {
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))]);
        let err = sync_payout_account(&state, "pacct_missing").await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::GenericNotFoundError { .. }
        ));
    }
}
