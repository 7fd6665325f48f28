//! Payout execution: transfers to sellers, their reversals, and webhook
//! dispatch to the owning adapter.

use common_enums::PayoutProviderId;
use common_utils::{fp_utils::when, generate_id_with_default_len};
use error_stack::report;
use masking::{ExposeInterface, PeekInterface};
use payout_env::{instrument, logger, tracing};
use sellerpay_interfaces::{
    types as provider_types,
    webhooks::{IncomingWebhookRequestDetails, WebhookActionAndData},
};

use crate::{
    consts,
    core::errors::{self, ConnectorErrorExt, RouterResult, StorageErrorExt},
    routes::AppState,
    types::{api, storage},
    utils::OptionExt,
};

/// Create a payout against an account. The Payout row exists only once the
/// provider confirmed the transfer; a provider failure leaves no record.
///
/// Order-level workflows do not call this directly but through
/// [`crate::core::workflows::create_payout_step`], which converts failure
/// into a reportable `{payout, failed}` result.
#[instrument(skip_all)]
pub async fn create_payout(
    state: &AppState,
    req: api::CreatePayoutRequest,
) -> RouterResult<api::PayoutResponse> {
    when(req.amount <= 0, || {
        Err(report!(errors::ApiErrorResponse::InvalidRequestData {
            message: "`amount` must be a positive amount in minor units".to_string(),
        }))
    })?;

    let account = state
        .store
        .find_payout_account_by_id(&req.account_id)
        .await
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout account {} does not exist", req.account_id),
            })
        })?;

    let provider_id = account
        .payment_provider_id
        .get_required_value("payment_provider_id")?;
    let adapter = state
        .registry
        .resolve(provider_id)
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let response = adapter
        .create_payout(provider_types::CreatePayoutRequest {
            account_reference_id: account.reference_id.clone(),
            amount: req.amount,
            commission_amount: req.commission_amount,
            currency: req.currency_code,
            transaction_id: req.transaction_id.clone(),
            source_transaction: req.source_transaction.clone(),
            payment_session: req.payment_session.clone().map(ExposeInterface::expose),
        })
        .await
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    logger::info!(
        %provider_id,
        transfer_id = response.transfer_id().unwrap_or_default(),
        "payout confirmed by provider"
    );

    let payout = state
        .store
        .insert_payout(storage::PayoutNew {
            id: generate_id_with_default_len(consts::PAYOUT_ID_PREFIX),
            payout_account_id: account.id,
            amount: req.amount,
            commission_amount: req.commission_amount,
            currency_code: req.currency_code,
            data: response.data.into(),
        })
        .await
        .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

    Ok(payout.into())
}

/// Reverse a payout, fully or partially. Requires the payout to carry its
/// provider transfer reference and the owning account to name a provider.
#[instrument(skip_all)]
pub async fn create_payout_reversal(
    state: &AppState,
    req: api::CreatePayoutReversalRequest,
) -> RouterResult<api::PayoutReversalResponse> {
    when(req.amount <= 0, || {
        Err(report!(errors::ApiErrorResponse::InvalidRequestData {
            message: "`amount` must be a positive amount in minor units".to_string(),
        }))
    })?;

    let payout = state
        .store
        .find_payout_by_id(&req.payout_id)
        .await
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout {} does not exist", req.payout_id),
            })
        })?;

    let transfer_id = payout
        .data
        .peek()
        .get("id")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            report!(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!(
                    "Payout {} carries no provider transfer reference",
                    req.payout_id
                ),
            })
        })?;

    let account = state
        .store
        .find_payout_account_by_id(&payout.payout_account_id)
        .await
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout account {} does not exist", payout.payout_account_id),
            })
        })?;

    let provider_id = account
        .payment_provider_id
        .get_required_value("payment_provider_id")?;
    let adapter = state
        .registry
        .resolve(provider_id)
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let reversal_data = adapter
        .reverse_payout(provider_types::ReversePayoutRequest {
            transfer_id,
            amount: req.amount,
            currency: req.currency_code,
        })
        .await
        .map_err(|err| err.to_provider_failed_response(provider_id))?;

    let reversal = state
        .store
        .insert_payout_reversal(storage::PayoutReversalNew {
            id: generate_id_with_default_len(consts::PAYOUT_REVERSAL_ID_PREFIX),
            payout_id: payout.id,
            amount: req.amount,
            currency_code: req.currency_code,
            data: reversal_data.into(),
        })
        .await
        .map_err(|err| err.change_context(errors::ApiErrorResponse::InternalServerError))?;

    Ok(reversal.into())
}

/// Read path used by the HTTP layer.
#[instrument(skip_all)]
pub async fn retrieve_payout(
    state: &AppState,
    payout_id: &str,
) -> RouterResult<api::PayoutResponse> {
    state
        .store
        .find_payout_by_id(payout_id)
        .await
        .map(api::PayoutResponse::from)
        .map_err(|err| {
            err.to_not_found_response(errors::ApiErrorResponse::GenericNotFoundError {
                message: format!("Payout {payout_id} does not exist"),
            })
        })
}

/// Pure dispatch to the resolved adapter's webhook parser.
pub fn get_payout_webhook_action_and_data(
    state: &AppState,
    provider_id: PayoutProviderId,
    request: &IncomingWebhookRequestDetails<'_>,
) -> RouterResult<Option<WebhookActionAndData>> {
    let adapter = state
        .registry
        .resolve(provider_id)
        .map_err(|err| err.to_provider_failed_response(provider_id))?;
    adapter
        .get_webhook_action_and_data(request)
        .map_err(|err| err.to_provider_failed_response(provider_id))
}

#[cfg(test)]
mod payout_tests {
    use std::sync::Arc;

    use common_enums::{Currency, PayoutAccountStatus, PayoutProviderId};
    use masking::{PeekInterface, Secret};
    use serde_json::json;

    use super::*;
    use crate::{
        core::{
            payout_accounts, test_utils::{mk_state, MockProvider},
            workflows,
        },
        db::{InMemoryStore, PayoutAccountInterface, PayoutInterface},
    };

    async fn seed_account(state: &AppState) -> String {
        payout_accounts::create_payout_account(
            state,
            api::CreatePayoutAccountRequest {
                seller_id: "seller_1".to_string(),
                payment_provider_id: PayoutProviderId::StripeConnect,
                context: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn payout_request(account_id: &str) -> api::CreatePayoutRequest {
        api::CreatePayoutRequest {
            account_id: account_id.to_string(),
            amount: 10_000,
            commission_amount: 1_000,
            currency_code: Currency::EUR,
            transaction_id: "order_42".to_string(),
            source_transaction: None,
            payment_session: None,
        }
    }

    #[tokio::test]
    async fn payout_row_exists_only_after_provider_confirmation() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_storage(store.clone());
        let account_id = seed_account(&state).await;

        let payout = create_payout(&state, payout_request(&account_id)).await.unwrap();

        assert_eq!(payout.amount, 10_000);
        assert_eq!(payout.commission_amount, 1_000);
        assert_eq!(payout.data.peek()["id"], json!("tr_mock"));
        assert_eq!(store.payouts.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_provider_payout_is_reported_not_thrown() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(
            MockProvider::new(PayoutProviderId::StripeConnect).with_failing_payout(),
        )])
        .with_storage(store.clone());
        let account_id = seed_account(&state).await;

        let result = workflows::create_payout_step(&state, payout_request(&account_id)).await;

        assert!(result.failed);
        assert!(result.payout.is_none());
        assert!(store.payouts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn payout_against_unknown_account_is_not_found() {
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))]);
        let err = create_payout(&state, payout_request("pacct_missing"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::GenericNotFoundError { .. }
        ));
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))]);
        let mut req = payout_request("pacct_any");
        req.amount = 0;
        let err = create_payout(&state, req).await.unwrap_err();
        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::InvalidRequestData { .. }
        ));
    }

    #[tokio::test]
    async fn reversal_requires_a_provider_transfer_reference() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_storage(store.clone());
        let account_id = seed_account(&state).await;

        // A payout whose provider payload never carried a transfer id.
        store
            .insert_payout(storage::PayoutNew {
                id: "po_no_ref".to_string(),
                payout_account_id: account_id,
                amount: 5_000,
                commission_amount: 0,
                currency_code: Currency::EUR,
                data: Secret::new(json!({ "amount": 5_000 })),
            })
            .await
            .unwrap();

        let err = create_payout_reversal(
            &state,
            api::CreatePayoutReversalRequest {
                payout_id: "po_no_ref".to_string(),
                amount: 5_000,
                currency_code: Currency::EUR,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::GenericNotFoundError { .. }
        ));
        assert!(store.payout_reversals.lock().await.is_empty());
    }

    #[tokio::test]
    async fn reversal_records_the_provider_payload() {
        let store = Arc::new(InMemoryStore::new());
        let state = mk_state(vec![Arc::new(MockProvider::new(
            PayoutProviderId::StripeConnect,
        ))])
        .with_storage(store.clone());
        let account_id = seed_account(&state).await;
        let payout = create_payout(&state, payout_request(&account_id)).await.unwrap();

        let reversal = create_payout_reversal(
            &state,
            api::CreatePayoutReversalRequest {
                payout_id: payout.id.clone(),
                amount: 2_500,
                currency_code: Currency::EUR,
            },
        )
        .await
        .unwrap();

        assert_eq!(reversal.payout_id, payout.id);
        assert_eq!(reversal.amount, 2_500);
        assert_eq!(reversal.data.peek()["transfer"], json!("tr_mock"));
        assert_eq!(store.payout_reversals.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn reversal_requires_a_provider_on_the_owning_account() {
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
        store
            .insert_payout(storage::PayoutNew {
                id: "po_legacy".to_string(),
                payout_account_id: "pacct_legacy".to_string(),
                amount: 5_000,
                commission_amount: 0,
                currency_code: Currency::EUR,
                data: Secret::new(json!({ "id": "tr_legacy" })),
            })
            .await
            .unwrap();

        let err = create_payout_reversal(
            &state,
            api::CreatePayoutReversalRequest {
                payout_id: "po_legacy".to_string(),
                amount: 5_000,
                currency_code: Currency::EUR,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.current_context(),
            errors::ApiErrorResponse::MissingRequiredField {
                field_name: "payment_provider_id"
            }
        ));
    }
}
