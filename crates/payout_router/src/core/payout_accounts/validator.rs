use common_utils::fp_utils::when;
use error_stack::report;
use masking::PeekInterface;

use crate::{
    core::errors::{self, RouterResult},
    types::api,
};

/// Context objects must be JSON objects: every adapter reads them by key.
fn validate_context(context: Option<&common_utils::pii::SecretSerdeValue>) -> RouterResult<()> {
    when(
        context.is_some_and(|value| !value.peek().is_object()),
        || {
            Err(report!(errors::ApiErrorResponse::InvalidRequestData {
                message: "`context` must be a JSON object".to_string(),
            }))
        },
    )
}

pub fn validate_create_request(req: &api::CreatePayoutAccountRequest) -> RouterResult<()> {
    when(req.seller_id.trim().is_empty(), || {
        Err(report!(errors::ApiErrorResponse::MissingRequiredField {
            field_name: "seller_id",
        }))
    })?;
    validate_context(req.context.as_ref())
}

pub fn validate_onboarding_request(req: &api::InitializeOnboardingRequest) -> RouterResult<()> {
    when(req.payout_account_id.trim().is_empty(), || {
        Err(report!(errors::ApiErrorResponse::MissingRequiredField {
            field_name: "payout_account_id",
        }))
    })?;
    validate_context(req.context.as_ref())
}

#[cfg(test)]
mod validator_tests {
    use common_enums::PayoutProviderId;
    use masking::Secret;

    use super::*;

    #[test]
    fn empty_seller_id_is_rejected() {
        let req = api::CreatePayoutAccountRequest {
            seller_id: "  ".to_string(),
            payment_provider_id: PayoutProviderId::StripeConnect,
            context: None,
        };
        assert!(validate_create_request(&req).is_err());
    }

    #[test]
    fn non_object_context_is_rejected() {
        let req = api::CreatePayoutAccountRequest {
            seller_id: "seller_1".to_string(),
            payment_provider_id: PayoutProviderId::StripeConnect,
            context: Some(Secret::new(serde_json::json!("not an object"))),
        };
        assert!(validate_create_request(&req).is_err());
    }

    #[test]
    fn object_context_passes() {
        let req = api::CreatePayoutAccountRequest {
            seller_id: "seller_1".to_string(),
            payment_provider_id: PayoutProviderId::AdyenConnect,
            context: Some(Secret::new(serde_json::json!({ "country": "de" }))),
        };
        assert!(validate_create_request(&req).is_ok());
    }
}
