use error_stack::report;
use payout_env::{instrument, tracing};

use super::InMemoryStore;
use crate::{
    core::errors::{CustomResult, StorageError},
    types::storage,
};

#[async_trait::async_trait]
pub trait OnboardingInterface {
    async fn insert_onboarding(
        &self,
        onboarding: storage::OnboardingNew,
    ) -> CustomResult<storage::Onboarding, StorageError>;

    /// The (at most one) onboarding record of a payout account.
    async fn find_onboarding_by_account_id(
        &self,
        payout_account_id: &str,
    ) -> CustomResult<Option<storage::Onboarding>, StorageError>;

    async fn update_onboarding(
        &self,
        onboarding_id: &str,
        update: storage::OnboardingUpdate,
    ) -> CustomResult<storage::Onboarding, StorageError>;
}

#[async_trait::async_trait]
impl OnboardingInterface for InMemoryStore {
    #[instrument(skip_all)]
    async fn insert_onboarding(
        &self,
        onboarding: storage::OnboardingNew,
    ) -> CustomResult<storage::Onboarding, StorageError> {
        let mut onboardings = self.onboardings.lock().await;
        if onboardings
            .iter()
            .any(|existing| existing.payout_account_id == onboarding.payout_account_id)
        {
            return Err(report!(StorageError::DuplicateValue {
                entity: "onboarding",
                key: Some(onboarding.payout_account_id),
            }));
        }
        let onboarding = onboarding.into_onboarding();
        onboardings.push(onboarding.clone());
        Ok(onboarding)
    }

    #[instrument(skip_all)]
    async fn find_onboarding_by_account_id(
        &self,
        payout_account_id: &str,
    ) -> CustomResult<Option<storage::Onboarding>, StorageError> {
        Ok(self
            .onboardings
            .lock()
            .await
            .iter()
            .find(|onboarding| onboarding.payout_account_id == payout_account_id)
            .cloned())
    }

    #[instrument(skip_all)]
    async fn update_onboarding(
        &self,
        onboarding_id: &str,
        update: storage::OnboardingUpdate,
    ) -> CustomResult<storage::Onboarding, StorageError> {
        let mut onboardings = self.onboardings.lock().await;
        let onboarding = onboardings
            .iter_mut()
            .find(|onboarding| onboarding.id == onboarding_id)
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "onboarding {onboarding_id}"
                )))
            })?;
        update.apply(onboarding);
        Ok(onboarding.clone())
    }
}
