use error_stack::report;
use payout_env::{instrument, tracing};

use super::InMemoryStore;
use crate::{
    core::errors::{CustomResult, StorageError},
    types::storage,
};

#[async_trait::async_trait]
pub trait PayoutInterface {
    async fn insert_payout(
        &self,
        payout: storage::PayoutNew,
    ) -> CustomResult<storage::Payout, StorageError>;

    async fn find_payout_by_id(
        &self,
        payout_id: &str,
    ) -> CustomResult<storage::Payout, StorageError>;
}

#[async_trait::async_trait]
impl PayoutInterface for InMemoryStore {
    #[instrument(skip_all)]
    async fn insert_payout(
        &self,
        payout: storage::PayoutNew,
    ) -> CustomResult<storage::Payout, StorageError> {
        let mut payouts = self.payouts.lock().await;
        if payouts.iter().any(|existing| existing.id == payout.id) {
            return Err(report!(StorageError::DuplicateValue {
                entity: "payout",
                key: Some(payout.id),
            }));
        }
        let payout = payout.into_payout();
        payouts.push(payout.clone());
        Ok(payout)
    }

    #[instrument(skip_all)]
    async fn find_payout_by_id(
        &self,
        payout_id: &str,
    ) -> CustomResult<storage::Payout, StorageError> {
        self.payouts
            .lock()
            .await
            .iter()
            .find(|payout| payout.id == payout_id)
            .cloned()
            .ok_or_else(|| report!(StorageError::ValueNotFound(format!("payout {payout_id}"))))
    }
}
