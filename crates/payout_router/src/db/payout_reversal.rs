use error_stack::report;
use payout_env::{instrument, tracing};

use super::InMemoryStore;
use crate::{
    core::errors::{CustomResult, StorageError},
    types::storage,
};

#[async_trait::async_trait]
pub trait PayoutReversalInterface {
    async fn insert_payout_reversal(
        &self,
        reversal: storage::PayoutReversalNew,
    ) -> CustomResult<storage::PayoutReversal, StorageError>;

    async fn find_payout_reversals_by_payout_id(
        &self,
        payout_id: &str,
    ) -> CustomResult<Vec<storage::PayoutReversal>, StorageError>;
}

#[async_trait::async_trait]
impl PayoutReversalInterface for InMemoryStore {
    #[instrument(skip_all)]
    async fn insert_payout_reversal(
        &self,
        reversal: storage::PayoutReversalNew,
    ) -> CustomResult<storage::PayoutReversal, StorageError> {
        let mut reversals = self.payout_reversals.lock().await;
        if reversals.iter().any(|existing| existing.id == reversal.id) {
            return Err(report!(StorageError::DuplicateValue {
                entity: "payout_reversal",
                key: Some(reversal.id),
            }));
        }
        let reversal = reversal.into_reversal();
        reversals.push(reversal.clone());
        Ok(reversal)
    }

    #[instrument(skip_all)]
    async fn find_payout_reversals_by_payout_id(
        &self,
        payout_id: &str,
    ) -> CustomResult<Vec<storage::PayoutReversal>, StorageError> {
        Ok(self
            .payout_reversals
            .lock()
            .await
            .iter()
            .filter(|reversal| reversal.payout_id == payout_id)
            .cloned()
            .collect())
    }
}
