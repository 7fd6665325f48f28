use error_stack::report;
use payout_env::{instrument, tracing};

use super::InMemoryStore;
use crate::{
    core::errors::{CustomResult, StorageError},
    types::storage,
};

#[async_trait::async_trait]
pub trait PayoutAccountInterface {
    async fn insert_payout_account(
        &self,
        account: storage::PayoutAccountNew,
    ) -> CustomResult<storage::PayoutAccount, StorageError>;

    async fn find_payout_account_by_id(
        &self,
        account_id: &str,
    ) -> CustomResult<storage::PayoutAccount, StorageError>;

    async fn update_payout_account(
        &self,
        account_id: &str,
        update: storage::PayoutAccountUpdate,
    ) -> CustomResult<storage::PayoutAccount, StorageError>;

    /// Remove the row entirely. Only used as the compensating action of a
    /// failed creation.
    async fn delete_payout_account(&self, account_id: &str) -> CustomResult<(), StorageError>;
}

#[async_trait::async_trait]
impl PayoutAccountInterface for InMemoryStore {
    #[instrument(skip_all)]
    async fn insert_payout_account(
        &self,
        account: storage::PayoutAccountNew,
    ) -> CustomResult<storage::PayoutAccount, StorageError> {
        let mut accounts = self.payout_accounts.lock().await;
        if accounts.iter().any(|existing| existing.id == account.id) {
            return Err(report!(StorageError::DuplicateValue {
                entity: "payout_account",
                key: Some(account.id),
            }));
        }
        let account = account.into_account();
        accounts.push(account.clone());
        Ok(account)
    }

    #[instrument(skip_all)]
    async fn find_payout_account_by_id(
        &self,
        account_id: &str,
    ) -> CustomResult<storage::PayoutAccount, StorageError> {
        self.payout_accounts
            .lock()
            .await
            .iter()
            .find(|account| account.id == account_id)
            .cloned()
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "payout account {account_id}"
                )))
            })
    }

    #[instrument(skip_all)]
    async fn update_payout_account(
        &self,
        account_id: &str,
        update: storage::PayoutAccountUpdate,
    ) -> CustomResult<storage::PayoutAccount, StorageError> {
        let mut accounts = self.payout_accounts.lock().await;
        let account = accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or_else(|| {
                report!(StorageError::ValueNotFound(format!(
                    "payout account {account_id}"
                )))
            })?;
        update.apply(account);
        Ok(account.clone())
    }

    #[instrument(skip_all)]
    async fn delete_payout_account(&self, account_id: &str) -> CustomResult<(), StorageError> {
        let mut accounts = self.payout_accounts.lock().await;
        let before = accounts.len();
        accounts.retain(|account| account.id != account_id);
        if accounts.len() == before {
            return Err(report!(StorageError::ValueNotFound(format!(
                "payout account {account_id}"
            ))));
        }
        Ok(())
    }
}
