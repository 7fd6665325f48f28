use payout_env::{instrument, tracing};

use super::InMemoryStore;
use crate::{
    core::errors::{CustomResult, StorageError},
    types::storage,
};

#[async_trait::async_trait]
pub trait SellerAccountLinkInterface {
    async fn insert_seller_account_link(
        &self,
        link: storage::SellerAccountLinkNew,
    ) -> CustomResult<storage::SellerAccountLink, StorageError>;

    async fn find_seller_account_links_by_seller_id(
        &self,
        seller_id: &str,
    ) -> CustomResult<Vec<storage::SellerAccountLink>, StorageError>;
}

#[async_trait::async_trait]
impl SellerAccountLinkInterface for InMemoryStore {
    #[instrument(skip_all)]
    async fn insert_seller_account_link(
        &self,
        link: storage::SellerAccountLinkNew,
    ) -> CustomResult<storage::SellerAccountLink, StorageError> {
        let mut links = self.seller_account_links.lock().await;
        let link = link.into_link();
        links.push(link.clone());
        Ok(link)
    }

    #[instrument(skip_all)]
    async fn find_seller_account_links_by_seller_id(
        &self,
        seller_id: &str,
    ) -> CustomResult<Vec<storage::SellerAccountLink>, StorageError> {
        Ok(self
            .seller_account_links
            .lock()
            .await
            .iter()
            .filter(|link| link.seller_id == seller_id)
            .cloned()
            .collect())
    }
}
