//! Storage interface of the payout core.
//!
//! The deployment's transactional store is an external collaborator that
//! implements these traits; [`InMemoryStore`] is the reference implementation
//! backing tests and local development.

pub mod onboarding;
pub mod payout_account;
pub mod payout_reversal;
pub mod payouts;
pub mod seller_link;

use std::sync::Arc;

use futures::lock::Mutex;

use crate::types::storage;

pub use self::{
    onboarding::OnboardingInterface, payout_account::PayoutAccountInterface,
    payout_reversal::PayoutReversalInterface, payouts::PayoutInterface,
    seller_link::SellerAccountLinkInterface,
};

/// The full storage surface the payout core depends on. Every method mutates
/// or reads at most one row; no cross-row transaction is required anywhere in
/// the core.
pub trait StorageInterface:
    PayoutAccountInterface
    + OnboardingInterface
    + PayoutInterface
    + PayoutReversalInterface
    + SellerAccountLinkInterface
    + Send
    + Sync
    + 'static
{
}

/// Vec-per-table store guarded by async mutexes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    pub payout_accounts: Arc<Mutex<Vec<storage::PayoutAccount>>>,
    pub onboardings: Arc<Mutex<Vec<storage::Onboarding>>>,
    pub payouts: Arc<Mutex<Vec<storage::Payout>>>,
    pub payout_reversals: Arc<Mutex<Vec<storage::PayoutReversal>>>,
    pub seller_account_links: Arc<Mutex<Vec<storage::SellerAccountLink>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageInterface for InMemoryStore {}
