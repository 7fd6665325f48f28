//! Persisted entities with their `New`/`Update` companions.
//!
//! The `data` blobs are provider-specific opaque state; only the adapter that
//! produced a blob may interpret it.

use common_enums::{Currency, PayoutAccountStatus, PayoutProviderId};
use common_utils::{date_time, generate_id_with_default_len, pii};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::consts;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayoutAccount {
    pub id: String,
    /// Selects the adapter; set at creation and immutable thereafter. Kept
    /// optional to stay faithful to pre-migration rows that never named a
    /// provider: every operation on such an account fails with an
    /// invalid-data error instead of guessing.
    pub payment_provider_id: Option<PayoutProviderId>,
    /// External provider account identifier. Starts as a placeholder until
    /// the first successful provider call replaces it.
    pub reference_id: String,
    pub data: Option<pii::SecretSerdeValue>,
    pub status: PayoutAccountStatus,
    pub context: Option<pii::SecretSerdeValue>,
    pub created_at: PrimitiveDateTime,
    pub modified_at: PrimitiveDateTime,
}

#[derive(Clone, Debug)]
pub struct PayoutAccountNew {
    pub id: String,
    pub payment_provider_id: Option<PayoutProviderId>,
    pub reference_id: String,
    pub status: PayoutAccountStatus,
    pub context: Option<pii::SecretSerdeValue>,
}

impl PayoutAccountNew {
    /// A fresh pending account with a placeholder reference derived from its
    /// own id.
    pub fn pending(
        payment_provider_id: PayoutProviderId,
        context: Option<pii::SecretSerdeValue>,
    ) -> Self {
        let id = generate_id_with_default_len(consts::PAYOUT_ACCOUNT_ID_PREFIX);
        let reference_id = format!("{}_{id}", consts::PLACEHOLDER_REFERENCE_PREFIX);
        Self {
            id,
            payment_provider_id: Some(payment_provider_id),
            reference_id,
            status: PayoutAccountStatus::Pending,
            context,
        }
    }

    pub(crate) fn into_account(self) -> PayoutAccount {
        let now = date_time::now();
        PayoutAccount {
            id: self.id,
            payment_provider_id: self.payment_provider_id,
            reference_id: self.reference_id,
            data: None,
            status: self.status,
            context: self.context,
            created_at: now,
            modified_at: now,
        }
    }
}

#[derive(Clone, Debug)]
pub enum PayoutAccountUpdate {
    /// The provider confirmed account creation: store its reference and
    /// serializable state.
    ProviderConfirm {
        reference_id: String,
        data: pii::SecretSerdeValue,
    },
    /// A reconciliation pass recomputed status and merged fresh provider
    /// state.
    Sync {
        status: PayoutAccountStatus,
        data: pii::SecretSerdeValue,
    },
}

impl PayoutAccountUpdate {
    pub(crate) fn apply(self, account: &mut PayoutAccount) {
        match self {
            Self::ProviderConfirm { reference_id, data } => {
                account.reference_id = reference_id;
                account.data = Some(data);
            }
            Self::Sync { status, data } => {
                account.status = status;
                account.data = Some(data);
            }
        }
        account.modified_at = date_time::now();
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Onboarding {
    pub id: String,
    pub payout_account_id: String,
    pub data: Option<pii::SecretSerdeValue>,
    pub context: Option<pii::SecretSerdeValue>,
    pub created_at: PrimitiveDateTime,
    pub modified_at: PrimitiveDateTime,
}

#[derive(Clone, Debug)]
pub struct OnboardingNew {
    pub id: String,
    pub payout_account_id: String,
}

impl OnboardingNew {
    pub fn for_account(payout_account_id: String) -> Self {
        Self {
            id: generate_id_with_default_len(consts::ONBOARDING_ID_PREFIX),
            payout_account_id,
        }
    }

    pub(crate) fn into_onboarding(self) -> Onboarding {
        let now = date_time::now();
        Onboarding {
            id: self.id,
            payout_account_id: self.payout_account_id,
            data: None,
            context: None,
            created_at: now,
            modified_at: now,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OnboardingUpdate {
    pub data: pii::SecretSerdeValue,
    pub context: Option<pii::SecretSerdeValue>,
}

impl OnboardingUpdate {
    pub(crate) fn apply(self, onboarding: &mut Onboarding) {
        onboarding.data = Some(self.data);
        onboarding.context = self.context;
        onboarding.modified_at = date_time::now();
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub payout_account_id: String,
    pub amount: i64,
    pub commission_amount: i64,
    pub currency_code: Currency,
    /// Provider transfer object; carries the transfer id at `data.id`.
    pub data: pii::SecretSerdeValue,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, Debug)]
pub struct PayoutNew {
    pub id: String,
    pub payout_account_id: String,
    pub amount: i64,
    pub commission_amount: i64,
    pub currency_code: Currency,
    pub data: pii::SecretSerdeValue,
}

impl PayoutNew {
    pub(crate) fn into_payout(self) -> Payout {
        Payout {
            id: self.id,
            payout_account_id: self.payout_account_id,
            amount: self.amount,
            commission_amount: self.commission_amount,
            currency_code: self.currency_code,
            data: self.data,
            created_at: date_time::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayoutReversal {
    pub id: String,
    pub payout_id: String,
    pub amount: i64,
    pub currency_code: Currency,
    pub data: pii::SecretSerdeValue,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, Debug)]
pub struct PayoutReversalNew {
    pub id: String,
    pub payout_id: String,
    pub amount: i64,
    pub currency_code: Currency,
    pub data: pii::SecretSerdeValue,
}

impl PayoutReversalNew {
    pub(crate) fn into_reversal(self) -> PayoutReversal {
        PayoutReversal {
            id: self.id,
            payout_id: self.payout_id,
            amount: self.amount,
            currency_code: self.currency_code,
            data: self.data,
            created_at: date_time::now(),
        }
    }
}

/// Association between a seller identity and a payout account. The seller
/// itself is owned elsewhere; this table is only queried to find accounts by
/// seller and extended when an account is created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SellerAccountLink {
    pub id: String,
    pub seller_id: String,
    pub payout_account_id: String,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, Debug)]
pub struct SellerAccountLinkNew {
    pub id: String,
    pub seller_id: String,
    pub payout_account_id: String,
}

impl SellerAccountLinkNew {
    pub fn link(seller_id: String, payout_account_id: String) -> Self {
        Self {
            id: generate_id_with_default_len(consts::SELLER_LINK_ID_PREFIX),
            seller_id,
            payout_account_id,
        }
    }

    pub(crate) fn into_link(self) -> SellerAccountLink {
        SellerAccountLink {
            id: self.id,
            seller_id: self.seller_id,
            payout_account_id: self.payout_account_id,
            created_at: date_time::now(),
        }
    }
}
