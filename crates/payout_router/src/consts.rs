//! Workspace-internal constants.

/// Prefix of the reference a payout account carries between its local insert
/// and the provider's confirmation. A concurrent sync observing this prefix
/// would fail fast at the provider instead of clobbering the in-flight
/// creation.
pub const PLACEHOLDER_REFERENCE_PREFIX: &str = "pending_ref";

/// Id prefixes per entity.
pub const PAYOUT_ACCOUNT_ID_PREFIX: &str = "pacct";
pub const ONBOARDING_ID_PREFIX: &str = "onb";
pub const PAYOUT_ID_PREFIX: &str = "po";
pub const PAYOUT_REVERSAL_ID_PREFIX: &str = "porev";
pub const SELLER_LINK_ID_PREFIX: &str = "slink";
