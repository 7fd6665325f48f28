use serde::{Deserialize, Serialize};

/// Payout rails a seller account can be enrolled with.
///
/// The set is closed on purpose: resolving an adapter for a provider id is a
/// total match over these variants, so adding a rail means adding a variant
/// here and an adapter implementation, never touching dispatch logic.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PayoutProviderId {
    StripeConnect,
    AdyenConnect,
}

/// Lifecycle status of a payout account.
///
/// `Pending` until a sync observes the provider-side account as ready to
/// receive funds. Derived by reconciliation, never asserted by callers.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PayoutAccountStatus {
    #[default]
    Pending,
    Active,
}

/// The transaction currencies supported for payouts.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[rustfmt::skip]
pub enum Currency {
    AED, AUD, BRL, CAD, CHF, CNY, CZK, DKK, EUR, GBP,
    HKD, HUF, IDR, ILS, INR, JPY, KRW, MXN, MYR, NOK,
    NZD, PHP, PLN, RON, SEK, SGD, THB, TRY,
    #[default]
    USD,
    VND, ZAR,
}

impl Currency {
    /// Lowercase ISO code, the form Stripe's API expects.
    pub fn to_lowercase(self) -> String {
        self.to_string().to_lowercase()
    }
}

#[cfg(test)]
mod enums_tests {
    use super::*;

    #[test]
    fn provider_id_snake_case_round_trip() {
        let serialized = serde_json::to_string(&PayoutProviderId::StripeConnect).unwrap();
        assert_eq!(serialized, r#""stripe_connect""#);
        let parsed: PayoutProviderId = serde_json::from_str(r#""adyen_connect""#).unwrap();
        assert_eq!(parsed, PayoutProviderId::AdyenConnect);
    }

    #[test]
    fn provider_id_display_matches_serde() {
        assert_eq!(PayoutProviderId::AdyenConnect.to_string(), "adyen_connect");
        assert_eq!(
            "stripe_connect".parse::<PayoutProviderId>().unwrap(),
            PayoutProviderId::StripeConnect
        );
    }

    #[test]
    fn currency_codes_are_uppercase() {
        assert_eq!(Currency::USD.to_string(), "USD");
        assert_eq!(Currency::EUR.to_lowercase(), "eur");
    }
}
