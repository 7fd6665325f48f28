//! The provider registry: one adapter instance per payout rail.
//!
//! Built once during process initialization and shared immutably from then
//! on. Resolution failures are explicit; there is no fallback provider, and
//! every payout account must name a concrete rail.

use std::{collections::HashMap, sync::Arc};

use common_enums::PayoutProviderId;
use error_stack::report;
use sellerpay_connectors::{AdyenConnect, StripeConnect};
use sellerpay_interfaces::{api::PayoutProvider, errors::ConnectorError};

use crate::{configs::settings::Providers, core::errors::CustomResult};

pub struct ProviderRegistry {
    providers: HashMap<PayoutProviderId, Arc<dyn PayoutProvider>>,
}

impl ProviderRegistry {
    /// Build the full registry from provider settings.
    pub fn new(providers: &Providers) -> Self {
        Self::from_providers(vec![
            Arc::new(StripeConnect::new(providers.stripe_connect.clone())),
            Arc::new(AdyenConnect::new(providers.adyen_connect.clone())),
        ])
    }

    /// Build a registry from explicit adapter instances. Tests use this to
    /// register scripted providers.
    pub fn from_providers(providers: Vec<Arc<dyn PayoutProvider>>) -> Self {
        Self {
            providers: providers
                .into_iter()
                .map(|provider| (provider.id(), provider))
                .collect(),
        }
    }

    /// Resolve the adapter serving `provider_id`.
    pub fn resolve(
        &self,
        provider_id: PayoutProviderId,
    ) -> CustomResult<&Arc<dyn PayoutProvider>, ConnectorError> {
        self.providers.get(&provider_id).ok_or_else(|| {
            report!(ConnectorError::UnknownProvider {
                provider_id: provider_id.to_string(),
            })
        })
    }
}

#[cfg(test)]
mod registry_tests {
    use super::*;
    use crate::configs::settings::Providers;

    #[test]
    fn default_registry_resolves_both_rails() {
        let registry = ProviderRegistry::new(&Providers::default());
        assert!(registry.resolve(PayoutProviderId::StripeConnect).is_ok());
        assert!(registry.resolve(PayoutProviderId::AdyenConnect).is_ok());
    }

    #[test]
    fn missing_adapter_is_an_explicit_error() {
        let registry = ProviderRegistry::from_providers(vec![]);
        let err = registry
            .resolve(PayoutProviderId::AdyenConnect)
            .err()
            .unwrap();
        assert!(matches!(
            err.current_context(),
            ConnectorError::UnknownProvider { .. }
        ));
    }
}
