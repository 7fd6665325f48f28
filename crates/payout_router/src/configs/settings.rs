//! Settings structs and the configuration loader: a TOML file per
//! environment, overridable through `SELLERPAY`-prefixed environment
//! variables (`__` as the nesting separator).

use std::path::PathBuf;

use common_enums::PayoutProviderId;
use common_utils::errors::ApplicationError;
use sellerpay_connectors::{
    adyen_connect::AdyenConnectConfig, stripe_connect::StripeConnectConfig,
};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "SELLERPAY";

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: Server,
    pub log: payout_env::Log,
    pub providers: Providers,
    pub webhooks: Webhooks,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct Providers {
    pub stripe_connect: StripeConnectConfig,
    pub adyen_connect: AdyenConnectConfig,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Webhooks {
    /// Provider assumed when an inbound webhook carries no recognizable
    /// signature header. A backward-compatibility shim kept explicit here;
    /// every use is logged.
    pub default_provider: PayoutProviderId,
}

impl Default for Webhooks {
    fn default() -> Self {
        Self {
            default_provider: PayoutProviderId::StripeConnect,
        }
    }
}

impl Settings {
    /// Load settings for the current environment.
    pub fn new() -> Result<Self, ApplicationError> {
        Self::with_config_path(None)
    }

    pub fn with_config_path(config_path: Option<PathBuf>) -> Result<Self, ApplicationError> {
        let config_path = config_path.unwrap_or_else(|| {
            payout_env::workspace_path()
                .join("config")
                .join(payout_env::config_file_name())
        });

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .map_err(|error| ApplicationError::ConfigurationError(error.to_string()))?;

        config
            .try_deserialize()
            .map_err(|error| ApplicationError::ConfigurationError(error.to_string()))
    }
}
