use common_utils::{errors::ApplicationError, ext_traits::ConfigExt, fp_utils::when};

impl super::settings::Settings {
    /// Check configuration values before the server starts; a bad value here
    /// should fail the boot, not the first request.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.server.validate()?;
        self.providers.validate()
    }
}

impl super::settings::Server {
    pub fn validate(&self) -> Result<(), ApplicationError> {
        when(self.host.is_default_or_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "server host must not be empty".into(),
            ))
        })?;
        when(self.port == 0, || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "server port must not be 0".into(),
            ))
        })
    }
}

impl super::settings::Providers {
    /// Credentials may stay empty in development; URLs must always be
    /// well-formed enough to build requests against.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        when(self.stripe_connect.base_url.is_default_or_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "stripe_connect base_url must not be empty".into(),
            ))
        })?;
        when(self.adyen_connect.lem_base_url.is_default_or_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "adyen_connect lem_base_url must not be empty".into(),
            ))
        })?;
        when(self.adyen_connect.btl_base_url.is_default_or_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "adyen_connect btl_base_url must not be empty".into(),
            ))
        })
    }
}

#[cfg(test)]
mod validation_tests {
    use crate::configs::settings::Settings;

    #[test]
    fn default_settings_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
    }
}
