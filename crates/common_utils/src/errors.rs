//! Errors and error specific types for universal use

/// Custom Result
/// A custom datatype that wraps the error variant <E> into a report, allowing
/// error_stack::Report<E> specific extendability
///
/// Effectively, equivalent to `Result<T, error_stack::Report<E>>`
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Parsing of a value into a concrete type failed.
#[derive(Debug, thiserror::Error)]
#[error("Parsing error")]
pub struct ParsingError;

/// Validation errors.
#[allow(missing_docs)] // Only to prevent warnings about struct fields not being documented
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The provided input is missing a required field.
    #[error("Missing required field: {field_name}")]
    MissingRequiredField { field_name: String },

    /// An incorrect value was provided for the field specified by `field_name`.
    #[error("Incorrect value provided for field: {field_name}")]
    IncorrectValueProvided { field_name: &'static str },

    /// An invalid input was provided.
    #[error("{message}")]
    InvalidValue { message: String },
}

/// Errors while instantiating the application, usually from bad configuration.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// Invalid configuration value.
    #[error("Invalid value for configuration: {0}")]
    InvalidConfigurationValueError(String),

    /// Failure while reading or layering configuration sources.
    #[error("Failed to load configuration: {0}")]
    ConfigurationError(String),
}
