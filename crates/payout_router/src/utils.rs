//! Small helpers used across the core flows.

use error_stack::report;

use crate::core::errors;

/// Extract a required value, failing with the API-level missing-field error.
pub trait OptionExt<T> {
    fn get_required_value(
        self,
        field_name: &'static str,
    ) -> errors::RouterResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    #[track_caller]
    fn get_required_value(self, field_name: &'static str) -> errors::RouterResult<T> {
        self.ok_or_else(|| report!(errors::ApiErrorResponse::MissingRequiredField { field_name }))
    }
}
