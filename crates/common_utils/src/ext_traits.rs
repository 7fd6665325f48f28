//! Extension traits for foreign types used across the workspace.

use error_stack::{report, ResultExt};
use serde::Deserialize;

use crate::errors::{self, CustomResult};

/// Extending functionalities of `Option<T>` for validation-style extraction
pub trait OptionExt<T> {
    /// Unwrap the option or fail with a `MissingRequiredField` validation
    /// error naming the field.
    fn get_required_value(self, field_name: &str) -> CustomResult<T, errors::ValidationError>;
}

impl<T> OptionExt<T> for Option<T>
where
    T: std::fmt::Debug,
{
    #[track_caller]
    fn get_required_value(self, field_name: &str) -> CustomResult<T, errors::ValidationError> {
        match self {
            Some(value) => Ok(value),
            None => Err(report!(errors::ValidationError::MissingRequiredField {
                field_name: field_name.to_string(),
            })),
        }
    }
}

/// Extending functionalities of `bytes::Bytes` for performing parsing
pub trait BytesExt {
    /// Convert `bytes::Bytes` into type `<T>` using `serde::Deserialize`
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>;
}

impl BytesExt for bytes::Bytes {
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>,
    {
        use bytes::Buf;

        serde_json::from_slice::<T>(self.chunk())
            .change_context(errors::ParsingError)
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from bytes"))
    }
}

/// Extending functionalities of `[u8]` for performing parsing
pub trait ByteSliceExt {
    /// Convert `[u8]` into type `<T>` by using `serde::Deserialize`
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>;
}

impl ByteSliceExt for [u8] {
    #[track_caller]
    fn parse_struct<'de, T>(&'de self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: Deserialize<'de>,
    {
        serde_json::from_slice(self)
            .change_context(errors::ParsingError)
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from &[u8]"))
    }
}

/// Extending functionalities of `serde_json::Value` for performing parsing
pub trait ValueExt {
    /// Convert `serde_json::Value` into type `<T>` by using `serde::Deserialize`
    fn parse_value<T>(self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned;
}

impl ValueExt for serde_json::Value {
    fn parse_value<T>(self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned,
    {
        let debug = format!("Unable to parse {type_name} from serde_json::Value: {self:?}");
        serde_json::from_value::<T>(self)
            .change_context(errors::ParsingError)
            .attach_printable_lazy(|| debug)
    }
}

/// Extending functionalities of `String` for performing parsing
pub trait StringExt {
    /// Convert `String` into type `<T>` using `serde::Deserialize`
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned;
}

impl StringExt for String {
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, errors::ParsingError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_json::from_str(self)
            .change_context(errors::ParsingError)
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from string {self:?}"))
    }
}

/// Extending functionalities of string-ish configuration values
pub trait ConfigExt {
    /// Whether the value is empty after trimming, or still a known placeholder
    /// default.
    fn is_default_or_empty(&self) -> bool;
}

impl ConfigExt for String {
    fn is_default_or_empty(&self) -> bool {
        let trimmed = self.trim();
        trimmed.is_empty() || trimmed == "replace-me"
    }
}

impl ConfigExt for masking::Secret<String> {
    fn is_default_or_empty(&self) -> bool {
        use masking::PeekInterface;

        self.peek().is_default_or_empty()
    }
}

#[cfg(test)]
mod ext_traits_tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Probe {
        id: String,
    }

    #[test]
    fn parse_struct_from_slice() {
        let parsed: Probe = br#"{"id":"tr_1"}"#.parse_struct("Probe").unwrap();
        assert_eq!(parsed, Probe { id: "tr_1".into() });
    }

    #[test]
    fn parse_struct_reports_type_name_on_failure() {
        let err = ByteSliceExt::parse_struct::<Probe>(&b"not json"[..], "Probe").unwrap_err();
        assert!(format!("{err:?}").contains("Probe"));
    }

    #[test]
    fn get_required_value_names_missing_field() {
        let missing: Option<String> = None;
        let err = missing.get_required_value("seller_id").unwrap_err();
        assert!(err.to_string().contains("seller_id"));
    }
}
