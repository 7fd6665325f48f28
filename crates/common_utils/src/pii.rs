//! Personal Identifiable Information wrapper types.

use masking::Secret;

/// A serde-compatible JSON value that must not appear in logs. Provider
/// account payloads and caller-supplied contexts travel as this type.
pub type SecretSerdeValue = Secret<serde_json::Value>;
