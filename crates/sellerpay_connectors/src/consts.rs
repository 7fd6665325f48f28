//! Constants shared by the adapters.

/// Base64 engine used for webhook signature comparison.
pub const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;
