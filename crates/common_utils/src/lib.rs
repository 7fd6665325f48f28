#![warn(missing_docs)]

//! Utilities shared across the payout workspace.

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod fp_utils;
pub mod pii;

/// Date-time utilities.
pub mod date_time {
    use time::{OffsetDateTime, PrimitiveDateTime};

    /// Current UTC timestamp without the offset component.
    pub fn now() -> PrimitiveDateTime {
        let utc = OffsetDateTime::now_utc();
        PrimitiveDateTime::new(utc.date(), utc.time())
    }
}

/// Generate a nanoid with the given prefix and length
#[inline]
pub fn generate_id(length: usize, prefix: &str) -> String {
    format!("{}_{}", prefix, nanoid::nanoid!(length, &consts::ALPHABETS))
}

/// Generate a nanoid with the given prefix and a default length
#[inline]
pub fn generate_id_with_default_len(prefix: &str) -> String {
    let len = consts::ID_LENGTH;
    format!("{}_{}", prefix, nanoid::nanoid!(len, &consts::ALPHABETS))
}

#[cfg(test)]
mod id_tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_length() {
        let id = generate_id(consts::ID_LENGTH, "pacct");
        let (prefix, rest) = id.split_once('_').unwrap();
        assert_eq!(prefix, "pacct");
        assert_eq!(rest.len(), consts::ID_LENGTH);
    }

    #[test]
    fn generated_ids_are_unique() {
        let first = generate_id_with_default_len("po");
        let second = generate_id_with_default_len("po");
        assert_ne!(first, second);
    }
}
