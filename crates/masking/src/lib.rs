#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Personal Identifiable Information protection. Wrapper types and traits for
//! secret management which help ensure secrets aren't accidentally logged or
//! otherwise exposed. Inspired by secrecy.
//!

mod strategy;

pub use strategy::{Strategy, WithType, WithoutType};

mod abs;
pub use abs::{ExposeInterface, ExposeOptionInterface, PeekInterface};

mod secret;
pub use secret::Secret;

mod serde;
pub use self::serde::SerializableSecret;
