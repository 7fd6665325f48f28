//!
//! Structure describing secret.
//!

use std::{fmt, marker::PhantomData};

use crate::{strategy::Strategy, PeekInterface};

/// Secret thing.
///
/// To get access to the value use the `expose()` method of
/// [`crate::ExposeInterface`], or `peek()` for a borrow.
///
/// The second generic parameter selects the masking strategy applied when the
/// secret is formatted with `Debug`; the default [`crate::WithType`] prints
/// the inner type name between asterisks.
pub struct Secret<S, I = crate::WithType>
where
    I: Strategy<S>,
{
    pub(crate) inner_secret: S,
    pub(crate) marker: PhantomData<I>,
}

impl<S, I> Secret<S, I>
where
    I: Strategy<S>,
{
    /// Take ownership of a secret value
    pub fn new(secret: S) -> Self {
        Self {
            inner_secret: secret,
            marker: PhantomData,
        }
    }

    /// Convert to a secret with a different masking strategy
    pub fn switch_strategy<J>(self) -> Secret<S, J>
    where
        J: Strategy<S>,
    {
        Secret::new(self.inner_secret)
    }
}

impl<S, I> PeekInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn peek(&self) -> &S {
        &self.inner_secret
    }
}

impl<S, I> From<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn from(secret: S) -> Self {
        Self::new(secret)
    }
}

impl<S, I> Clone for Secret<S, I>
where
    S: Clone,
    I: Strategy<S>,
{
    fn clone(&self) -> Self {
        Self {
            inner_secret: self.inner_secret.clone(),
            marker: PhantomData,
        }
    }
}

impl<S, I> PartialEq for Secret<S, I>
where
    S: PartialEq,
    I: Strategy<S>,
{
    fn eq(&self, other: &Self) -> bool {
        self.peek() == other.peek()
    }
}

impl<S, I> Eq for Secret<S, I>
where
    S: Eq,
    I: Strategy<S>,
{
}

impl<S, I> fmt::Debug for Secret<S, I>
where
    I: Strategy<S>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        I::fmt(&self.inner_secret, f)
    }
}

impl<S, I> Default for Secret<S, I>
where
    S: Default,
    I: Strategy<S>,
{
    fn default() -> Self {
        S::default().into()
    }
}

#[cfg(test)]
mod secret_tests {
    use super::*;
    use crate::ExposeInterface;

    #[test]
    fn debug_output_is_masked() {
        let secret: Secret<String> = Secret::new("sk_live_abc".to_string());
        let out = format!("{secret:?}");
        assert!(!out.contains("sk_live_abc"));
        assert!(out.contains("***"));
    }

    #[test]
    fn peek_and_expose_return_inner() {
        let secret: Secret<String> = Secret::new("whsec_123".to_string());
        assert_eq!(secret.peek(), "whsec_123");
        assert_eq!(secret.expose(), "whsec_123");
    }
}
