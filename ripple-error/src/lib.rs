// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the Ripple dependency-tracking library
//!
//! The tracking core performs no I/O, so the error surface is narrow: a consumer can fail
//! while reacting to a broadcast, and an evaluation frame can be popped that was never pushed.
//! Both are represented by [`RippleError`].
//!
//! # Examples
//!
//! ```
//! use ripple_error::{RippleError, Result};
//!
//! fn react() -> Result<()> {
//!     Err(RippleError::reaction_failed("consumer 3 lost its render target"))
//! }
//!
//! assert!(react().unwrap_err().is_recoverable());
//! ```

/// Root error type for all Ripple operations
#[derive(Debug, thiserror::Error)]
pub enum RippleError {
    /// A consumer failed while reacting to a broadcast
    ///
    /// The broadcast that observed this error stopped at the failing consumer;
    /// consumers later in the snapshot were not notified.
    #[error("Reaction failed: {context}")]
    ReactionFailed {
        /// Which consumer failed and why
        context: String,
    },

    /// An evaluation frame was popped with no frame left to restore
    ///
    /// Only produced by the strict pop; the regular pop fails soft.
    #[error("Evaluation context underflow: {context}")]
    ContextUnderflow {
        /// Where the unbalanced pop happened
        context: String,
    },

    /// Custom error from consumer code
    ///
    /// Wraps errors produced inside `react()` implementations so they can be
    /// propagated through `broadcast()` unchanged.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RippleError {
    /// Create a reaction failure with the given context
    pub fn reaction_failed(context: impl Into<String>) -> Self {
        Self::ReactionFailed {
            context: context.into(),
        }
    }

    /// Create a context underflow error with the given context
    pub fn context_underflow(context: impl Into<String>) -> Self {
        Self::ContextUnderflow {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Check if this is a recoverable error
    ///
    /// Reaction failures are tied to one broadcast; the next broadcast may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReactionFailed { .. } | Self::UserError(_))
    }

    /// Check if this error indicates a permanent failure
    ///
    /// An underflow points at broken frame discipline in the caller and will not go away
    /// on retry.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::ContextUnderflow { .. })
    }
}

/// Specialized Result type for Ripple operations
///
/// # Examples
///
/// ```
/// use ripple_error::Result;
///
/// fn react() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, RippleError>;

/// Extension trait for converting errors into `RippleError`
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`, so consumer code can
/// turn its own failures into a `RippleError` with `.into_ripple()`.
pub trait IntoRippleError {
    /// Convert this error into a `RippleError` with additional context
    fn into_ripple_error(self, context: &str) -> RippleError;

    /// Convert this error into a `RippleError` without additional context
    fn into_ripple(self) -> RippleError
    where
        Self: Sized,
    {
        self.into_ripple_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoRippleError for E {
    fn into_ripple_error(self, context: &str) -> RippleError {
        if context.is_empty() {
            RippleError::user_error(self)
        } else {
            RippleError::reaction_failed(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
///
/// A `UserError` becomes a `ReactionFailed` carrying the context; other variants pass
/// through untouched.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(RippleError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(RippleError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RippleError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| attach_context(e.into(), context.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| attach_context(e.into(), f()))
    }
}

fn attach_context(error: RippleError, context: String) -> RippleError {
    match error {
        RippleError::UserError(inner) => RippleError::ReactionFailed {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}
