// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core types for implicit reactive dependency tracking.
//!
//! - [`Subject`]: one per observable value; keeps the consumers that read it and notifies
//!   them on [`broadcast`](Subject::broadcast).
//! - [`EvaluationContext`]: who is evaluating right now, with a stack for nested
//!   evaluations. Subject reads consult it to subscribe the active consumer implicitly.
//! - [`Consumer`]: the capability a computation implements to be tracked and notified.
//!
//! ## Feature flags
//!
//! - `diagnostics` (default): sorts broadcast snapshots by consumer id in
//!   [`NotifyMode::Synchronous`] and reports evaluation-frame misuse.
//! - `tracing`: routes diagnostics through `tracing` instead of stderr.

#[macro_use]
mod logging;

pub mod config;
pub mod consumer;
pub mod context;
pub mod subject;

pub use self::config::{NotifyMode, ReactiveConfig};
pub use self::consumer::{same_consumer, Consumer, ConsumerId, ConsumerRef};
pub use self::context::{
    current_target, evaluate, pop_target, push_target, set_notify_mode, untracked,
    with_context, EvaluationContext, EvaluationFrame,
};
pub use self::subject::{Subject, SubjectId};
pub use ripple_error::{IntoRippleError, Result, ResultExt, RippleError};
