// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and consumer fixtures for the Ripple dependency-tracking library.
//!
//! The core crate only defines the [`Consumer`](ripple_core::Consumer) capability; these
//! fixtures implement it so tests can observe subscription and notification behavior.
//! They are meant for development and testing, not production code.
//!
//! # Key Types
//!
//! - [`ReactionLog`]: shared record of which consumers reacted, in order.
//! - [`RecordingConsumer`]: registers on every read (no dedup) and records reactions;
//!   supports a per-reaction hook and injected failures.
//! - [`TrackingConsumer`]: re-runs an effect on change, deduplicating and pruning its
//!   dependencies on every run.
//!
//! # Example
//!
//! ```rust
//! use ripple_core::{evaluate, Subject};
//! use ripple_test_utils::{ReactionLog, RecordingConsumer};
//!
//! let log = ReactionLog::new();
//! let subject = Subject::new();
//! let consumer = RecordingConsumer::new(&log);
//!
//! evaluate(consumer.handle(), || subject.register_if_evaluating());
//! subject.broadcast().unwrap();
//!
//! assert_eq!(log.len(), 1);
//! assert_eq!(consumer.registrations(), vec![subject.id()]);
//! ```

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod reaction_log;
pub mod recording;
pub mod tracking;

pub use reaction_log::ReactionLog;
pub use recording::RecordingConsumer;
pub use tracking::{TrackingConsumer, MAX_CONSECUTIVE_RUNS};
