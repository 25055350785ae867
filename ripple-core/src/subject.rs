// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-value dependency subject.
//!
//! A [`Subject`] stands for one observable value and owns the ordered list of consumers
//! interested in it.
//!
//! ## Characteristics
//!
//! - **Implicit**: [`register_if_evaluating`](Subject::register_if_evaluating) subscribes
//!   whichever consumer is active in the evaluation context, and does nothing otherwise.
//! - **Snapshot broadcast**: [`broadcast`](Subject::broadcast) copies the subscriber list
//!   before notifying, so reactions may subscribe or unsubscribe freely; every consumer
//!   present when the broadcast started reacts exactly once.
//! - **Ordered fallback**: when the context reports [`NotifyMode::Synchronous`] and the
//!   `diagnostics` feature is on, the snapshot is sorted by consumer id first.
//! - **No dedup**: a consumer added twice is notified twice.
//! - **Shared**: cheap to clone; all clones share the same subscriber list.
//!
//! Subscribers are held strongly. A consumer that keeps the subjects it depends on forms a
//! reference cycle with them until it unsubscribes, so consumers should remove themselves
//! (or the owner should call [`clear_subscribers`](Subject::clear_subscribers)) on teardown.
//!
//! ## Example
//!
//! ```
//! use ripple_core::{Consumer, EvaluationContext, NotifyMode, ReactiveConfig, Subject};
//! use ripple_test_utils::{ReactionLog, RecordingConsumer};
//!
//! let context = EvaluationContext::with_config(
//!     ReactiveConfig::new().with_mode(NotifyMode::Synchronous),
//! );
//! let log = ReactionLog::new();
//! let subject = Subject::new();
//! let consumer = RecordingConsumer::new(&log);
//!
//! // Reads outside an evaluation are not tracked
//! subject.register_if_evaluating_in(&context);
//! assert_eq!(subject.subscriber_count(), 0);
//!
//! context.evaluate(consumer.clone(), || subject.register_if_evaluating_in(&context));
//! subject.broadcast_in(&context).unwrap();
//!
//! assert_eq!(log.ids(), vec![consumer.id()]);
//! ```

#[cfg(feature = "diagnostics")]
use crate::config::NotifyMode;
use crate::config::ReactiveConfig;
use crate::consumer::{same_consumer, ConsumerRef};
use crate::context::{current_target, with_context, EvaluationContext};
use parking_lot::Mutex;
use ripple_error::Result;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::sync::Arc;

static NEXT_SUBJECT_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique subject identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(u64);

impl SubjectId {
    fn next() -> Self {
        Self(NEXT_SUBJECT_ID.fetch_add(1, SeqCst))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subject#{}", self.0)
    }
}

struct SubjectState {
    id: SubjectId,
    subscribers: Mutex<Vec<ConsumerRef>>,
}

/// Dependency subject for one observable value.
///
/// See the [module documentation](self) for details.
#[derive(Clone)]
pub struct Subject {
    state: Arc<SubjectState>,
}

impl Subject {
    /// Creates a subject with no subscribers and a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(SubjectState {
                id: SubjectId::next(),
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.state.id
    }

    /// Appends `consumer` to the subscriber list.
    pub fn add_subscriber(&self, consumer: ConsumerRef) {
        self.state.subscribers.lock().push(consumer);
    }

    /// Removes the first subscriber that is the same consumer as `consumer`.
    ///
    /// Returns `false` and leaves the list untouched if it is not subscribed.
    pub fn remove_subscriber(&self, consumer: &ConsumerRef) -> bool {
        let removed = {
            let mut subscribers = self.state.subscribers.lock();
            subscribers
                .iter()
                .position(|existing| same_consumer(existing, consumer))
                .map(|index| subscribers.remove(index))
        };
        // the removed handle may be the last one; drop it outside the lock
        removed.is_some()
    }

    /// Lets the active consumer of this thread's context register itself.
    pub fn register_if_evaluating(&self) {
        if let Some(active) = current_target() {
            active.register_with(self);
        }
    }

    /// Lets the active consumer of `context` register itself.
    pub fn register_if_evaluating_in(&self, context: &EvaluationContext) {
        if let Some(active) = context.current() {
            active.register_with(self);
        }
    }

    /// Notifies every current subscriber, using this thread's context configuration.
    ///
    /// # Errors
    ///
    /// Returns the first error a consumer's `react()` produces. Consumers after it in the
    /// snapshot are not notified.
    pub fn broadcast(&self) -> Result<()> {
        let config = with_context(EvaluationContext::config);
        self.notify(config)
    }

    /// Notifies every current subscriber, using the configuration of `context`.
    ///
    /// # Errors
    ///
    /// Same as [`broadcast`](Self::broadcast).
    pub fn broadcast_in(&self, context: &EvaluationContext) -> Result<()> {
        self.notify(context.config())
    }

    fn notify(&self, config: ReactiveConfig) -> Result<()> {
        #[cfg_attr(not(feature = "diagnostics"), allow(unused_mut))]
        let mut snapshot = self.subscribers();

        #[cfg(feature = "diagnostics")]
        if config.mode == NotifyMode::Synchronous {
            snapshot.sort_by_key(|consumer| consumer.id());
        }
        #[cfg(not(feature = "diagnostics"))]
        let _ = config;

        for consumer in &snapshot {
            consumer.react().inspect_err(|err| {
                debug!(
                    "{} stopped broadcasting: {} failed: {}",
                    self.id(),
                    consumer.id(),
                    err
                );
            })?;
        }
        Ok(())
    }

    /// Point-in-time copy of the subscriber list.
    #[must_use]
    pub fn subscribers(&self) -> Vec<ConsumerRef> {
        self.state.subscribers.lock().clone()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.subscribers.lock().len()
    }

    /// Returns `true` if `consumer` appears at least once in the subscriber list.
    #[must_use]
    pub fn has_subscriber(&self, consumer: &ConsumerRef) -> bool {
        self.state
            .subscribers
            .lock()
            .iter()
            .any(|existing| same_consumer(existing, consumer))
    }

    #[must_use]
    pub fn is_observed(&self) -> bool {
        !self.state.subscribers.lock().is_empty()
    }

    /// Removes every subscriber and hands them back.
    pub fn clear_subscribers(&self) -> Vec<ConsumerRef> {
        std::mem::take(&mut *self.state.subscribers.lock())
    }

    /// Returns `true` if both handles refer to the same subject.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("id", &self.state.id)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
