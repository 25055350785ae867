// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The capability a unit of computation exposes to take part in dependency tracking.

use crate::Subject;
use ripple_error::Result;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::sync::Arc;

static NEXT_CONSUMER_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique consumer identifier.
///
/// Ids are handed out in creation order, so a lower id means an earlier-created consumer.
/// Subjects rely on this to approximate parent-before-child notification when no
/// scheduler orders reactions for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsumerId(u64);

impl ConsumerId {
    /// Allocates the next id from the process-wide counter.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_CONSUMER_ID.fetch_add(1, SeqCst))
    }

    /// Wraps an externally chosen id. The caller is responsible for uniqueness.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "consumer#{}", self.0)
    }
}

/// A computation that can depend on subjects and be told when they change.
///
/// Implementors decide what "reacting" means (re-run now, enqueue, mark dirty) and whether
/// repeated reads of one subject during a single evaluation should register more than once.
/// Subjects never deduplicate on their own.
///
/// # Example
///
/// ```
/// use ripple_core::{Consumer, ConsumerId, EvaluationContext, Subject};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// struct Counter {
///     id: ConsumerId,
///     reactions: AtomicUsize,
/// }
///
/// impl Consumer for Counter {
///     fn id(&self) -> ConsumerId {
///         self.id
///     }
///
///     fn register_with(self: Arc<Self>, subject: &Subject) {
///         subject.add_subscriber(self);
///     }
///
///     fn react(&self) -> ripple_error::Result<()> {
///         self.reactions.fetch_add(1, Ordering::SeqCst);
///         Ok(())
///     }
/// }
///
/// let context = EvaluationContext::new();
/// let subject = Subject::new();
/// let counter = Arc::new(Counter { id: ConsumerId::next(), reactions: AtomicUsize::new(0) });
///
/// context.evaluate(counter.clone(), || subject.register_if_evaluating_in(&context));
/// subject.broadcast_in(&context).unwrap();
///
/// assert_eq!(counter.reactions.load(Ordering::SeqCst), 1);
/// ```
pub trait Consumer: Send + Sync {
    /// Creation-order identifier.
    fn id(&self) -> ConsumerId;

    /// Called by a subject read while this consumer is the active evaluation.
    ///
    /// The consumer records the subject and normally calls
    /// [`Subject::add_subscriber`] with itself.
    fn register_with(self: Arc<Self>, subject: &Subject);

    /// Called once per broadcast of every subject this consumer is subscribed to.
    ///
    /// # Errors
    ///
    /// An error stops the broadcast that delivered it and is returned to its caller.
    fn react(&self) -> Result<()>;
}

/// Shared handle to a consumer, as stored in subscriber lists and evaluation frames.
pub type ConsumerRef = Arc<dyn Consumer>;

/// Identity comparison between two consumer handles.
#[must_use]
pub fn same_consumer(a: &ConsumerRef, b: &ConsumerRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
