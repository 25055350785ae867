// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A consumer that subscribes on every read and records each reaction.

use crate::reaction_log::ReactionLog;
use parking_lot::Mutex;
use ripple_core::{Consumer, ConsumerId, ConsumerRef, Subject, SubjectId};
use ripple_error::{Result, RippleError};
use std::sync::Arc;

type ReactHook = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Consumer fixture with no deduplication: every registration adds a subscriber entry.
///
/// Each `react()` call first records the consumer id in its [`ReactionLog`], then runs the
/// optional hook, then fails if a failure was injected with
/// [`fail_with`](Self::fail_with).
pub struct RecordingConsumer {
    id: ConsumerId,
    log: ReactionLog,
    hook: Mutex<Option<ReactHook>>,
    failure: Mutex<Option<String>>,
    registrations: Mutex<Vec<SubjectId>>,
}

impl RecordingConsumer {
    /// Creates a consumer with the next process-wide id.
    #[must_use]
    pub fn new(log: &ReactionLog) -> Arc<Self> {
        Self::with_id(log, ConsumerId::next())
    }

    /// Creates a consumer with a chosen id, for ordering scenarios.
    #[must_use]
    pub fn with_id(log: &ReactionLog, id: ConsumerId) -> Arc<Self> {
        Arc::new(Self {
            id,
            log: log.clone(),
            hook: Mutex::new(None),
            failure: Mutex::new(None),
            registrations: Mutex::new(Vec::new()),
        })
    }

    /// Runs `hook` inside every subsequent `react()`; its error becomes the reaction's error.
    pub fn on_react(&self, hook: impl Fn() -> Result<()> + Send + Sync + 'static) {
        *self.hook.lock() = Some(Arc::new(hook));
    }

    /// Makes every subsequent `react()` fail with a `ReactionFailed` carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    /// Subjects this consumer registered with, in order, duplicates included.
    #[must_use]
    pub fn registrations(&self) -> Vec<SubjectId> {
        self.registrations.lock().clone()
    }

    /// This consumer as a trait-object handle.
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> ConsumerRef {
        self.clone()
    }
}

impl Consumer for RecordingConsumer {
    fn id(&self) -> ConsumerId {
        self.id
    }

    fn register_with(self: Arc<Self>, subject: &Subject) {
        self.registrations.lock().push(subject.id());
        subject.add_subscriber(self);
    }

    fn react(&self) -> Result<()> {
        self.log.record(self.id);

        let hook = self.hook.lock().clone();
        if let Some(hook) = hook {
            hook()?;
        }

        match self.failure.lock().clone() {
            Some(message) => Err(RippleError::reaction_failed(format!(
                "{}: {message}",
                self.id
            ))),
            None => Ok(()),
        }
    }
}
