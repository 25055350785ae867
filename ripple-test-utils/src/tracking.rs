// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A reference consumer that re-runs its effect whenever a dependency changes.
//!
//! Dependencies are collected afresh on every run:
//!
//! - a subject read several times in one run is registered once;
//! - a subject subscribed by an earlier run is not subscribed again;
//! - subjects the latest run no longer read are unsubscribed when it finishes.
//!
//! Runs never nest. A reaction that arrives while the effect is running (for instance because
//! the effect itself broadcasts one of its dependencies) schedules one more run, which starts
//! after the current one has finished its cleanup. The chain is capped at
//! [`MAX_CONSECUTIVE_RUNS`] to stop an effect that keeps invalidating itself.
//!
//! Runs use this thread's evaluation context, so the effect should read subjects through
//! [`Subject::register_if_evaluating`].

use parking_lot::Mutex;
use ripple_core::{evaluate, Consumer, ConsumerId, ConsumerRef, Subject, SubjectId};
use ripple_error::Result;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering::SeqCst};
use std::sync::{Arc, Weak};

type Effect = Box<dyn Fn() + Send + Sync>;

/// Upper bound on back-to-back runs triggered from inside the effect.
pub const MAX_CONSECUTIVE_RUNS: usize = 100;

#[derive(Default)]
struct Dependencies {
    subjects: Vec<Subject>,
    ids: HashSet<SubjectId>,
}

impl Dependencies {
    fn insert(&mut self, subject: &Subject) -> bool {
        if self.ids.insert(subject.id()) {
            self.subjects.push(subject.clone());
            true
        } else {
            false
        }
    }
}

/// Clears the running flag even if the effect panics.
struct RunningFlag<'a>(&'a AtomicBool);

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, SeqCst);
    }
}

/// Consumer fixture that tracks its own dependencies.
pub struct TrackingConsumer {
    id: ConsumerId,
    me: Weak<TrackingConsumer>,
    effect: Effect,
    current: Mutex<Dependencies>,
    collecting: Mutex<Dependencies>,
    runs: AtomicUsize,
    active: AtomicBool,
    running: AtomicBool,
    rerun: AtomicBool,
}

impl TrackingConsumer {
    /// Creates the consumer and runs `effect` once to collect its initial dependencies.
    pub fn new(effect: impl Fn() + Send + Sync + 'static) -> Arc<Self> {
        let consumer = Arc::new_cyclic(|me| Self {
            id: ConsumerId::next(),
            me: me.clone(),
            effect: Box::new(effect),
            current: Mutex::new(Dependencies::default()),
            collecting: Mutex::new(Dependencies::default()),
            runs: AtomicUsize::new(0),
            active: AtomicBool::new(true),
            running: AtomicBool::new(false),
            rerun: AtomicBool::new(false),
        });
        consumer.run();
        consumer
    }

    /// Runs the effect with this consumer active, then drops stale dependencies.
    ///
    /// Called while a run is in progress, it only schedules another run.
    pub fn run(self: &Arc<Self>) {
        if !self.active.load(SeqCst) {
            return;
        }
        if self.running.swap(true, SeqCst) {
            self.rerun.store(true, SeqCst);
            return;
        }
        let _running = RunningFlag(&self.running);

        for _ in 0..MAX_CONSECUTIVE_RUNS {
            self.rerun.store(false, SeqCst);
            let handle: ConsumerRef = self.clone();
            evaluate(handle, || (self.effect)());
            self.runs.fetch_add(1, SeqCst);
            self.cleanup();
            if !self.rerun.load(SeqCst) || !self.active.load(SeqCst) {
                break;
            }
        }
        self.rerun.store(false, SeqCst);
    }

    /// Unsubscribes from every dependency; later reactions are ignored.
    pub fn teardown(self: &Arc<Self>) {
        self.active.store(false, SeqCst);
        let handle: ConsumerRef = self.clone();
        let dependencies = std::mem::take(&mut *self.current.lock());
        for subject in &dependencies.subjects {
            subject.remove_subscriber(&handle);
        }
    }

    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs.load(SeqCst)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(SeqCst)
    }

    /// Ids of the subjects the latest run depended on, in first-read order.
    #[must_use]
    pub fn dependencies(&self) -> Vec<SubjectId> {
        self.current
            .lock()
            .subjects
            .iter()
            .map(Subject::id)
            .collect()
    }

    fn cleanup(self: &Arc<Self>) {
        let fresh = std::mem::take(&mut *self.collecting.lock());
        let handle: ConsumerRef = self.clone();

        // torn down mid-run: nothing read in this run may stay subscribed
        if !self.active.load(SeqCst) {
            for subject in &fresh.subjects {
                subject.remove_subscriber(&handle);
            }
            return;
        }

        let stale = std::mem::replace(&mut *self.current.lock(), fresh);
        let current_ids = self.current.lock().ids.clone();
        for subject in stale
            .subjects
            .iter()
            .filter(|subject| !current_ids.contains(&subject.id()))
        {
            subject.remove_subscriber(&handle);
        }
    }
}

impl Consumer for TrackingConsumer {
    fn id(&self) -> ConsumerId {
        self.id
    }

    fn register_with(self: Arc<Self>, subject: &Subject) {
        if !self.active.load(SeqCst) {
            return;
        }
        let newly_read = self.collecting.lock().insert(subject);
        if newly_read && !self.current.lock().ids.contains(&subject.id()) {
            subject.add_subscriber(self);
        }
    }

    fn react(&self) -> Result<()> {
        if let Some(me) = self.me.upgrade() {
            me.run();
        }
        Ok(())
    }
}
