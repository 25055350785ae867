// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The record of which consumer is currently evaluating.
//!
//! An [`EvaluationContext`] holds at most one *active* consumer plus a stack of the values it
//! replaced. A consumer pushes itself before running its computation and pops afterwards;
//! every [`Subject`](crate::Subject) read in between asks the context who is active and
//! registers that consumer. Nested evaluations (a derived value computed on demand while
//! another evaluation is running) push and pop in LIFO order, so the outer consumer is
//! restored exactly when the inner one finishes.
//!
//! Pushing `None` is valid and suspends tracking until the matching pop; see
//! [`EvaluationContext::untracked`].
//!
//! ## Frames
//!
//! Prefer [`EvaluationContext::enter`] (or [`evaluate`](EvaluationContext::evaluate)) over
//! raw `push`/`pop`. The returned [`EvaluationFrame`] pops when dropped, which covers early
//! returns through `?` and unwinding panics alike.
//!
//! ## Threads
//!
//! A context is single-threaded (`!Sync`). The free functions in this module operate on one
//! context per thread, so evaluations on different threads never observe each other's
//! active consumer.

use crate::config::{NotifyMode, ReactiveConfig};
use crate::consumer::ConsumerRef;
use ripple_error::{Result, RippleError};
use std::cell::{Cell, RefCell};
use std::fmt;

#[derive(Default)]
struct Frames {
    active: Option<ConsumerRef>,
    saved: Vec<Option<ConsumerRef>>,
}

/// Active consumer plus the stack of consumers it displaced.
pub struct EvaluationContext {
    frames: RefCell<Frames>,
    config: Cell<ReactiveConfig>,
}

impl EvaluationContext {
    /// Creates an idle context with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ReactiveConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ReactiveConfig) -> Self {
        Self {
            frames: RefCell::new(Frames::default()),
            config: Cell::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> ReactiveConfig {
        self.config.get()
    }

    pub fn set_config(&self, config: ReactiveConfig) {
        self.config.set(config);
    }

    pub fn set_mode(&self, mode: NotifyMode) {
        self.config.set(self.config.get().with_mode(mode));
    }

    /// Returns `true` when an external scheduler owns reaction ordering.
    #[must_use]
    pub fn is_batched(&self) -> bool {
        self.config.get().is_batched()
    }

    /// Saves the active consumer and makes `consumer` active.
    pub fn push(&self, consumer: Option<ConsumerRef>) {
        let mut frames = self.frames.borrow_mut();
        let previous = std::mem::replace(&mut frames.active, consumer);
        frames.saved.push(previous);
    }

    /// Restores the most recently saved consumer and returns the one it replaces.
    ///
    /// Popping with nothing saved leaves no consumer active and reports a diagnostic;
    /// use [`try_pop`](Self::try_pop) to get an error instead.
    pub fn pop(&self) -> Option<ConsumerRef> {
        let mut frames = self.frames.borrow_mut();
        match frames.saved.pop() {
            Some(previous) => std::mem::replace(&mut frames.active, previous),
            None => {
                self.report("pop called with no saved evaluation frame; clearing active consumer");
                frames.active.take()
            }
        }
    }

    /// Like [`pop`](Self::pop), but refuses to pop an empty stack.
    ///
    /// # Errors
    ///
    /// Returns [`RippleError::ContextUnderflow`] when no frame is saved; the context is left
    /// untouched in that case.
    pub fn try_pop(&self) -> Result<Option<ConsumerRef>> {
        if self.frames.borrow().saved.is_empty() {
            return Err(RippleError::context_underflow(
                "try_pop called with no saved evaluation frame",
            ));
        }
        Ok(self.pop())
    }

    /// The consumer currently evaluating, if any.
    #[must_use]
    pub fn current(&self) -> Option<ConsumerRef> {
        self.frames.borrow().active.clone()
    }

    /// Returns `true` if subject reads would register a consumer right now.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.frames.borrow().active.is_some()
    }

    /// Number of saved frames.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.borrow().saved.len()
    }

    /// Pushes `consumer` and returns a guard that pops when dropped.
    pub fn enter(&self, consumer: Option<ConsumerRef>) -> EvaluationFrame<'_> {
        self.push(consumer);
        EvaluationFrame {
            context: self,
            depth: self.depth(),
        }
    }

    /// Runs `f` with `consumer` active.
    pub fn evaluate<R>(&self, consumer: ConsumerRef, f: impl FnOnce() -> R) -> R {
        let _frame = self.enter(Some(consumer));
        f()
    }

    /// Runs `f` with tracking suspended: subject reads inside do not subscribe anyone.
    pub fn untracked<R>(&self, f: impl FnOnce() -> R) -> R {
        let _frame = self.enter(None);
        f()
    }

    #[cfg(feature = "diagnostics")]
    fn report(&self, message: &str) {
        if !self.config.get().silent {
            warn!("{}", message);
        }
    }

    #[cfg(not(feature = "diagnostics"))]
    fn report(&self, _message: &str) {}
}

impl Default for EvaluationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frames = self.frames.borrow();
        f.debug_struct("EvaluationContext")
            .field("active", &frames.active.as_ref().map(|c| c.id()))
            .field("depth", &frames.saved.len())
            .field("config", &self.config.get())
            .finish()
    }
}

/// Scoped evaluation frame returned by [`EvaluationContext::enter`].
///
/// Dropping the frame pops the context. Frames must be dropped in the reverse order they
/// were entered; an out-of-order drop is reported as a diagnostic and still pops once.
#[must_use = "dropping the frame immediately ends the evaluation"]
pub struct EvaluationFrame<'a> {
    context: &'a EvaluationContext,
    depth: usize,
}

impl EvaluationFrame<'_> {
    /// Depth of the context right after this frame was entered.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for EvaluationFrame<'_> {
    fn drop(&mut self) {
        if self.context.depth() != self.depth {
            self.context
                .report("evaluation frame dropped out of order; frames must nest");
        }
        drop(self.context.pop());
    }
}

impl fmt::Debug for EvaluationFrame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationFrame")
            .field("depth", &self.depth)
            .finish()
    }
}

thread_local! {
    static CONTEXT: EvaluationContext = EvaluationContext::new();
}

/// Runs `f` against this thread's context.
pub fn with_context<R>(f: impl FnOnce(&EvaluationContext) -> R) -> R {
    CONTEXT.with(f)
}

/// [`EvaluationContext::push`] on this thread's context.
pub fn push_target(consumer: Option<ConsumerRef>) {
    with_context(|context| context.push(consumer));
}

/// [`EvaluationContext::pop`] on this thread's context.
pub fn pop_target() -> Option<ConsumerRef> {
    with_context(EvaluationContext::pop)
}

/// [`EvaluationContext::current`] on this thread's context.
#[must_use]
pub fn current_target() -> Option<ConsumerRef> {
    with_context(EvaluationContext::current)
}

/// [`EvaluationContext::evaluate`] on this thread's context.
pub fn evaluate<R>(consumer: ConsumerRef, f: impl FnOnce() -> R) -> R {
    with_context(|context| context.evaluate(consumer, f))
}

/// [`EvaluationContext::untracked`] on this thread's context.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    with_context(|context| context.untracked(f))
}

/// Sets the notify mode of this thread's context.
pub fn set_notify_mode(mode: NotifyMode) {
    with_context(|context| context.set_mode(mode));
}
