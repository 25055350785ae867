// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Ripple
//!
//! Implicit, fine-grained reactive dependency tracking.
//!
//! ## Overview
//!
//! Work that reads observable values discovers its dependencies by itself: while a
//! [`Consumer`] is evaluating, every [`Subject`] it reads registers it. When a value
//! changes, its subject [`broadcast`](Subject::broadcast)s and every registered consumer
//! reacts. Nobody writes subscribe or unsubscribe calls by hand.
//!
//! - [`Subject`]: one per observable value.
//! - [`EvaluationContext`]: which consumer is evaluating right now. Each thread has one,
//!   reachable through the free functions ([`evaluate`], [`untracked`], ...), and explicit
//!   contexts can be passed to the `*_in` methods.
//! - [`Consumer`]: implemented by whatever owns a computation (a watcher, an effect, a
//!   derived value); it decides what reacting means.
//!
//! Scheduling is not this crate's concern. When no scheduler orders reactions, set the
//! context to [`NotifyMode::Synchronous`] and subjects notify in consumer creation order.
//!
//! ## Quick Start
//!
//! ```rust
//! use ripple::prelude::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! struct Render {
//!     id: ConsumerId,
//!     renders: AtomicUsize,
//! }
//!
//! impl Consumer for Render {
//!     fn id(&self) -> ConsumerId {
//!         self.id
//!     }
//!
//!     fn register_with(self: Arc<Self>, subject: &Subject) {
//!         subject.add_subscriber(self);
//!     }
//!
//!     fn react(&self) -> ripple::Result<()> {
//!         self.renders.fetch_add(1, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//!
//! let title = Subject::new();
//! let render = Arc::new(Render { id: ConsumerId::next(), renders: AtomicUsize::new(0) });
//!
//! // reading `title` while `render` evaluates subscribes it
//! evaluate(render.clone(), || title.register_if_evaluating());
//!
//! title.broadcast().unwrap();
//! assert_eq!(render.renders.load(Ordering::SeqCst), 1);
//! ```

pub use ripple_core::{
    current_target, evaluate, pop_target, push_target, same_consumer, set_notify_mode,
    untracked, with_context, Consumer, ConsumerId, ConsumerRef, EvaluationContext,
    EvaluationFrame, NotifyMode, ReactiveConfig, Subject, SubjectId,
};
pub use ripple_error::{IntoRippleError, Result, ResultExt, RippleError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use ripple_core::{
        evaluate, untracked, Consumer, ConsumerId, ConsumerRef, EvaluationContext, NotifyMode,
        ReactiveConfig, Subject,
    };
    pub use ripple_error::{RippleError, ResultExt};
}
