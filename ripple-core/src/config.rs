// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Per-context configuration read by subjects at broadcast time.

/// How the surrounding scheduler delivers reactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotifyMode {
    /// An external scheduler queues and orders reactions itself.
    #[default]
    Batched,
    /// Reactions run inline; subjects sort their snapshot by consumer id so that
    /// earlier-created consumers react first.
    Synchronous,
}

/// Configuration held by an [`EvaluationContext`](crate::EvaluationContext).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReactiveConfig {
    /// Scheduler signal consulted by `broadcast`.
    pub mode: NotifyMode,
    /// Suppresses context-misuse diagnostics.
    pub silent: bool,
}

impl ReactiveConfig {
    /// Batched mode, diagnostics enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: NotifyMode::Batched,
            silent: false,
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: NotifyMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Returns `true` when an external scheduler owns reaction ordering.
    #[must_use]
    pub const fn is_batched(&self) -> bool {
        matches!(self.mode, NotifyMode::Batched)
    }
}
