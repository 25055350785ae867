// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use ripple_core::ConsumerId;
use std::sync::Arc;

/// Shared, ordered record of which consumers reacted.
///
/// Clones share the same record, so one log can be handed to many consumers and read
/// back in notification order.
#[derive(Debug, Clone, Default)]
pub struct ReactionLog {
    entries: Arc<Mutex<Vec<ConsumerId>>>,
}

impl ReactionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, id: ConsumerId) {
        self.entries.lock().push(id);
    }

    /// Ids in the order they were recorded.
    #[must_use]
    pub fn ids(&self) -> Vec<ConsumerId> {
        self.entries.lock().clone()
    }

    /// How many times `id` reacted.
    #[must_use]
    pub fn count_of(&self, id: ConsumerId) -> usize {
        self.entries.lock().iter().filter(|&&entry| entry == id).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
