//! Record id allocation.
//!
//! Ids are epoch milliseconds at creation time, bumped past the last issued
//! or observed id whenever the clock has not advanced, so they are strictly
//! increasing for the lifetime of one allocator.

use crate::model::record::RecordId;
use std::time::{SystemTime, UNIX_EPOCH};

/// Hands out strictly increasing record ids.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    last: RecordId,
    clock: fn() -> RecordId,
}

impl IdAllocator {
    /// Allocator driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(system_clock_millis)
    }

    /// Allocator driven by a caller-provided millisecond clock.
    pub fn with_clock(clock: fn() -> RecordId) -> Self {
        Self { last: 0, clock }
    }

    /// Returns a fresh id greater than every id issued or observed so far.
    ///
    /// Returns `None` once `RecordId::MAX` has been issued or observed.
    pub fn next_id(&mut self) -> Option<RecordId> {
        let floor = self.last.checked_add(1)?;
        let id = (self.clock)().max(floor);
        self.last = id;
        Some(id)
    }

    /// Records an id that already exists in storage.
    pub fn observe(&mut self, id: RecordId) {
        self.last = self.last.max(id);
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

fn system_clock_millis() -> RecordId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| RecordId::try_from(elapsed.as_millis()).unwrap_or(RecordId::MAX))
        .unwrap_or(0)
}
