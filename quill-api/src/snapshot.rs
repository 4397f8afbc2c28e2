//! Countdown snapshots - derived timer state at one instant.

use serde::{Deserialize, Serialize};

pub const MILLIS_PER_SECOND: u64 = 1_000;
pub const MILLIS_PER_MINUTE: u64 = 60_000;
pub const MILLIS_PER_HOUR: u64 = 3_600_000;
pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// Time left until a deadline, split into display components.
///
/// Days do not carry into larger units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Remaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Remaining {
    /// Floor-decompose a positive millisecond delta.
    pub fn from_millis(delta: u64) -> Self {
        Self {
            days: delta / MILLIS_PER_DAY,
            hours: (delta % MILLIS_PER_DAY) / MILLIS_PER_HOUR,
            minutes: (delta % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE,
            seconds: (delta % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND,
        }
    }

    /// Milliseconds covered by the whole components (sub-second part dropped).
    pub fn as_millis(&self) -> u64 {
        self.days * MILLIS_PER_DAY
            + self.hours * MILLIS_PER_HOUR
            + self.minutes * MILLIS_PER_MINUTE
            + self.seconds * MILLIS_PER_SECOND
    }
}

/// Countdown state at a point in time. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownSnapshot {
    Remaining(Remaining),
    Expired,
    /// The deadline text does not name a valid instant.
    Invalid,
}

impl CountdownSnapshot {
    pub fn is_expired(&self) -> bool {
        matches!(self, CountdownSnapshot::Expired)
    }
}
