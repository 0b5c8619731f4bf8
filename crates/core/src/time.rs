use chrono::{DateTime, TimeDelta, Utc};

/// Where practice timestamps come from.
///
/// A session's `start_time` is read when the first question is requested and
/// its `end_time` when it is saved. Both go through this value, never through
/// `Utc::now()` directly.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    /// Wall-clock time.
    #[default]
    System,
    /// Every reading returns the same instant.
    Pinned(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn pinned(at: DateTime<Utc>) -> Self {
        Self::Pinned(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Pinned(at) => *at,
        }
    }
}

/// Seconds since the epoch of the instant [`fixed_clock`] reports, 2023-11-14T22:13:20Z.
pub const PINNED_EPOCH_SECS: i64 = 1_700_000_000;

/// The instant reported by [`fixed_clock`].
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + TimeDelta::seconds(PINNED_EPOCH_SECS)
}

/// A clock stuck at [`fixed_now`], so saved sessions carry predictable times.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::pinned(fixed_now())
}
