//! Time handling for pricing reference data
//!
//! This module provides:
//! - Validity windows: when a campaign or promo code is in effect
//! - Clocks: an injectable source of "now" so calculations are reproducible

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid window: start {start} must not be after end {end}")]
    InvalidWindow {
        start: String,
        end: String,
    },

    #[error("Invalid time-to-live: {0} minutes")]
    InvalidTtl(i64),
}

/// A closed time window `[start, end]`, either side may be open-ended
///
/// Both bounds are inclusive: a campaign ending at `2024-12-31T23:59:59Z`
/// is still in effect at exactly that instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct ValidityWindow {
    /// First instant the window is in effect, None means "since always"
    pub start: Option<DateTime<Utc>>,
    /// Last instant the window is in effect, None means "forever"
    pub end: Option<DateTime<Utc>>,
}

impl ValidityWindow {
    /// Creates a window, rejecting a start after the end
    pub fn new(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, TemporalError> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(TemporalError::InvalidWindow {
                    start: s.to_rfc3339(),
                    end: e.to_rfc3339(),
                });
            }
        }
        Ok(Self { start, end })
    }

    /// Creates a bounded window
    pub fn bounded(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TemporalError> {
        Self::new(Some(start), Some(end))
    }

    /// A window that is always in effect
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Returns true if the instant falls inside the window (bounds inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| instant >= s) && self.end.map_or(true, |e| instant <= e)
    }

    /// Returns true if the window has not opened yet at the instant
    pub fn is_before_start(&self, instant: DateTime<Utc>) -> bool {
        self.start.map_or(false, |s| instant < s)
    }

    /// Returns true if the window closed before the instant
    pub fn has_ended(&self, instant: DateTime<Utc>) -> bool {
        self.end.map_or(false, |e| instant > e)
    }
}

impl fmt::Display for ValidityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.map_or_else(|| "-inf".to_string(), |s| s.to_rfc3339());
        let end = self.end.map_or_else(|| "+inf".to_string(), |e| e.to_rfc3339());
        write!(f, "[{}, {}]", start, end)
    }
}

/// Converts a minute count into a duration, rejecting negative values
pub fn ttl_minutes(minutes: i64) -> Result<Duration, TemporalError> {
    if minutes < 0 {
        return Err(TemporalError::InvalidTtl(minutes));
    }
    Duration::try_minutes(minutes).ok_or(TemporalError::InvalidTtl(minutes))
}

/// Instant `minutes` after `start`; fails if that is past the supported date range
pub fn expires_after(start: DateTime<Utc>, minutes: i64) -> Result<DateTime<Utc>, TemporalError> {
    let ttl = ttl_minutes(minutes)?;
    start
        .checked_add_signed(ttl)
        .ok_or(TemporalError::InvalidTtl(minutes))
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually driven clock for tests and replays
#[derive(Debug)]
pub struct FixedClock {
    instant: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            instant: RwLock::new(instant),
        }
    }

    /// Moves the clock to a new instant
    pub fn set(&self, instant: DateTime<Utc>) {
        match self.instant.write() {
            Ok(mut guard) => *guard = instant,
            Err(poisoned) => *poisoned.into_inner() = instant,
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set(next);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        match self.instant.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
