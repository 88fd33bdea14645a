//! Range endpoints given either as instants or as offsets from now.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WalkerError;

/// One end of the walked range.
///
/// An offset is a number of seconds relative to the moment the bound is
/// resolved: subtracted from now for a start, added to now for an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeBound {
    /// Seconds away from now.
    Offset(u64),
    /// An absolute instant.
    At(DateTime<Utc>),
}

impl TimeBound {
    /// Resolves this bound as the start of a range: `now - offset`.
    pub fn resolve_start(self, now: DateTime<Utc>) -> Result<DateTime<Utc>, WalkerError> {
        match self {
            Self::At(instant) => Ok(instant),
            Self::Offset(secs) => seconds(secs)
                .and_then(|delta| now.checked_sub_signed(delta))
                .ok_or(WalkerError::TimeOutOfRange),
        }
    }

    /// Resolves this bound as the end of a range: `now + offset`.
    pub fn resolve_end(self, now: DateTime<Utc>) -> Result<DateTime<Utc>, WalkerError> {
        match self {
            Self::At(instant) => Ok(instant),
            Self::Offset(secs) => seconds(secs)
                .and_then(|delta| now.checked_add_signed(delta))
                .ok_or(WalkerError::TimeOutOfRange),
        }
    }
}

impl Default for TimeBound {
    fn default() -> Self {
        Self::Offset(0)
    }
}

impl From<DateTime<Utc>> for TimeBound {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::At(instant)
    }
}

impl From<u64> for TimeBound {
    fn from(secs: u64) -> Self {
        Self::Offset(secs)
    }
}

/// Converts whole seconds into a `TimeDelta`, if representable.
pub(crate) fn seconds(secs: u64) -> Option<TimeDelta> {
    i64::try_from(secs).ok().and_then(TimeDelta::try_seconds)
}
