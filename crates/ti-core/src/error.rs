//! Error types for walking a time range.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error type a bucket callback may return to abort a run.
pub type BucketError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while configuring or running an [`IntervalWalker`](crate::IntervalWalker).
///
/// All of these are caller or configuration errors. None of them are
/// transient, so nothing is retried.
#[derive(Debug, Error)]
pub enum WalkerError {
    /// A callback was requested by a name that does not resolve to one.
    #[error("callback `{name}` is not callable")]
    InvalidCallback { name: String },

    /// `run` was called before any callback was configured.
    #[error("no callback configured to run the walker with")]
    MissingCallback,

    /// The start of the range is not strictly before its end.
    #[error("start time {start} cannot be after or the same as end time {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A bucket's callback returned without adding any results.
    #[error("no results added for interval {bucket_start} to {bucket_end}")]
    EmptyBucket {
        bucket_start: DateTime<Utc>,
        bucket_end: DateTime<Utc>,
    },

    /// The interval length is zero, which would never advance past the end.
    #[error("interval length must be greater than zero")]
    ZeroInterval,

    /// The interval length cannot be represented as a duration.
    #[error("interval of {secs} seconds is out of range")]
    IntervalOutOfRange { secs: u64 },

    /// Resolving or advancing an instant left the representable range.
    #[error("time arithmetic overflowed the representable range")]
    TimeOutOfRange,

    /// The callback itself failed.
    #[error("callback failed for interval starting at {bucket_start}")]
    Callback {
        bucket_start: DateTime<Utc>,
        #[source]
        source: BucketError,
    },
}
