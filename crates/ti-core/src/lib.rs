//! Fixed-interval walking of time ranges.
//!
//! This crate contains:
//! - Walker: splits `[start, end)` into equal buckets and runs a callback per bucket
//! - Result log: the ordered, re-iterable results with a traversal cursor
//! - Aggregations: built-in callbacks that summarize timestamped samples

mod aggregate;
mod bound;
mod bucket;
mod error;
mod log;
mod walker;

pub use aggregate::{Aggregation, BucketStat, Sample, samples_between};
pub use bound::TimeBound;
pub use bucket::{Bucket, ResultEntry, ResultSink};
pub use error::{BucketError, WalkerError};
pub use log::ResultLog;
pub use walker::{Callback, DEFAULT_INTERVAL_SECS, IntervalWalker, WalkerConfig};
