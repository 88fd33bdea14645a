//! Buckets and the results recorded against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fixed-width sub-interval of the walked range, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Bucket {
    /// Returns whether `instant` falls inside this half-open interval.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// A single result produced by a bucket callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry<T> {
    /// Caller-defined payload.
    pub data: T,

    /// Start of the bucket that produced this result.
    pub interval_start: DateTime<Utc>,

    /// End of the bucket that produced this result.
    ///
    /// Always `interval_start + interval`, even for a final bucket that runs
    /// past the end of the walked range.
    pub interval_end: DateTime<Utc>,
}

impl<T> ResultEntry<T> {
    /// The bucket this entry was recorded against.
    pub const fn bucket(&self) -> Bucket {
        Bucket {
            start: self.interval_start,
            end: self.interval_end,
        }
    }
}

/// Append-only handle a callback uses to record results for the current bucket.
///
/// Every entry added through the sink is stamped with the bucket it was
/// created for. The sink gives no access to the walker's configuration.
#[derive(Debug)]
pub struct ResultSink<'a, T> {
    entries: &'a mut Vec<ResultEntry<T>>,
    bucket: Bucket,
    added: usize,
}

impl<'a, T> ResultSink<'a, T> {
    pub(crate) const fn new(entries: &'a mut Vec<ResultEntry<T>>, bucket: Bucket) -> Self {
        Self {
            entries,
            bucket,
            added: 0,
        }
    }

    /// Records one result for the current bucket.
    pub fn add(&mut self, data: T) {
        self.entries.push(ResultEntry {
            data,
            interval_start: self.bucket.start,
            interval_end: self.bucket.end,
        });
        self.added += 1;
    }

    /// The bucket results are currently being recorded for.
    pub const fn bucket(&self) -> Bucket {
        self.bucket
    }

    pub const fn interval_start(&self) -> DateTime<Utc> {
        self.bucket.start
    }

    pub const fn interval_end(&self) -> DateTime<Utc> {
        self.bucket.end
    }

    /// Number of results added for the current bucket so far.
    pub const fn added(&self) -> usize {
        self.added
    }

    /// Number of results in the log so far, across all buckets of this run.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Extend<T> for ResultSink<'_, T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for data in iter {
            self.add(data);
        }
    }
}
