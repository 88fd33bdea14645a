//! The interval walker: splits a time range into fixed-width buckets and
//! collects the results a callback produces for each of them.
//!
//! # Algorithm
//!
//! 1. Check preconditions (callback present, `start < end`, usable interval)
//! 2. Clear the result log and run counter
//! 3. From `start`, hand each `[cursor, cursor + interval)` to the callback
//! 4. Require at least one new result per bucket, then advance the cursor
//! 5. Stop once the cursor reaches or passes `end`
//!
//! The last bucket is not clipped to `end`: every bucket is exactly one
//! interval wide, so the final one may run past the end of the range.

use std::fmt;
use std::ops::Index;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::bound::{self, TimeBound};
use crate::bucket::{Bucket, ResultEntry, ResultSink};
use crate::error::{BucketError, WalkerError};
use crate::log::ResultLog;

/// Default interval length: one hour.
pub const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Per-bucket callback.
///
/// Receives the bucket's start and end and a sink to record results into.
/// It must add at least one result before returning `Ok`.
pub type Callback<'cb, T> = Box<
    dyn FnMut(DateTime<Utc>, DateTime<Utc>, &mut ResultSink<'_, T>) -> Result<(), BucketError>
        + 'cb,
>;

/// Serializable walker configuration.
///
/// Unset bounds default to now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<TimeBound>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<TimeBound>,

    /// Interval length in seconds. Default: 3600 (1 hour).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

const fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

/// Walks a time range in fixed-width buckets.
///
/// Configure the range, interval and callback, then call [`run`](Self::run).
/// Afterwards the results are available by index, by iteration, or through
/// the traversal cursor (`rewind` / `current` / `key` / `advance` / `valid`).
///
/// A walker must not be driven from more than one place at a time; `run`
/// takes `&mut self` so the borrow checker enforces this.
pub struct IntervalWalker<'cb, T> {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_secs: u64,
    callback: Option<Callback<'cb, T>>,
    log: ResultLog<T>,
    run_count: usize,
}

impl<T: fmt::Debug> fmt::Debug for IntervalWalker<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalWalker")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("interval_secs", &self.interval_secs)
            .field("has_callback", &self.callback.is_some())
            .field("log", &self.log)
            .field("run_count", &self.run_count)
            .finish()
    }
}

impl<T> Default for IntervalWalker<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cb, T> IntervalWalker<'cb, T> {
    /// Creates a walker over the empty range `[now, now)` with a one hour
    /// interval and no callback.
    pub fn new() -> Self {
        let now = Utc::now();
        Self::at(now, now, DEFAULT_INTERVAL_SECS)
    }

    fn at(start: DateTime<Utc>, end: DateTime<Utc>, interval_secs: u64) -> Self {
        Self {
            start,
            end,
            interval_secs,
            callback: None,
            log: ResultLog::new(),
            run_count: 0,
        }
    }

    /// Creates a walker over `[start, end)`.
    ///
    /// Both offsets are resolved against a single reading of the current
    /// time, so `with_range(7 * DAY, 0, DAY)` spans exactly seven days.
    pub fn with_range(
        start: impl Into<TimeBound>,
        end: impl Into<TimeBound>,
        interval_secs: u64,
    ) -> Result<Self, WalkerError> {
        let now = Utc::now();
        Ok(Self::at(
            start.into().resolve_start(now)?,
            end.into().resolve_end(now)?,
            interval_secs,
        ))
    }

    /// Creates a walker from a [`WalkerConfig`].
    pub fn from_config(config: &WalkerConfig) -> Result<Self, WalkerError> {
        Self::with_range(
            config.start.unwrap_or_default(),
            config.end.unwrap_or_default(),
            config.interval_secs,
        )
    }

    /// Sets the callback, consuming and returning the walker.
    #[must_use]
    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(DateTime<Utc>, DateTime<Utc>, &mut ResultSink<'_, T>) -> Result<(), BucketError>
            + 'cb,
    {
        self.set_callback(callback);
        self
    }

    // ========== Configuration ==========

    /// Sets the start of the range.
    ///
    /// An offset is subtracted from the current time at the moment of this
    /// call, not when the walker runs.
    pub fn set_start(&mut self, bound: impl Into<TimeBound>) -> Result<(), WalkerError> {
        self.start = bound.into().resolve_start(Utc::now())?;
        Ok(())
    }

    /// Sets the end of the range.
    ///
    /// An offset is added to the current time at the moment of this call.
    pub fn set_end(&mut self, bound: impl Into<TimeBound>) -> Result<(), WalkerError> {
        self.end = bound.into().resolve_end(Utc::now())?;
        Ok(())
    }

    /// Sets the interval length in seconds.
    ///
    /// Zero is rejected when the walker runs, with [`WalkerError::ZeroInterval`].
    pub const fn set_interval(&mut self, secs: u64) {
        self.interval_secs = secs;
    }

    pub fn set_callback<F>(&mut self, callback: F)
    where
        F: FnMut(DateTime<Utc>, DateTime<Utc>, &mut ResultSink<'_, T>) -> Result<(), BucketError>
            + 'cb,
    {
        self.callback = Some(Box::new(callback));
    }

    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Interval length in seconds.
    pub const fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Interval length as a duration, if representable.
    pub fn interval(&self) -> Option<TimeDelta> {
        bound::seconds(self.interval_secs)
    }

    pub const fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Number of buckets completed by the most recent run.
    pub const fn run_count(&self) -> usize {
        self.run_count
    }

    // ========== Run ==========

    /// Walks the range, invoking the callback once per bucket.
    ///
    /// Any previous results are discarded first. On error the run stops at
    /// the failing bucket; results recorded for earlier buckets stay in the
    /// log until the next run.
    pub fn run(&mut self) -> Result<&mut Self, WalkerError> {
        let Some(callback) = self.callback.as_mut() else {
            return Err(WalkerError::MissingCallback);
        };
        if self.start >= self.end {
            return Err(WalkerError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.interval_secs == 0 {
            return Err(WalkerError::ZeroInterval);
        }
        let step = bound::seconds(self.interval_secs).ok_or(WalkerError::IntervalOutOfRange {
            secs: self.interval_secs,
        })?;

        self.log.clear();
        self.run_count = 0;

        tracing::debug!(
            start = %self.start,
            end = %self.end,
            interval_secs = self.interval_secs,
            "walking time range"
        );

        let mut cursor = self.start;
        loop {
            let bucket = Bucket {
                start: cursor,
                end: cursor
                    .checked_add_signed(step)
                    .ok_or(WalkerError::TimeOutOfRange)?,
            };

            let mut sink = ResultSink::new(self.log.entries_mut(), bucket);
            callback(bucket.start, bucket.end, &mut sink).map_err(|source| {
                WalkerError::Callback {
                    bucket_start: bucket.start,
                    source,
                }
            })?;

            // Every bucket must contribute at least one result
            let added = sink.added();
            if added == 0 {
                return Err(WalkerError::EmptyBucket {
                    bucket_start: bucket.start,
                    bucket_end: bucket.end,
                });
            }
            tracing::trace!(start = %bucket.start, end = %bucket.end, added, "bucket complete");

            cursor = bucket.end;
            self.run_count += 1;

            if cursor >= self.end {
                break;
            }
        }

        tracing::debug!(
            buckets = self.run_count,
            results = self.log.len(),
            "finished walking time range"
        );

        Ok(self)
    }

    // ========== Results ==========

    /// Results of the most recent run, in the order they were added.
    pub fn results(&self) -> &[ResultEntry<T>] {
        self.log.as_slice()
    }

    pub const fn log(&self) -> &ResultLog<T> {
        &self.log
    }

    pub fn into_results(self) -> Vec<ResultEntry<T>> {
        self.log.into_entries()
    }

    pub fn get(&self, index: usize) -> Option<&ResultEntry<T>> {
        self.log.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultEntry<T>> {
        self.log.iter()
    }

    pub fn count(&self) -> usize {
        self.log.count()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub const fn rewind(&mut self) {
        self.log.rewind();
    }

    pub fn current(&self) -> Option<&ResultEntry<T>> {
        self.log.current()
    }

    pub const fn key(&self) -> usize {
        self.log.key()
    }

    pub const fn advance(&mut self) {
        self.log.advance();
    }

    pub fn valid(&self) -> bool {
        self.log.valid()
    }
}

impl<T> Index<usize> for IntervalWalker<'_, T> {
    type Output = ResultEntry<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.log[index]
    }
}

impl<'a, T> IntoIterator for &'a IntervalWalker<'_, T> {
    type Item = &'a ResultEntry<T>;
    type IntoIter = std::slice::Iter<'a, ResultEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.log.iter()
    }
}
