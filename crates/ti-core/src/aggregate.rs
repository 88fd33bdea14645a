//! Built-in bucket callbacks that summarize timestamped samples.
//!
//! Each aggregation adds exactly one [`BucketStat`] per bucket, so it always
//! satisfies the walker's one-result-per-bucket requirement, including for
//! buckets that contain no samples.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bucket::{Bucket, ResultSink};
use crate::error::{BucketError, WalkerError};

/// A single measurement at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,

    /// Measured value. Defaults to 1.0 so bare timestamps count as events.
    #[serde(default = "default_value")]
    pub value: f64,
}

const fn default_value() -> f64 {
    1.0
}

/// Summary of the samples that fell into one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    /// Number of samples in the bucket.
    pub samples: usize,

    /// Aggregated value. `None` when the aggregation is undefined for an
    /// empty bucket (mean, min, max).
    pub value: Option<f64>,
}

/// How samples in a bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Count,
    Sum,
    Mean,
    Min,
    Max,
}

impl Aggregation {
    pub const ALL: [Self; 5] = [Self::Count, Self::Sum, Self::Mean, Self::Min, Self::Max];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
        }
    }

    /// Applies the aggregation to a set of samples.
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, samples: &[Sample]) -> BucketStat {
        let values = samples.iter().map(|s| s.value);
        let value = match self {
            Self::Count => Some(samples.len() as f64),
            Self::Sum => Some(values.fold(0.0, |acc, v| acc + v)),
            Self::Mean => (!samples.is_empty())
                .then(|| values.fold(0.0, |acc, v| acc + v) / samples.len() as f64),
            Self::Min => values.reduce(f64::min),
            Self::Max => values.reduce(f64::max),
        };
        BucketStat {
            samples: samples.len(),
            value,
        }
    }

    /// Builds a walker callback that aggregates `samples` per bucket.
    ///
    /// `samples` must be sorted by timestamp ascending; each bucket's samples
    /// are located by binary search.
    pub fn callback(
        self,
        samples: &[Sample],
    ) -> impl FnMut(DateTime<Utc>, DateTime<Utc>, &mut ResultSink<'_, BucketStat>) -> Result<(), BucketError>
    + '_ {
        move |_, _, sink| {
            let stat = self.apply(samples_between(samples, &sink.bucket()));
            sink.add(stat);
            Ok(())
        }
    }
}

/// Returns the samples whose timestamp falls inside `bucket`.
///
/// `samples` must be sorted by timestamp ascending.
pub fn samples_between<'s>(samples: &'s [Sample], bucket: &Bucket) -> &'s [Sample] {
    let lo = samples.partition_point(|s| s.timestamp < bucket.start);
    let rest = &samples[lo..];
    &rest[..rest.partition_point(|s| bucket.contains(s.timestamp))]
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = WalkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|agg| agg.as_str() == s)
            .ok_or_else(|| WalkerError::InvalidCallback {
                name: s.to_string(),
            })
    }
}
