//! Buckets command for listing the sub-intervals of a range.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use ti_core::{IntervalWalker, ResultEntry};

use super::util::{Range, format_instant};
use crate::Config;
use crate::cli::RangeArgs;

#[derive(Debug, Serialize)]
struct BucketsOutput {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_secs: u64,
    buckets: Vec<ResultEntry<usize>>,
}

/// Walks `range`, recording each bucket's index.
pub fn walk(range: &Range) -> Result<Vec<ResultEntry<usize>>> {
    let mut walker =
        IntervalWalker::from_config(&range.walker_config())?.with_callback(|_, _, sink| {
            let index = sink.len();
            sink.add(index);
            Ok(())
        });
    walker.run()?;
    Ok(walker.into_results())
}

pub fn format_buckets(range: &Range, buckets: &[ResultEntry<usize>]) -> String {
    use std::fmt::Write as _;

    let mut output = String::new();
    writeln!(output, "BUCKETS: {}", range.describe()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "{:>5}  {:<20}  END", "INDEX", "START").unwrap();
    for bucket in buckets {
        writeln!(
            output,
            "{:>5}  {}  {}",
            bucket.data,
            format_instant(bucket.interval_start),
            format_instant(bucket.interval_end)
        )
        .unwrap();
    }
    writeln!(output).unwrap();
    let noun = if buckets.len() == 1 { "bucket" } else { "buckets" };
    writeln!(output, "{} {noun}", buckets.len()).unwrap();
    output
}

pub fn run<W: Write>(writer: &mut W, args: &RangeArgs, config: &Config) -> Result<()> {
    let range = Range::resolve(args, config)?;
    let buckets = walk(&range)?;
    tracing::debug!(count = buckets.len(), "walked buckets");

    if args.json {
        let output = BucketsOutput {
            start: range.start,
            end: range.end,
            interval_secs: range.interval_secs,
            buckets,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(writer, "{}", format_buckets(&range, &buckets))?;
    }
    Ok(())
}
