//! Aggregate command for summarizing JSONL samples per bucket.
//!
//! Each input line is a JSON object with an RFC 3339 `timestamp` and an
//! optional numeric `value` (default 1.0). Samples outside the walked range
//! are ignored.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ti_core::{Aggregation, BucketStat, IntervalWalker, ResultEntry, Sample};

use super::util::{Range, format_instant};
use crate::Config;
use crate::cli::AggregateArgs;

#[derive(Debug, Serialize)]
struct AggregateOutput {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_secs: u64,
    function: Aggregation,
    results: Vec<ResultEntry<BucketStat>>,
}

/// Parses JSONL samples and sorts them by timestamp.
///
/// Blank lines are skipped.
pub fn parse_samples(content: &str) -> Result<Vec<Sample>> {
    let mut samples = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<Sample>(line)
                .with_context(|| format!("invalid sample on line {}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    samples.sort_by_key(|s| s.timestamp);
    Ok(samples)
}

/// Reads samples from a file, or from stdin when the path is `-`.
pub fn read_samples(path: &Path) -> Result<Vec<Sample>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read samples from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    parse_samples(&content)
}

/// Walks `range`, applying `function` to the samples in each bucket.
pub fn walk(
    range: &Range,
    function: Aggregation,
    samples: &[Sample],
) -> Result<Vec<ResultEntry<BucketStat>>> {
    let mut walker = IntervalWalker::from_config(&range.walker_config())?
        .with_callback(function.callback(samples));
    walker.run()?;
    Ok(walker.into_results())
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}"))
}

pub fn format_aggregate(
    range: &Range,
    function: Aggregation,
    results: &[ResultEntry<BucketStat>],
) -> String {
    use std::fmt::Write as _;

    let mut output = String::new();
    writeln!(output, "AGGREGATE ({function}): {}", range.describe()).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "{:<20}  {:<20}  {:>7}  VALUE", "START", "END", "SAMPLES").unwrap();
    for entry in results {
        writeln!(
            output,
            "{}  {}  {:>7}  {}",
            format_instant(entry.interval_start),
            format_instant(entry.interval_end),
            entry.data.samples,
            format_value(entry.data.value)
        )
        .unwrap();
    }

    let total: usize = results.iter().map(|e| e.data.samples).sum();
    writeln!(output).unwrap();
    writeln!(output, "{total} samples in {} buckets", results.len()).unwrap();
    output
}

pub fn run<W: Write>(writer: &mut W, args: &AggregateArgs, config: &Config) -> Result<()> {
    let range = Range::resolve(&args.range, config)?;
    let function: Aggregation = args
        .function
        .as_deref()
        .unwrap_or(&config.function)
        .parse()
        .context("invalid aggregation function")?;

    let samples = read_samples(&args.input)?;
    tracing::debug!(count = samples.len(), path = ?args.input, "loaded samples");

    let results = walk(&range, function, &samples)?;

    if args.range.json {
        let output = AggregateOutput {
            start: range.start,
            end: range.end,
            interval_secs: range.interval_secs,
            function,
            results,
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    } else {
        write!(writer, "{}", format_aggregate(&range, function, &results))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use insta::assert_snapshot;

    use crate::cli::RangeArgs;

    const SAMPLES: &str = r#"{"timestamp":"2025-01-01T01:10:00Z","value":10}
{"timestamp":"2025-01-01T00:00:00Z","value":2}

{"timestamp":"2025-01-01T00:30:00Z","value":4.5}
{"timestamp":"2025-01-01T03:05:00Z"}
{"timestamp":"2025-01-01T05:00:00Z","value":99}
"#;

    fn write_samples(dir: &Path) -> PathBuf {
        let path = dir.join("samples.jsonl");
        std::fs::write(&path, SAMPLES).unwrap();
        path
    }

    fn args(input: PathBuf, function: Option<&str>, json: bool) -> AggregateArgs {
        AggregateArgs {
            range: RangeArgs {
                start: Some("2025-01-01T00:00:00Z".to_string()),
                end: Some("2025-01-01T04:00:00Z".to_string()),
                interval: Some(3600),
                json,
            },
            input,
            function: function.map(String::from),
        }
    }

    fn render(args: &AggregateArgs, config: &Config) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, args, config)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn parse_samples_sorts_and_skips_blank_lines() {
        let samples = parse_samples(SAMPLES).unwrap();
        assert_eq!(samples.len(), 5);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(format_instant(samples[0].timestamp), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn parse_samples_reports_line_number() {
        let err = parse_samples("{\"timestamp\":\"2025-01-01T00:00:00Z\"}\nnot json\n").unwrap_err();
        assert_eq!(err.to_string(), "invalid sample on line 2");
    }

    #[test]
    fn aggregate_sum_table() {
        let temp = tempfile::tempdir().unwrap();
        let input = write_samples(temp.path());

        let output = render(&args(input, Some("sum"), false), &Config::default()).unwrap();
        assert_snapshot!(output, @r"
        AGGREGATE (sum): 2025-01-01T00:00:00Z to 2025-01-01T04:00:00Z (1h intervals)

        START                 END                   SAMPLES  VALUE
        2025-01-01T00:00:00Z  2025-01-01T01:00:00Z        2  6.5
        2025-01-01T01:00:00Z  2025-01-01T02:00:00Z        1  10
        2025-01-01T02:00:00Z  2025-01-01T03:00:00Z        0  0
        2025-01-01T03:00:00Z  2025-01-01T04:00:00Z        1  1

        4 samples in 4 buckets
        ");
    }

    #[test]
    fn aggregate_mean_marks_empty_buckets() {
        let temp = tempfile::tempdir().unwrap();
        let input = write_samples(temp.path());

        let output = render(&args(input, Some("mean"), false), &Config::default()).unwrap();
        assert_snapshot!(output, @r"
        AGGREGATE (mean): 2025-01-01T00:00:00Z to 2025-01-01T04:00:00Z (1h intervals)

        START                 END                   SAMPLES  VALUE
        2025-01-01T00:00:00Z  2025-01-01T01:00:00Z        2  3.25
        2025-01-01T01:00:00Z  2025-01-01T02:00:00Z        1  10
        2025-01-01T02:00:00Z  2025-01-01T03:00:00Z        0  -
        2025-01-01T03:00:00Z  2025-01-01T04:00:00Z        1  1

        4 samples in 4 buckets
        ");
    }

    #[test]
    fn aggregate_uses_configured_function() {
        let temp = tempfile::tempdir().unwrap();
        let input = write_samples(temp.path());
        let config = Config {
            function: "max".to_string(),
            ..Config::default()
        };

        let output = render(&args(input, None, true), &config).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["function"], "max");
        let values: Vec<_> = parsed["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["data"]["value"].clone())
            .collect();
        assert_eq!(
            values,
            [
                serde_json::json!(4.5),
                serde_json::json!(10.0),
                serde_json::Value::Null,
                serde_json::json!(1.0)
            ]
        );
    }

    #[test]
    fn aggregate_rejects_unknown_function() {
        let temp = tempfile::tempdir().unwrap();
        let input = write_samples(temp.path());

        let err = render(&args(input, Some("median"), false), &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "invalid aggregation function");
        assert_eq!(
            err.root_cause().to_string(),
            "callback `median` is not callable"
        );
    }

    #[test]
    fn aggregate_reports_missing_input() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing.jsonl");

        let err = render(&args(missing, None, false), &Config::default()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
