//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use regex::Regex;
use ti_core::{TimeBound, WalkerConfig};

use crate::Config;
use crate::cli::RangeArgs;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(second|minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in seconds).
const MAX_RELATIVE_SECONDS: i64 = 1000 * 365 * 24 * 60 * 60;

/// Parse a datetime string as ISO 8601, `now`, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - "now"
/// - Relative: "90 seconds ago", "2 hours ago", "1 day ago", "1 week ago"
///
/// `now` and relative times are resolved against `now`.
pub fn parse_datetime_at(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if s == "now" {
        return Ok(now);
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), 'now', or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let seconds_per_unit = match &caps[2] {
        "second" => 1,
        "minute" => 60,
        "hour" => 60 * 60,
        "day" => 60 * 60 * 24,
        "week" => 60 * 60 * 24 * 7,
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > MAX_RELATIVE_SECONDS / seconds_per_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::seconds(n * seconds_per_unit))
}

/// A walk range with every default filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval_secs: u64,
}

impl Range {
    /// Resolves command-line range arguments, falling back to configuration.
    ///
    /// Relative start and end share one reading of the clock, so
    /// `--start "7 days ago" --end now` spans exactly seven days.
    pub fn resolve(args: &RangeArgs, config: &Config) -> anyhow::Result<Self> {
        Self::resolve_at(args, &config.walker, Utc::now())
    }

    fn resolve_at(
        args: &RangeArgs,
        walker: &WalkerConfig,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Self> {
        let start = match &args.start {
            Some(s) => parse_datetime_at(s, now).context("invalid --start")?,
            None => walker
                .start
                .context("no start given: pass --start or set `start` in the config file")?
                .resolve_start(now)?,
        };
        let end = match &args.end {
            Some(s) => parse_datetime_at(s, now).context("invalid --end")?,
            None => walker.end.unwrap_or_default().resolve_end(now)?,
        };
        Ok(Self {
            start,
            end,
            interval_secs: args.interval.unwrap_or(walker.interval_secs),
        })
    }

    /// The walker configuration for this range, with both bounds fixed.
    pub const fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            start: Some(TimeBound::At(self.start)),
            end: Some(TimeBound::At(self.end)),
            interval_secs: self.interval_secs,
        }
    }

    /// Header line shared by the human-readable outputs.
    pub fn describe(&self) -> String {
        format!(
            "{} to {} ({} intervals)",
            format_instant(self.start),
            format_instant(self.end),
            format_interval(self.interval_secs)
        )
    }
}

/// Formats an instant as RFC 3339 with second precision and a `Z` suffix.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Formats an interval length using the largest unit that divides it evenly.
pub fn format_interval(secs: u64) -> String {
    match secs {
        0 => "0s".to_string(),
        s if s % 86_400 == 0 => format!("{}d", s / 86_400),
        s if s % 3600 == 0 => format!("{}h", s / 3600),
        s if s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}
