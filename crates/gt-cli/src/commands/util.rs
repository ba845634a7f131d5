//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use gt_core::{Entry, Selector};
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").expect("valid relative time regex")
});

/// Pre-compiled regex for compact durations like `1h30m`, `45m`, `1h30`.
///
/// Minutes without a unit are only allowed after hours.
static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)h(?:(\d+)m?)?)?(?:(\d+)m)?(?:(\d+)s)?$").expect("valid duration regex")
});

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as either RFC 3339 or relative to `now`.
///
/// Supports:
/// - RFC 3339: "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use RFC 3339 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Parse a compact duration: `5` (minutes), `5m`, `30s`, `1h`, `1h30`, `2h30m30s`.
///
/// Zero durations are rejected.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let input: String = s
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    if input.is_empty() {
        anyhow::bail!("duration cannot be empty");
    }

    let seconds = if input.chars().all(|c| c.is_ascii_digit()) {
        let minutes: i64 = input
            .parse()
            .with_context(|| format!("invalid number: {input}"))?;
        minutes.checked_mul(60)
    } else {
        let Some(caps) = DURATION_RE.captures(&input) else {
            anyhow::bail!(
                "invalid duration: {input} (supported formats: 5, 5m, 1h, 1h30, 1h30m, 2h30m30s)"
            );
        };
        let part = |index: usize, scale: i64| -> Result<i64> {
            caps.get(index).map_or(Ok(0), |m| {
                let value: i64 = m
                    .as_str()
                    .parse()
                    .with_context(|| format!("invalid number: {}", m.as_str()))?;
                value
                    .checked_mul(scale)
                    .context("duration too large")
            })
        };
        [part(1, 3_600)?, part(2, 60)?, part(3, 60)?, part(4, 1)?]
            .into_iter()
            .try_fold(0_i64, i64::checked_add)
    };

    let seconds = seconds.context("duration too large")?;
    if seconds == 0 {
        anyhow::bail!("duration cannot be zero");
    }
    Duration::try_seconds(seconds).context("duration too large")
}

/// Parse selector arguments (`3`, `coding`) in order.
pub fn parse_selectors(args: &[String]) -> Result<Vec<Selector>> {
    args.iter()
        .map(|arg| {
            arg.parse::<Selector>()
                .with_context(|| format!("invalid target: '{arg}'"))
        })
        .collect()
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tag_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Format whole seconds as `HH:MM:SS`.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3_600,
        (seconds % 3_600) / 60,
        seconds % 60
    )
}

/// `entry` or `entries` to follow `count`.
pub const fn entries_noun(count: usize) -> &'static str {
    if count == 1 { "entry" } else { "entries" }
}

/// Keyword followed by bracketed tags, if any.
pub fn describe(entry: &Entry) -> String {
    if entry.tags.is_empty() {
        entry.keyword.clone()
    } else {
        format!("{} [{}]", entry.keyword, entry.tags.join(", "))
    }
}

/// One-line summary used by most commands.
pub fn entry_line(entry: &Entry, now: DateTime<Utc>) -> String {
    format!(
        "{}: {} - {} ({})",
        entry.short_id,
        describe(entry),
        format_duration(entry.current_duration(now)),
        entry.status()
    )
}
