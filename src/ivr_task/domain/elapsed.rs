//! Time spent in an IVR step.
//!
//! The measure is wall-clock time between task creation and cancellation.
//! Each menu step maps to exactly one task, so this approximates how long the
//! caller stayed in the step.

use chrono::{DateTime, Utc};

const MILLIS_PER_SECOND: i64 = 1_000;
const HALF_SECOND_MILLIS: i64 = 500;

/// Parses a task creation timestamp.
///
/// The task-routing service reports RFC 2822 dates; RFC 3339 is accepted as
/// well.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Returns whole seconds between `created` and `now`, rounded half up.
///
/// Missing or unparsable timestamps, and creation times in the future, all
/// yield zero.
#[must_use]
pub fn elapsed_seconds(created: Option<&str>, now: DateTime<Utc>) -> u64 {
    let Some(created_at) = created.and_then(parse_timestamp) else {
        return 0;
    };
    let millis = now.signed_duration_since(created_at).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let rounded = millis
        .saturating_add(HALF_SECOND_MILLIS)
        .div_euclid(MILLIS_PER_SECOND);
    u64::try_from(rounded).unwrap_or(0)
}
