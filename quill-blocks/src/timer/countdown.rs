//! Countdown engine - pure snapshot computation for a deadline.

use chrono::{
    DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use quill_api::{CountdownSnapshot, Remaining};

/// Date-time shapes without an offset, read as local time.
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Compute the countdown state for `deadline` as seen at `now`.
///
/// Returns `None` when no deadline is set, which suppresses the view.
pub fn compute_snapshot(deadline: &str, now: DateTime<Utc>) -> Option<CountdownSnapshot> {
    if deadline.trim().is_empty() {
        return None;
    }
    let Some(target) = parse_deadline(deadline) else {
        return Some(CountdownSnapshot::Invalid);
    };

    let delta = (target - now).num_milliseconds();
    if delta <= 0 {
        Some(CountdownSnapshot::Expired)
    } else {
        Some(CountdownSnapshot::Remaining(Remaining::from_millis(delta as u64)))
    }
}

/// Parse a stored deadline.
///
/// Accepts RFC 3339, offset-less date-times as produced by a local date-time
/// picker (read in the local zone), and bare dates (UTC midnight).
pub fn parse_deadline(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return resolve_local(&Local, naive);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Read a wall-clock time in `tz`.
///
/// Ambiguous times (clocks turned back) take the earlier instant. Times that
/// fall in a forward gap are read with the offset in force before the gap,
/// so `02:30` on a spring-forward night lands at `03:30` after the change.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let before = (1..=24).find_map(|hours| {
                tz.from_local_datetime(&(naive - TimeDelta::hours(hours))).latest()
            })?;
            before
                .offset()
                .fix()
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

/// Value for the date-time input control: the deadline in UTC with
/// millisecond precision and no zone suffix. Empty if unset or unparseable.
pub fn to_input_value(deadline: &str) -> String {
    parse_deadline(deadline)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
        .unwrap_or_default()
}
