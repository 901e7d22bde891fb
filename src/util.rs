use chrono::{NaiveDateTime, TimeDelta};

/// Format a second count as `HH:MM:SS`. Hours are not capped at 24.
pub fn sec_to_str(s: u64) -> String {
    let h = s / 3600;
    let m = (s - h * 3600) / 60;
    let sec = s % 60;

    format!("{h:02}:{m:02}:{sec:02}")
}

/// Whole seconds of a delta, sub-second part discarded. Negative deltas are zero.
pub fn whole_seconds(delta: TimeDelta) -> u64 {
    delta.num_seconds().max(0) as u64
}

/// Whole seconds from `from` to `to`.
pub fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> u64 {
    whole_seconds(to - from)
}
