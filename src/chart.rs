//! Projection of session history onto a clock-face pie chart.
//!
//! Sessions are clipped to the calendar day containing `now` and reduced to
//! second offsets from midnight. Offsets map onto angles with half a turn per
//! twelve hours, so the afternoon continues past zero into negative angles.

use std::f64::consts::PI;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

use crate::session::Session;
use crate::util::seconds_between;

pub const HALF_DAY_SECS: f64 = 43_200.0;

/// Day-relative interval in whole seconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: u32,
    pub stop: u32,
}

impl Interval {
    pub fn to_arc(self) -> Arc {
        Arc {
            from: sec_to_rad(self.start as f64),
            to: sec_to_rad(self.stop as f64),
        }
    }
}

/// Angular slice in radians. `from` is never smaller than `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub from: f64,
    pub to: f64,
}

impl Arc {
    /// Boundary point at `angle` on a circle of `radius`, relative to the centre.
    pub fn point(angle: f64, radius: f64) -> (f64, f64) {
        (angle.cos() * radius, angle.sin() * radius)
    }

    /// True when both boundary points land on the same grid cell at `radius`,
    /// in which case the slice is drawn as a radial line.
    pub fn is_degenerate(&self, radius: f64) -> bool {
        let (fx, fy) = Self::point(self.from, radius);
        let (tx, ty) = Self::point(self.to, radius);
        (fx as i64, fy as i64) == (tx as i64, ty as i64)
    }
}

pub fn sec_to_rad(sec: f64) -> f64 {
    PI - PI * (sec / HALF_DAY_SECS)
}

/// Clip every session to today and return the surviving intervals in history
/// order. Sessions without a stop time run up to `now`.
pub fn project(history: &[Session], now: NaiveDateTime) -> Vec<Interval> {
    let today = now.date().and_time(NaiveTime::MIN);
    let tomorrow = today + TimeDelta::days(1);

    history
        .iter()
        .filter_map(|session| {
            let start = session.started();
            let stop = session.stopped().unwrap_or(now);
            if stop <= today || start >= tomorrow {
                return None;
            }

            let start = start.max(today);
            let stop = stop.min(tomorrow);
            Some(Interval {
                start: seconds_between(today, start) as u32,
                stop: seconds_between(today, stop) as u32,
            })
        })
        .collect()
}

pub fn arcs(history: &[Session], now: NaiveDateTime) -> Vec<Arc> {
    project(history, now)
        .into_iter()
        .map(Interval::to_arc)
        .collect()
}
