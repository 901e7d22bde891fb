use chrono::NaiveDateTime;
use tracing::debug;

use crate::util::seconds_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Running,
    Paused,
    Stopped,
}

/// One tracked work interval.
///
/// A session starts running and moves between running and paused until it is
/// stopped, after which it never changes again. Running time is accumulated in
/// whole seconds each time the session leaves the running state, so every
/// pause/resume cycle drops its sub-second remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    started: NaiveDateTime,
    resumed: Option<NaiveDateTime>,
    paused: Option<NaiveDateTime>,
    stopped: Option<NaiveDateTime>,
    elapse: u64,
}

impl Session {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            started: now,
            resumed: Some(now),
            paused: None,
            stopped: None,
            elapse: 0,
        }
    }

    pub fn started(&self) -> NaiveDateTime {
        self.started
    }

    pub fn resumed(&self) -> Option<NaiveDateTime> {
        self.resumed
    }

    pub fn paused(&self) -> Option<NaiveDateTime> {
        self.paused
    }

    pub fn stopped(&self) -> Option<NaiveDateTime> {
        self.stopped
    }

    pub fn state(&self) -> SessionState {
        if self.stopped.is_some() {
            SessionState::Stopped
        } else if self.paused.is_some() {
            SessionState::Paused
        } else {
            SessionState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state() == SessionState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == SessionState::Stopped
    }

    /// Returns false when the session is already paused or stopped.
    pub fn pause(&mut self, now: NaiveDateTime) -> bool {
        if self.paused.is_some() || self.stopped.is_some() {
            return false;
        }
        if let Some(resumed) = self.resumed.take() {
            self.elapse += seconds_between(resumed, now);
        }
        self.paused = Some(now);
        debug!(elapse = self.elapse, "session paused");
        true
    }

    /// Returns false unless the session is paused.
    pub fn resume(&mut self, now: NaiveDateTime) -> bool {
        if self.paused.is_none() || self.stopped.is_some() {
            return false;
        }
        self.paused = None;
        self.resumed = Some(now);
        debug!(elapse = self.elapse, "session resumed");
        true
    }

    /// Moves the session to its terminal state. Calling this twice moves the
    /// stop timestamp; the controller never does.
    pub fn stop(&mut self, now: NaiveDateTime) {
        self.stopped = Some(now);
        if let Some(resumed) = self.resumed.take() {
            self.elapse += seconds_between(resumed, now);
        }
        self.paused = None;
        debug!(elapse = self.elapse, "session stopped");
    }

    /// Running seconds, excluding paused time.
    pub fn elapsed(&self, now: NaiveDateTime) -> u64 {
        match (self.state(), self.resumed) {
            (SessionState::Running, Some(resumed)) => self.elapse + seconds_between(resumed, now),
            _ => self.elapse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn secs(s: i64) -> NaiveDateTime {
        t0() + TimeDelta::seconds(s)
    }

    fn millis(ms: i64) -> NaiveDateTime {
        t0() + TimeDelta::milliseconds(ms)
    }

    #[test]
    fn test_new_session_is_running() {
        let s = Session::new(t0());
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.started(), t0());
        assert_eq!(s.resumed(), Some(t0()));
        assert_eq!(s.paused(), None);
        assert_eq!(s.stopped(), None);
        assert_eq!(s.elapsed(t0()), 0);
    }

    #[test]
    fn test_elapsed_grows_while_running() {
        let s = Session::new(t0());
        let mut last = 0;
        for i in 0..30 {
            let e = s.elapsed(secs(i));
            assert!(e >= last);
            last = e;
        }
        assert_eq!(s.elapsed(secs(29)), 29);
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let mut s = Session::new(t0());
        assert!(s.pause(secs(10)));
        assert_eq!(s.state(), SessionState::Paused);
        assert_eq!(s.resumed(), None);
        assert_eq!(s.paused(), Some(secs(10)));
        assert_eq!(s.elapsed(secs(10)), 10);
        assert_eq!(s.elapsed(secs(500)), 10);
    }

    #[test]
    fn test_pause_twice_is_noop() {
        let mut s = Session::new(t0());
        s.pause(secs(10));
        assert!(!s.pause(secs(20)));
        assert_eq!(s.paused(), Some(secs(10)));
        assert_eq!(s.elapsed(secs(30)), 10);
    }

    #[test]
    fn test_resume_excludes_paused_gap() {
        let mut s = Session::new(t0());
        s.pause(secs(10));
        assert!(s.resume(secs(100)));
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.paused(), None);
        assert_eq!(s.elapsed(secs(105)), 15);
    }

    #[test]
    fn test_resume_when_running_is_noop() {
        let mut s = Session::new(t0());
        assert!(!s.resume(secs(5)));
        assert_eq!(s.resumed(), Some(t0()));
        assert_eq!(s.elapsed(secs(5)), 5);
    }

    #[test]
    fn test_stop_from_running() {
        let mut s = Session::new(t0());
        s.stop(secs(42));
        assert_eq!(s.state(), SessionState::Stopped);
        assert_eq!(s.stopped(), Some(secs(42)));
        assert_eq!(s.elapsed(secs(1000)), 42);
    }

    #[test]
    fn test_stop_from_paused_keeps_frozen_total() {
        let mut s = Session::new(t0());
        s.pause(secs(20));
        s.stop(secs(60));
        assert_eq!(s.state(), SessionState::Stopped);
        assert_eq!(s.paused(), None);
        assert_eq!(s.elapsed(secs(60)), 20);
    }

    #[test]
    fn test_stopped_session_ignores_pause_and_resume() {
        let mut s = Session::new(t0());
        s.stop(secs(5));
        assert!(!s.pause(secs(6)));
        assert!(!s.resume(secs(7)));
        assert_eq!(s.state(), SessionState::Stopped);
        assert_eq!(s.elapsed(secs(8)), 5);
    }

    #[test]
    fn test_elapsed_is_sum_of_truncated_running_intervals() {
        // running 0.0..2.7, paused, running 5.0..6.9, paused, running 10.0..13.5
        let mut s = Session::new(millis(0));
        s.pause(millis(2700));
        s.resume(millis(5000));
        s.pause(millis(6900));
        s.resume(millis(10_000));
        s.stop(millis(13_500));
        assert_eq!(s.elapsed(millis(20_000)), 2 + 1 + 3);
    }

    #[test]
    fn test_truncation_loses_subsecond_per_cycle() {
        let mut s = Session::new(millis(0));
        for cycle in 0..4 {
            let base = cycle * 2000;
            s.pause(millis(base + 1900));
            s.resume(millis(base + 2000));
        }
        s.stop(millis(8000));
        assert_eq!(s.elapsed(millis(8000)), 4);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Running.to_string(), "Running");
        assert_eq!(SessionState::Stopped.to_string(), "Stopped");
    }
}
