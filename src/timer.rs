use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::config::Config;
use crate::session::{Session, SessionState};
use crate::util::{sec_to_str, seconds_between};

pub const DEFAULT_TIMEOUT_SECS: u64 = 1500;

const APP_TITLE: &str = "PomoTimer";

/// Categorical state behind the counter colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// No session, or the last one has stopped.
    Idle,
    Paused,
    Running,
    /// Running at or past the timeout.
    Overdue,
}

/// Which controls the UI should offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    /// Pause is shown latched while the session is paused.
    pub pause_pushed: bool,
    pub stop: bool,
}

/// Owns the session history and drives the current session.
///
/// Every operation is a no-op when its precondition does not hold and
/// reports whether it took effect.
#[derive(Debug, Clone)]
pub struct TimerApp {
    history: Vec<Session>,
    current: Option<usize>,
    timeout_seconds: u64,
    notified: bool,
    launched: NaiveDateTime,
}

impl TimerApp {
    pub fn new(timeout_seconds: u64, now: NaiveDateTime) -> Self {
        Self::with_history(timeout_seconds, Vec::new(), now)
    }

    pub fn from_config(config: &Config, now: NaiveDateTime) -> Self {
        Self::new(config.timeout_seconds(), now)
    }

    /// Seed the history without selecting a current session.
    pub fn with_history(timeout_seconds: u64, history: Vec<Session>, now: NaiveDateTime) -> Self {
        Self {
            history,
            current: None,
            timeout_seconds,
            notified: false,
            launched: now,
        }
    }

    pub fn history(&self) -> &[Session] {
        &self.history
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.and_then(|idx| self.history.get(idx))
    }

    fn current_mut(&mut self) -> Option<&mut Session> {
        self.current.and_then(|idx| self.history.get_mut(idx))
    }

    fn current_state(&self) -> Option<SessionState> {
        self.current().map(Session::state)
    }

    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    pub fn set_timeout_seconds(&mut self, timeout_seconds: u64) {
        self.timeout_seconds = timeout_seconds;
    }

    pub fn notified(&self) -> bool {
        self.notified
    }

    pub fn launched(&self) -> NaiveDateTime {
        self.launched
    }

    pub fn is_active(&self) -> bool {
        matches!(
            self.current_state(),
            Some(SessionState::Running | SessionState::Paused)
        )
    }

    pub fn start(&mut self, now: NaiveDateTime) -> bool {
        if self.is_active() {
            return false;
        }
        self.history.push(Session::new(now));
        self.current = Some(self.history.len() - 1);
        self.notified = false;
        debug!(sessions = self.history.len(), "session started");
        true
    }

    pub fn toggle_pause(&mut self, now: NaiveDateTime) -> bool {
        match self.current_mut() {
            Some(session) if session.is_paused() => session.resume(now),
            Some(session) => session.pause(now),
            None => false,
        }
    }

    pub fn stop(&mut self, now: NaiveDateTime) -> bool {
        match self.current_mut() {
            Some(session) if !session.is_stopped() => {
                session.stop(now);
                true
            }
            _ => false,
        }
    }

    /// Periodic check. Returns true on the tick where the current session
    /// first reaches the timeout; later ticks stay quiet until a new start.
    pub fn tick(&mut self, now: NaiveDateTime) -> bool {
        if self.notified {
            return false;
        }
        let elapsed = match self.current() {
            Some(session) if !session.is_stopped() => session.elapsed(now),
            _ => return false,
        };
        if elapsed < self.timeout_seconds {
            return false;
        }
        self.notified = true;
        info!(elapsed, timeout = self.timeout_seconds, "session timed out");
        true
    }

    /// Seconds shown on the counter: the session's running time while it is
    /// active, otherwise the time since the last stop (or since launch).
    pub fn display_seconds(&self, now: NaiveDateTime) -> u64 {
        match self.current() {
            Some(session) => match session.stopped() {
                Some(stopped) => seconds_between(stopped, now),
                None => session.elapsed(now),
            },
            None => match self.history.last().and_then(Session::stopped) {
                Some(stopped) => seconds_between(stopped, now),
                None => seconds_between(self.launched, now),
            },
        }
    }

    pub fn display_text(&self, now: NaiveDateTime) -> String {
        sec_to_str(self.display_seconds(now))
    }

    pub fn display_state(&self, now: NaiveDateTime) -> DisplayState {
        match self.current() {
            None => DisplayState::Idle,
            Some(session) => match session.state() {
                SessionState::Stopped => DisplayState::Idle,
                SessionState::Paused => DisplayState::Paused,
                SessionState::Running if session.elapsed(now) >= self.timeout_seconds => {
                    DisplayState::Overdue
                }
                SessionState::Running => DisplayState::Running,
            },
        }
    }

    pub fn controls(&self) -> Controls {
        match self.current_state() {
            None | Some(SessionState::Stopped) => Controls {
                start: true,
                ..Controls::default()
            },
            Some(state) => Controls {
                start: false,
                pause: true,
                pause_pushed: state == SessionState::Paused,
                stop: true,
            },
        }
    }

    pub fn status_line(&self, now: NaiveDateTime) -> String {
        match self.current() {
            Some(session) if !session.is_stopped() => {
                format!("{APP_TITLE} - {}", sec_to_str(session.elapsed(now)))
            }
            _ => APP_TITLE.to_string(),
        }
    }
}
