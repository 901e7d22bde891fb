use notify_rust::Notification;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use tracing::{info, warn};

use crate::config::Config;

/// What to surface when a session reaches its timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub elapsed_text: String,
    pub sound_file: Option<PathBuf>,
}

impl Alert {
    pub fn new(elapsed_text: impl Into<String>, config: &Config) -> Self {
        Self {
            elapsed_text: elapsed_text.into(),
            sound_file: config.sound_path().map(Path::to_path_buf),
        }
    }

    pub fn body(&self) -> String {
        format!("Pomodoro finished after {}. Time for a break.", self.elapsed_text)
    }
}

/// Sink for timeout alerts. Delivery is best effort and never fails the caller.
pub trait Alerter {
    fn alert(&self, alert: &Alert);
}

/// Desktop notification plus an optional sound file played by whichever
/// command-line player is installed.
#[derive(Debug, Clone, Default)]
pub struct DesktopAlerter;

const SOUND_PLAYERS: [&str; 3] = ["paplay", "aplay", "afplay"];

impl DesktopAlerter {
    fn notify(&self, alert: &Alert) {
        let shown = Notification::new()
            .summary("PomoTimer")
            .body(&alert.body())
            .appname("pomotimer")
            .icon("alarm-clock")
            .show();
        if let Err(err) = shown {
            warn!(%err, "desktop notification failed");
        }
    }

    /// Returns whether a player was launched. The child is reaped on a
    /// detached thread.
    fn play(&self, path: &Path) -> bool {
        if !path.exists() {
            warn!(path = %path.display(), "sound file not found");
            return false;
        }
        for player in SOUND_PLAYERS {
            let spawned = Command::new(player)
                .arg(path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            if let Ok(child) = spawned {
                info!(player, path = %path.display(), "playing timeout sound");
                reap(player, child);
                return true;
            }
        }
        warn!(path = %path.display(), "no sound player available");
        false
    }
}

fn reap(player: &'static str, mut child: Child) {
    thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => warn!(player, %status, "sound player failed"),
        Ok(_) => {}
        Err(err) => warn!(player, %err, "could not wait for sound player"),
    });
}

impl Alerter for DesktopAlerter {
    fn alert(&self, alert: &Alert) {
        self.notify(alert);
        if let Some(path) = &alert.sound_file {
            self.play(path);
        }
    }
}
