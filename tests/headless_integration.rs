use std::sync::mpsc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use pomotimer::chart;
use pomotimer::runtime::{FixedTicker, Runner, TestEventSource, TimerEvent};
use pomotimer::timer::{DisplayState, TimerApp};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn key(c: char) -> TimerEvent {
    TimerEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

// Headless loop using the runtime without a TTY. Every Tick advances a
// simulated clock by one second; keys act at the current simulated instant.
#[test]
fn headless_session_times_out_once() {
    let mut timer = TimerApp::new(5, t0());
    let mut now = t0();

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let runner = Runner::new(es, ticker);

    tx.send(key('s')).unwrap();

    let mut fired_at = Vec::new();
    for _ in 0..20u32 {
        match runner.step() {
            TimerEvent::Tick => {
                now += TimeDelta::seconds(1);
                if timer.tick(now) {
                    fired_at.push(timer.current().unwrap().elapsed(now));
                }
            }
            TimerEvent::Resize | TimerEvent::Closed => {}
            TimerEvent::Key(k) => {
                if k.code == KeyCode::Char('s') {
                    assert!(timer.start(now));
                }
            }
        }
    }

    assert_eq!(fired_at, vec![5]);
    assert_eq!(timer.display_state(now), DisplayState::Overdue);
}

#[test]
fn headless_pause_delays_timeout() {
    let mut timer = TimerApp::new(5, t0());
    let mut now = t0();
    timer.start(now);

    let mut fired = None;
    for second in 1..=20i64 {
        now = t0() + TimeDelta::seconds(second);
        match second {
            2 => {
                timer.toggle_pause(now);
            }
            10 => {
                timer.toggle_pause(now);
            }
            _ => {}
        }
        if timer.tick(now) {
            fired = Some(second);
        }
    }

    // 2s running, 8s paused, then 3 more running seconds
    assert_eq!(fired, Some(13));
}

#[test]
fn full_day_history_projects_onto_today() {
    let day = |d: u32, h: u32, m: u32| {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    };

    let mut timer = TimerApp::new(1500, day(9, 22, 0));
    timer.start(day(9, 22, 0));
    timer.stop(day(9, 22, 25));
    timer.start(day(9, 23, 30));
    timer.stop(day(10, 0, 30));
    timer.start(day(10, 9, 0));
    timer.stop(day(10, 9, 25));
    timer.start(day(10, 11, 0));

    let now = day(10, 11, 10);
    let intervals = chart::project(timer.history(), now);
    let offsets: Vec<(u32, u32)> = intervals.iter().map(|i| (i.start, i.stop)).collect();
    assert_eq!(
        offsets,
        vec![
            (0, 1800),
            (9 * 3600, 9 * 3600 + 1500),
            (11 * 3600, 11 * 3600 + 600),
        ]
    );

    let arcs = chart::arcs(timer.history(), now);
    assert_eq!(arcs.len(), 3);
    assert!(arcs.iter().all(|a| a.from >= a.to));
}

#[test]
fn display_tracks_time_since_last_stop() {
    let mut timer = TimerApp::new(1500, t0());
    timer.start(t0());
    timer.stop(t0() + TimeDelta::seconds(1500));
    let later = t0() + TimeDelta::seconds(1500 + 3725);
    assert_eq!(timer.display_text(later), "01:02:05");
    assert_eq!(timer.status_line(later), "PomoTimer");
    assert!(timer.controls().start);
}
