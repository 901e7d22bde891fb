use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

pub const TICK_RATE: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TimerEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// The event source went away; no further input will arrive
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TimerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports releases too; only act on presses.
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    TimerEvent::Key(key)
                }
                Ok(CtEvent::Resize(_, _)) => TimerEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Produces input events as they arrive and a `Tick` each time the ticker
/// interval elapses. Ticks follow a fixed schedule, so steady input cannot
/// postpone them.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Instant>,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Cell::new(Instant::now() + ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Blocks until the next event or the tick deadline, whichever comes first
    pub fn step(&self) -> TimerEvent {
        let now = Instant::now();
        let deadline = self.next_tick.get();
        if now >= deadline {
            self.schedule_after(deadline, now);
            return TimerEvent::Tick;
        }

        match self.event_source.recv_timeout(deadline - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.schedule_after(deadline, Instant::now());
                TimerEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => TimerEvent::Closed,
        }
    }

    // Missed deadlines collapse into a single tick instead of a burst.
    fn schedule_after(&self, deadline: Instant, now: Instant) {
        let interval = self.ticker.interval();
        let mut next = deadline + interval;
        if next <= now {
            next = now + interval;
        }
        self.next_tick.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            TimerEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(TimerEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            TimerEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn ticks_keep_arriving_under_steady_input() {
        let (tx, rx) = mpsc::channel();
        let feeder = std::thread::spawn(move || {
            for _ in 0..12 {
                if tx.send(TimerEvent::Resize).is_err() {
                    break;
                }
                std::thread::sleep(Duration::from_millis(300));
            }
        });
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_secs(1)),
        );

        let started = Instant::now();
        let mut ticks = 0;
        let mut events = 0;
        while started.elapsed() < Duration::from_millis(3500) {
            match runner.step() {
                TimerEvent::Tick => ticks += 1,
                TimerEvent::Closed => break,
                _ => events += 1,
            }
        }
        feeder.join().unwrap();

        assert!(events >= 10, "expected steady input, got {events} events");
        assert!(ticks >= 3, "expected ~3 ticks in 3.5s, got {ticks}");
    }

    #[test]
    fn step_reports_closed_when_source_disconnects() {
        let (tx, rx) = mpsc::channel::<TimerEvent>();
        drop(tx);
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_secs(1)),
        );

        let started = Instant::now();
        match runner.step() {
            TimerEvent::Closed => {}
            other => panic!("expected Closed, got {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn late_step_collapses_missed_ticks() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(200)),
        );
        std::thread::sleep(Duration::from_millis(700));

        assert!(matches!(runner.step(), TimerEvent::Tick));
        // the next deadline lies a full interval ahead, not in the past
        assert!(runner.next_tick.get() > Instant::now());
    }

    #[test]
    fn default_ticker_is_one_second() {
        assert_eq!(FixedTicker::default().interval(), Duration::from_secs(1));
    }
}
