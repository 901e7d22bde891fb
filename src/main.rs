mod ui;

use chrono::{Local, NaiveDateTime};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use pomotimer::{
    alert::{Alert, Alerter, DesktopAlerter},
    config::{parse_timeout_minutes, Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TimerEvent},
    timer::TimerApp,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin, Stdout, Write},
    path::PathBuf,
};
use tracing::{info, warn};

/// terminal pomodoro timer with a daily session clock
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A pomodoro timer for the terminal: start, pause and stop work sessions, get alerted once a session runs past its timeout, and see today's sessions on a clock-face chart."
)]
pub struct Cli {
    /// minutes a session may run before the timeout alert (overrides the config file)
    #[clap(short = 't', long, value_parser = parse_minutes_arg)]
    timeout: Option<u32>,

    /// sound file to play on timeout, empty to disable (overrides the config file)
    #[clap(short = 's', long)]
    sound: Option<String>,

    /// config file to load and save settings to
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,
}

fn parse_minutes_arg(s: &str) -> Result<u32, String> {
    parse_timeout_minutes(s).map_err(|err| err.to_string())
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Loaded config with command-line overrides applied
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(minutes) = self.timeout {
            config.timeout_minutes = minutes;
        }
        if let Some(sound) = &self.sound {
            config.sound_file = sound.clone();
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Timer,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsField {
    Timeout,
    Sound,
}

#[derive(Debug, Clone)]
pub struct SettingsState {
    pub field: SettingsField,
    pub timeout_input: String,
    pub sound_input: String,
    pub error: Option<String>,
}

impl SettingsState {
    fn from_config(config: &Config) -> Self {
        Self {
            field: SettingsField::Timeout,
            timeout_input: config.timeout_minutes.to_string(),
            sound_input: config.sound_file.clone(),
            error: None,
        }
    }

    fn input_mut(&mut self) -> &mut String {
        match self.field {
            SettingsField::Timeout => &mut self.timeout_input,
            SettingsField::Sound => &mut self.sound_input,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            SettingsField::Timeout => SettingsField::Sound,
            SettingsField::Sound => SettingsField::Timeout,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub timer: TimerApp,
    pub config: Config,
    pub state: AppState,
    pub settings: SettingsState,
    /// Set when a timeout fires, cleared by the next key press
    pub alerting: bool,
    pub notice: Option<String>,
    store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(config: Config, store: Box<dyn ConfigStore>, now: NaiveDateTime) -> Self {
        Self {
            timer: TimerApp::from_config(&config, now),
            settings: SettingsState::from_config(&config),
            config,
            state: AppState::Timer,
            alerting: false,
            notice: None,
            store,
        }
    }

    /// Returns true when this tick raised the timeout alert
    pub fn on_tick(&mut self, now: NaiveDateTime, alerter: &dyn Alerter) -> bool {
        if !self.timer.tick(now) {
            return false;
        }
        self.alerting = true;
        alerter.alert(&Alert::new(self.timer.display_text(now), &self.config));
        true
    }

    fn handle_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }
        self.alerting = false;

        match self.state {
            AppState::Timer => self.handle_timer_key(key, now),
            AppState::Settings => {
                self.handle_settings_key(key);
                Flow::Continue
            }
        }
    }

    fn handle_timer_key(&mut self, key: KeyEvent, now: NaiveDateTime) -> Flow {
        self.notice = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('s') => {
                self.timer.start(now);
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => {
                self.timer.toggle_pause(now);
            }
            KeyCode::Char('x') => {
                self.timer.stop(now);
            }
            KeyCode::Char('c') => {
                self.settings = SettingsState::from_config(&self.config);
                self.state = AppState::Settings;
            }
            _ => {}
        }
        Flow::Continue
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state = AppState::Timer,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.settings.next_field()
            }
            KeyCode::Backspace => {
                self.settings.input_mut().pop();
            }
            KeyCode::Enter => self.submit_settings(),
            KeyCode::Char(c) => self.settings.input_mut().push(c),
            _ => {}
        }
    }

    fn submit_settings(&mut self) {
        let mut next = self.config.clone();
        if let Err(err) = next.set_timeout_minutes(&self.settings.timeout_input) {
            self.settings.error = Some(err.to_string());
            return;
        }
        next.sound_file = self.settings.sound_input.trim().to_string();

        self.timer.set_timeout_seconds(next.timeout_seconds());
        self.config = next;
        self.state = AppState::Timer;
        info!(
            timeout_minutes = self.config.timeout_minutes,
            "settings updated"
        );

        if let Err(err) = self.store.save(&self.config) {
            warn!(%err, "failed to save config");
            self.notice = Some(format!("settings applied but not saved: {err}"));
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init();

    let store = cli.config_store();
    let config = cli.apply_overrides(store.load());
    info!(
        timeout_minutes = config.timeout_minutes,
        sound = config.sound_path().is_some(),
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, Box::new(store), now());
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let alerter = DesktopAlerter;
    let mut title = String::new();

    loop {
        let at = now();
        terminal.draw(|f| ui::draw(app, f, at))?;

        let status = app.timer.status_line(at);
        if status != title {
            execute!(terminal.backend_mut(), SetTitle(&status))?;
            title = status;
        }

        match runner.step() {
            TimerEvent::Tick => {
                if app.on_tick(now(), &alerter) {
                    // terminal bell
                    let backend = terminal.backend_mut();
                    backend.write_all(b"\x07")?;
                    backend.flush()?;
                }
            }
            TimerEvent::Resize => {}
            TimerEvent::Closed => {
                warn!("terminal event source closed");
                break;
            }
            TimerEvent::Key(key) => {
                if app.handle_key(key, now()) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}
