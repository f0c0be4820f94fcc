mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

use kanatap::celebration::Celebration;
use kanatap::config::{Config, ConfigStore, FileConfigStore};
use kanatap::history::RunLog;
use kanatap::leaderboard::{FileKvStore, KvStore, LeaderboardEntry, LeaderboardStore, MemoryKvStore};
use kanatap::runtime::{AppEvent, CrosstermEventSource, Runner};
use kanatap::session::{Key, Outcome, RunResult, SessionController, SessionEvent, Status};
use kanatap::words;

const TICK_RATE_MS: u64 = 100;

/// error flash length, in ticks
const FLASH_TICKS: u8 = 2;

/// timed kana typing practice with romaji input and per-duration leaderboards
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing-practice TUI: transcribe a stream of kana words as romaji against the clock, chase your per-duration high score, and fight for a spot in the top 3."
)]
pub struct Cli {
    /// seconds on the session clock (1-600)
    #[clap(short = 's', long)]
    seconds: Option<u64>,

    /// embedded word list to practice with
    #[clap(short = 'l', long, value_enum)]
    word_list: Option<BuiltinList>,

    /// path to a custom word list (one word per line, # for comments)
    #[clap(long, conflicts_with = "word_list")]
    word_file: Option<String>,

    /// match keystrokes case-sensitively
    #[clap(long)]
    case_sensitive: bool,

    /// type the kana directly instead of their romaji transliteration
    #[clap(long)]
    no_romaji: bool,

    /// cycle the word pool in order instead of drawing at random
    #[clap(long)]
    sequential: bool,

    /// avoid repeating a word until the whole pool has been served
    #[clap(long)]
    no_repeat: bool,

    /// shortest word length (in characters) to keep from the pool
    #[clap(long)]
    min_word_length: Option<usize>,

    /// longest word length (in characters) to keep from the pool
    #[clap(long)]
    max_word_length: Option<usize>,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum BuiltinList {
    Japanese,
    English,
}

impl Cli {
    /// Layer CLI overrides on top of the persisted configuration.
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(secs) = self.seconds {
            cfg.duration_secs = secs;
        }
        if let Some(list) = self.word_list {
            cfg.word_list = list.to_string().to_lowercase();
        }
        if let Some(path) = &self.word_file {
            cfg.word_list = path.clone();
        }
        if self.case_sensitive {
            cfg.case_sensitive = true;
        }
        if self.no_romaji {
            cfg.romaji_input = false;
        }
        if self.sequential {
            cfg.randomize = false;
        }
        if self.no_repeat {
            cfg.no_repeat_in_session = true;
        }
        if let Some(min) = self.min_word_length {
            cfg.min_word_length = min;
        }
        if let Some(max) = self.max_word_length {
            cfg.max_word_length = max;
        }
        cfg.normalized()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Play,
    Result,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct App {
    pub controller: SessionController,
    pub screen: Screen,
    pub remaining: Duration,
    pub last_run: Option<RunResult>,
    pub top: Vec<LeaderboardEntry>,
    pub high_score: usize,
    pub placed_rank: Option<usize>,
    pub name_input: Option<String>,
    pub celebration: Celebration,
    pub flash_frames: u8,
    scores: LeaderboardStore<Box<dyn KvStore>>,
    run_log: Option<RunLog>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let pool = words::resolve_pool(
            &config.word_list,
            config.min_word_length,
            config.max_word_length,
        );
        let scores: LeaderboardStore<Box<dyn KvStore>> =
            LeaderboardStore::new(Box::new(FileKvStore::new()));
        let duration_secs = config.duration_secs;
        let high_score = scores.high_score(duration_secs);
        let top = scores.top(duration_secs);
        Self {
            controller: SessionController::new(config, pool),
            screen: Screen::Start,
            remaining: Duration::from_secs(duration_secs),
            last_run: None,
            top,
            high_score,
            placed_rank: None,
            name_input: None,
            celebration: Celebration::new(),
            flash_frames: 0,
            scores,
            run_log: Some(RunLog::new()),
        }
    }

    /// In-memory variant so UI tests touch no real files.
    #[doc(hidden)]
    pub fn new_for_test(pool_words: &[&str]) -> Self {
        let config = Config {
            randomize: false,
            ..Config::default()
        };
        let pool = pool_words.iter().map(|w| w.to_string()).collect();
        Self {
            controller: SessionController::new(config, pool),
            screen: Screen::Start,
            remaining: Duration::from_secs(15),
            last_run: None,
            top: Vec::new(),
            high_score: 0,
            placed_rank: None,
            name_input: None,
            celebration: Celebration::new(),
            flash_frames: 0,
            scores: LeaderboardStore::new(Box::new(MemoryKvStore::default())),
            run_log: None,
        }
    }

    pub fn start_session(&mut self, now: Instant) {
        self.controller.start(now);
        self.remaining = Duration::from_secs(self.controller.config().duration_secs);
        self.last_run = None;
        self.placed_rank = None;
        self.name_input = None;
        self.flash_frames = 0;
        self.celebration.stop();
        self.screen = Screen::Play;
    }

    fn on_tick(&mut self, width: u16, height: u16) {
        if self.controller.status() == Status::Playing {
            self.remaining = self.controller.tick(Instant::now());
        }
        self.pump_events(width, height);
        self.celebration.update(TICK_RATE_MS as f64 / 1000.0);
        self.flash_frames = self.flash_frames.saturating_sub(1);
    }

    /// React to controller notifications: error flashes and end-of-run
    /// bookkeeping.
    pub fn pump_events(&mut self, width: u16, height: u16) {
        for event in self.controller.drain_events() {
            match event {
                SessionEvent::Keystroke {
                    outcome: Outcome::Incorrect,
                    ..
                } => {
                    self.flash_frames = FLASH_TICKS;
                }
                SessionEvent::Ended(run) => self.finish_run(run, width, height),
                _ => {}
            }
        }
    }

    fn finish_run(&mut self, run: RunResult, width: u16, height: u16) {
        let duration_secs = run.duration_secs;
        self.high_score = self
            .scores
            .record_high_score(duration_secs, run.correct_keystrokes);
        let (top, rank) = self
            .scores
            .record(duration_secs, &run, chrono::Local::now());
        self.top = top;
        self.placed_rank = rank;
        self.name_input = rank.map(|_| String::new());
        if rank.is_some() {
            self.celebration.start(width, height);
        }
        if let Some(log) = &self.run_log {
            let _ = log.append(&run, chrono::Local::now());
        }
        self.last_run = Some(run);
        self.screen = Screen::Result;
    }

    fn commit_name(&mut self) {
        if let (Some(rank), Some(name)) = (self.placed_rank, self.name_input.take()) {
            let duration_secs = self.controller.config().duration_secs;
            self.scores.set_name(duration_secs, rank, &name);
            self.top = self.scores.top(duration_secs);
        }
    }

    fn on_key(&mut self, key: KeyEvent, width: u16, height: u16) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Exit;
        }

        match self.screen {
            Screen::Start => match key.code {
                KeyCode::Enter => self.start_session(Instant::now()),
                KeyCode::Esc | KeyCode::Char('q') => return Flow::Exit,
                _ => {}
            },
            Screen::Play => match key.code {
                KeyCode::Esc => {
                    self.controller.quit(Instant::now());
                    self.pump_events(width, height);
                }
                KeyCode::Backspace => self.controller.key(Key::Backspace),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.controller.key(Key::Char(c));
                    self.pump_events(width, height);
                }
                _ => {}
            },
            Screen::Result => {
                if self.name_input.is_some() {
                    match key.code {
                        KeyCode::Enter => self.commit_name(),
                        KeyCode::Backspace => {
                            if let Some(name) = self.name_input.as_mut() {
                                name.pop();
                            }
                        }
                        KeyCode::Char(c) => {
                            if let Some(name) = self.name_input.as_mut() {
                                if name.chars().count() < kanatap::leaderboard::MAX_NAME_LEN {
                                    name.push(c);
                                }
                            }
                        }
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('r') => self.start_session(Instant::now()),
                        KeyCode::Esc => {
                            self.controller.to_idle();
                            self.celebration.stop();
                            self.screen = Screen::Start;
                        }
                        KeyCode::Char('q') => return Flow::Exit,
                        _ => {}
                    }
                }
            }
        }
        Flow::Continue
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    let _ = store.save(&config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        let size = terminal.size()?;
        match runner.step() {
            AppEvent::Tick => app.on_tick(size.width, size.height),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key, size.width, size.height) == Flow::Exit {
                    break;
                }
            }
        }
    }

    Ok(())
}
