use crate::config::Config;
use crate::romaji;
use crate::scoring;
use crate::word_queue::{SelectionPolicy, WordQueue};
use crate::words;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Playing,
    Result,
}

/// Device-independent keystroke fed into the controller. The caller filters
/// out modifiers and composition events before they reach here.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
}

/// Notifications for the rendering/audio collaborators. The controller never
/// draws anything itself.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    WordChanged { display: String, target: String },
    Keystroke { outcome: Outcome, char: char },
    WordCompleted,
    Ended(RunResult),
}

/// Immutable summary of one finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResult {
    pub correct_keystrokes: usize,
    pub total_keystrokes: usize,
    pub successful_words: usize,
    pub accuracy: f64,
    pub cpm: u32,
    pub wpm: u32,
    pub duration_secs: u64,
    pub mistakes: HashMap<char, u32>,
}

/// All mutable per-run state, owned by one SessionController and mutated
/// only through its operations.
#[derive(Debug)]
pub struct SessionState {
    pub status: Status,
    pub started_at: Option<Instant>,
    pub duration: Duration,
    pub display_word: String,
    pub typing_target: String,
    pub typed: String,
    pub correct_keystrokes: usize,
    pub total_keystrokes: usize,
    pub successful_words: usize,
    pub combo: usize,
    pub mistakes: HashMap<char, u32>,
    prev_remaining: Duration,
}

impl SessionState {
    fn fresh(duration: Duration) -> Self {
        Self {
            status: Status::Idle,
            started_at: None,
            duration,
            display_word: String::new(),
            typing_target: String::new(),
            typed: String::new(),
            correct_keystrokes: 0,
            total_keystrokes: 0,
            successful_words: 0,
            combo: 0,
            mistakes: HashMap::new(),
            prev_remaining: duration,
        }
    }
}

/// The timed-run state machine: owns elapsed-time tracking, delegates word
/// production to WordQueue and target production to the romaji tables, and
/// turns keystrokes into counters and events.
#[derive(Debug)]
pub struct SessionController {
    config: Config,
    queue: WordQueue,
    state: SessionState,
    events: Vec<SessionEvent>,
    result: Option<RunResult>,
}

impl SessionController {
    /// An empty pool is replaced with the built-in fallback words so a
    /// session can always be started.
    pub fn new(config: Config, pool: Vec<String>) -> Self {
        let pool = if pool.is_empty() {
            words::fallback_pool()
        } else {
            pool
        };
        let policy = if config.randomize {
            SelectionPolicy::Random {
                no_repeat: config.no_repeat_in_session,
            }
        } else {
            SelectionPolicy::Sequential
        };
        let duration = Duration::from_secs(config.duration_secs);
        Self {
            config,
            queue: WordQueue::new(pool, policy),
            state: SessionState::fresh(duration),
            events: Vec::new(),
            result: None,
        }
    }

    pub fn status(&self) -> Status {
        self.state.status
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn result(&self) -> Option<&RunResult> {
        self.result.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begin a run: zero every counter, forget served words, fetch the first
    /// word. Valid from Idle and from Result (retry); a retry gets a fully
    /// fresh SessionState rather than a reused one.
    pub fn start(&mut self, now: Instant) {
        let duration = Duration::from_secs(self.config.duration_secs);
        self.state = SessionState::fresh(duration);
        self.queue.reset();
        self.result = None;
        self.state.status = Status::Playing;
        self.state.started_at = Some(now);
        self.advance_word();
    }

    /// Leave the result screen for the start screen.
    pub fn to_idle(&mut self) {
        if self.state.status == Status::Result {
            self.state.status = Status::Idle;
        }
    }

    /// Recompute remaining time from elapsed time. The reported value never
    /// increases, even when ticks arrive late or out of order; at zero the
    /// run is finalized.
    pub fn tick(&mut self, now: Instant) -> Duration {
        if self.state.status != Status::Playing {
            return Duration::ZERO;
        }
        let elapsed = self.elapsed(now);
        let remaining = self
            .state
            .duration
            .saturating_sub(elapsed)
            .min(self.state.prev_remaining);
        self.state.prev_remaining = remaining;
        if remaining.is_zero() {
            self.finish(elapsed);
        }
        remaining
    }

    /// Remaining time as last reported by `tick`.
    pub fn remaining(&self) -> Duration {
        self.state.prev_remaining
    }

    /// Force an immediate end of the run regardless of remaining time.
    pub fn quit(&mut self, now: Instant) {
        if self.state.status != Status::Playing {
            return;
        }
        let elapsed = self.elapsed(now);
        self.finish(elapsed);
    }

    /// Consume one keystroke. Ignored outside the playing state.
    pub fn key(&mut self, key: Key) {
        if self.state.status != Status::Playing {
            return;
        }
        match key {
            Key::Backspace => {
                self.state.typed.pop();
            }
            Key::Char(c) => self.write(c),
        }
    }

    fn write(&mut self, c: char) {
        let idx = self.state.typed.chars().count();
        let expected = self.state.typing_target.chars().nth(idx);
        self.state.total_keystrokes += 1;

        match expected {
            Some(exp) if self.normalize(c) == self.normalize(exp) => {
                self.state.correct_keystrokes += 1;
                // keep the target's original casing, not the typed one
                self.state.typed.push(exp);
                self.events.push(SessionEvent::Keystroke {
                    outcome: Outcome::Correct,
                    char: c,
                });
                if self.state.typed.chars().count() == self.state.typing_target.chars().count() {
                    self.state.successful_words += 1;
                    self.state.combo += 1;
                    self.events.push(SessionEvent::WordCompleted);
                    self.advance_word();
                }
            }
            _ => {
                self.state.combo = 0;
                *self.state.mistakes.entry(c).or_insert(0) += 1;
                self.events.push(SessionEvent::Keystroke {
                    outcome: Outcome::Incorrect,
                    char: c,
                });
            }
        }
    }

    fn normalize(&self, c: char) -> char {
        if self.config.case_sensitive {
            c
        } else {
            c.to_lowercase().next().unwrap_or(c)
        }
    }

    fn advance_word(&mut self) {
        let display = self.queue.next_word();
        let mut target = romaji::to_typing_target(&display, self.config.romaji_input);
        if target.is_empty() {
            // a lone chōon romanizes to nothing; fall back to the source so
            // the word stays winnable
            target = display.clone();
        }
        self.state.display_word = display;
        self.state.typing_target = target;
        self.state.typed.clear();
        self.events.push(SessionEvent::WordChanged {
            display: self.state.display_word.clone(),
            target: self.state.typing_target.clone(),
        });
    }

    fn elapsed(&self, now: Instant) -> Duration {
        self.state
            .started_at
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or_default()
    }

    fn finish(&mut self, elapsed: Duration) {
        let duration_ms = self.state.duration.as_millis() as u64;
        let elapsed_ms = (elapsed.as_millis() as u64).min(duration_ms);
        let result = RunResult {
            correct_keystrokes: self.state.correct_keystrokes,
            total_keystrokes: self.state.total_keystrokes,
            successful_words: self.state.successful_words,
            accuracy: scoring::accuracy(
                self.state.correct_keystrokes,
                self.state.total_keystrokes,
            ),
            cpm: scoring::cpm(self.state.correct_keystrokes, elapsed_ms, duration_ms),
            wpm: scoring::wpm(self.state.correct_keystrokes, elapsed_ms, duration_ms),
            duration_secs: self.state.duration.as_secs(),
            mistakes: self.state.mistakes.clone(),
        };
        self.state.status = Status::Result;
        self.events.push(SessionEvent::Ended(result.clone()));
        self.result = Some(result);
    }
}
