use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use kanatap::config::Config;
use kanatap::runtime::{AppEvent, Runner, TestEventSource};
use kanatap::session::{Key, SessionController, Status};

fn sequential_config() -> Config {
    Config {
        randomize: false,
        romaji_input: false,
        ..Config::default()
    }
}

// Headless integration using the runtime + SessionController without a TTY:
// a scripted keystroke stream typed through the Runner completes a word.
#[test]
fn headless_typing_flow_completes_a_word() {
    let config = sequential_config();
    let mut ctl = SessionController::new(config, vec!["hi".to_string(), "yo".to_string()]);
    ctl.start(Instant::now());

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(5));

    for c in ['h', 'i'] {
        tx.send(AppEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }

    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Tick => {
                ctl.tick(Instant::now());
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    ctl.key(Key::Char(c));
                }
            }
        }
        if ctl.state().successful_words > 0 {
            break;
        }
    }

    assert_eq!(ctl.state().successful_words, 1);
    assert_eq!(ctl.state().typing_target, "yo");
    assert_eq!(ctl.status(), Status::Playing);
}

#[test]
fn headless_timed_session_finishes_by_timeout() {
    let config = Config {
        duration_secs: 1,
        ..sequential_config()
    };
    let mut ctl = SessionController::new(config, vec!["hello".to_string()]);
    let t0 = Instant::now();
    ctl.start(t0);

    let (_tx, rx) = mpsc::channel::<AppEvent>();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(10));

    // drive ticks with synthetic timestamps well past the deadline
    let mut now = t0;
    for _ in 0..50u32 {
        if let AppEvent::Tick = runner.step() {
            now += Duration::from_millis(100);
            ctl.tick(now);
        }
        if ctl.status() == Status::Result {
            break;
        }
    }

    assert_eq!(ctl.status(), Status::Result);
    let run = ctl.result().expect("timed-out run must produce a result");
    assert_eq!(run.duration_secs, 1);
}

#[test]
fn headless_runner_yields_tick_when_idle() {
    let (_tx, rx) = mpsc::channel::<AppEvent>();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(1));

    assert!(matches!(runner.step(), AppEvent::Tick));
}
