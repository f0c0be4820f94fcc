use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use std::time::Duration;
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use kanatap::celebration::Celebration;
use kanatap::leaderboard::LeaderboardEntry;
use kanatap::session::RunResult;

use crate::{App, Screen};

const HORIZONTAL_MARGIN: u16 = 5;
const TIMER_WARN: Duration = Duration::from_secs(5);
const TIMER_CRIT: Duration = Duration::from_secs(2);

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

fn fmt_pct(v: f64) -> String {
    format!("{:.1}%", v * 100.0)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Start => render_start(self, area, buf),
            Screen::Play => render_play(self, area, buf),
            Screen::Result => render_result(self, area, buf),
        }

        if self.celebration.is_active {
            render_confetti(&self.celebration, area, buf);
        }
    }
}

fn render_start(app: &App, area: Rect, buf: &mut Buffer) {
    let cfg = app.controller.config();
    let order = match (cfg.randomize, cfg.no_repeat_in_session) {
        (true, true) => "random, no repeats",
        (true, false) => "random",
        (false, _) => "sequential",
    };

    let mut lines = vec![
        Line::from(Span::styled("kanatap", bold().fg(Color::Magenta))),
        Line::default(),
        Line::from(Span::styled(
            format!("{}s on the clock", cfg.duration_secs),
            bold(),
        )),
        Line::from(format!("word list: {}", cfg.word_list)),
        Line::from(format!(
            "romaji input: {}",
            if cfg.romaji_input { "on" } else { "off" }
        )),
        Line::from(format!("word order: {order}")),
        Line::from(format!(
            "case sensitive: {}",
            if cfg.case_sensitive { "yes" } else { "no" }
        )),
        Line::default(),
    ];
    if app.high_score > 0 {
        lines.push(Line::from(Span::styled(
            format!("best score for {}s: {}", cfg.duration_secs, app.high_score),
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled(
        "(enter) start / (esc) quit",
        italic(),
    )));

    render_centered(lines, area, buf);
}

fn render_play(app: &App, area: Rect, buf: &mut Buffer) {
    let state = app.controller.state();
    let show_kana = state.display_word != state.typing_target;

    let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let target_rows = state.typing_target.width() as u16 / inner_width + 1;
    let word_lines: u16 = target_rows + u16::from(show_kana);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(word_lines),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(area);

    render_timer(app, chunks[1], buf);

    let mut lines = Vec::new();
    if show_kana {
        lines.push(Line::from(Span::styled(
            state.display_word.clone(),
            bold().fg(Color::Yellow),
        )));
    }
    lines.push(target_line(app));
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let stats = Paragraph::new(Span::styled(
        format!(
            "correct {}   total {}   acc {}   words {}   combo {}",
            state.correct_keystrokes,
            state.total_keystrokes,
            fmt_pct(kanatap::scoring::accuracy(
                state.correct_keystrokes,
                state.total_keystrokes
            )),
            state.successful_words,
            state.combo,
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[4], buf);
}

/// Typing target with the matched prefix, the expected character, and the
/// pending tail styled apart; the whole line flips red while an error
/// flash is active.
fn target_line(app: &App) -> Line<'static> {
    let state = app.controller.state();
    let target: Vec<char> = state.typing_target.chars().collect();
    let typed_len = state.typed.chars().count();

    if app.flash_frames > 0 {
        return Line::from(Span::styled(
            state.typing_target.clone(),
            bold().fg(Color::Red),
        ));
    }

    let mut spans = Vec::new();
    if typed_len > 0 {
        spans.push(Span::styled(
            target[..typed_len].iter().collect::<String>(),
            bold().fg(Color::Green),
        ));
    }
    if typed_len < target.len() {
        spans.push(Span::styled(
            target[typed_len].to_string(),
            dim_bold().add_modifier(Modifier::UNDERLINED),
        ));
        spans.push(Span::styled(
            target[typed_len + 1..].iter().collect::<String>(),
            dim_bold(),
        ));
    }
    Line::from(spans)
}

fn render_timer(app: &App, area: Rect, buf: &mut Buffer) {
    let total = Duration::from_secs(app.controller.config().duration_secs);
    let remaining = app.remaining.min(total);

    let color = if remaining <= TIMER_CRIT {
        Color::Red
    } else if remaining <= TIMER_WARN {
        Color::Yellow
    } else {
        Color::Green
    };

    let ratio = if total.is_zero() {
        0.0
    } else {
        remaining.as_secs_f64() / total.as_secs_f64()
    };
    let bar_width = (area.width as f64 * ratio).round() as usize;
    let bar: String = "█".repeat(bar_width);

    let lines = vec![
        Line::from(Span::styled(
            format!("{:.1}", remaining.as_secs_f64()),
            bold().fg(color),
        )),
        Line::from(Span::styled(bar, Style::default().fg(color))),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_result(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(run) = &app.last_run else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled("time's up!", bold().fg(Color::Magenta))),
        Line::default(),
        Line::from(Span::styled(
            format!("score {}", run.correct_keystrokes),
            bold(),
        )),
        Line::from(format!(
            "{} cpm   {} wpm   {} acc   {} words",
            run.cpm,
            run.wpm,
            fmt_pct(run.accuracy),
            run.successful_words,
        )),
        Line::from(Span::styled(
            format!("best for {}s: {}", run.duration_secs, app.high_score),
            Style::default().fg(Color::Cyan),
        )),
        Line::default(),
        mistakes_line(run),
        Line::default(),
    ];

    lines.push(Line::from(Span::styled(
        format!("top 3 — {}s", run.duration_secs),
        bold(),
    )));
    if app.top.is_empty() {
        lines.push(Line::from(Span::styled("no entries yet", dim_bold())));
    }
    for (i, entry) in app.top.iter().enumerate() {
        lines.push(leaderboard_line(i, entry, app.placed_rank == Some(i)));
    }
    lines.push(Line::default());

    if let Some(name) = &app.name_input {
        lines.push(Line::from(Span::styled(
            format!("new top 3! your name: {name}_"),
            bold().fg(Color::Yellow),
        )));
        lines.push(Line::from(Span::styled("(enter) save", italic())));
    } else {
        lines.push(Line::from(Span::styled(
            "(r)etry / (esc) back / (q)uit",
            italic(),
        )));
    }

    render_centered(lines, area, buf);
}

fn mistakes_line(run: &RunResult) -> Line<'static> {
    if run.mistakes.is_empty() {
        return Line::from(Span::styled("no mistakes!", bold().fg(Color::Green)));
    }
    let summary = run
        .mistakes
        .iter()
        .sorted_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)))
        .take(10)
        .map(|(c, n)| format!("{c}: {n}"))
        .join(" / ");
    Line::from(Span::styled(
        format!("missed keys: {summary}"),
        Style::default().fg(Color::Red),
    ))
}

fn leaderboard_line(rank: usize, entry: &LeaderboardEntry, highlight: bool) -> Line<'static> {
    let name = if entry.name.is_empty() {
        "???"
    } else {
        entry.name.as_str()
    };
    let age_secs = (chrono::Local::now() - entry.timestamp)
        .num_seconds()
        .max(0) as u64;
    let age = HumanTime::from(Duration::from_secs(age_secs))
        .to_text_en(Accuracy::Rough, Tense::Past);
    let text = format!(
        "{}. {} — {} (acc {}) — {}",
        rank + 1,
        name,
        entry.score,
        fmt_pct(entry.accuracy),
        age,
    );
    let style = if highlight {
        bold().fg(Color::Magenta)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text, style))
}

/// Vertically centered paragraph; the widest line decides nothing, the
/// terminal centers each line on its own.
fn render_centered(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(top),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

fn render_confetti(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
    ];

    for piece in &celebration.pieces {
        if piece.x < 0.0 || piece.y < 0.0 {
            continue;
        }
        let x = piece.x as u16;
        let y = piece.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }
        let color = colors[piece.color_index % colors.len()];
        let faded = piece.age / piece.max_age > 0.6;
        let style = if faded {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(color)
        };
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(piece.symbol);
            cell.set_style(style);
        }
    }
}
