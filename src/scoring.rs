/// Keystroke accuracy in [0, 1]. An untouched session counts as perfect.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (correct as f64 / total as f64).clamp(0.0, 1.0)
}

/// Correct characters per minute. A zero elapsed time falls back to the
/// configured session duration instead of dividing by zero.
pub fn cpm(correct: usize, elapsed_ms: u64, duration_ms: u64) -> u32 {
    per_minute(correct as f64, elapsed_ms, duration_ms)
}

/// Words per minute, with one word normalized to 5 characters.
pub fn wpm(correct: usize, elapsed_ms: u64, duration_ms: u64) -> u32 {
    per_minute(correct as f64 / 5.0, elapsed_ms, duration_ms)
}

fn per_minute(count: f64, elapsed_ms: u64, duration_ms: u64) -> u32 {
    let denominator_ms = if elapsed_ms == 0 {
        duration_ms
    } else {
        elapsed_ms
    };
    if denominator_ms == 0 {
        return 0;
    }
    let minutes = denominator_ms as f64 / 60_000.0;
    (count / minutes).round() as u32
}
