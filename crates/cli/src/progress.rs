//! Single-line progress display.

use std::time::Duration;

const BAR_WIDTH: usize = 20;

/// Render the progress line for test `processed` of `total`.
///
/// The ETA extrapolates the average time per processed test over the
/// remaining ones. The caller decides how the line is shown (carriage
/// return on a terminal, plain line in a log).
pub fn render(processed: usize, total: usize, current_id: &str, elapsed: Duration) -> String {
    let percent = if total == 0 {
        100.0
    } else {
        processed as f64 * 100.0 / total as f64
    };
    let filled = ((BAR_WIDTH as f64 * percent / 100.0) as usize).min(BAR_WIDTH);
    let bar = format!("[{}{}]", "=".repeat(filled), ".".repeat(BAR_WIDTH - filled));

    let remaining = if processed == 0 {
        Duration::ZERO
    } else {
        let per_test = elapsed.as_secs_f64() / processed as f64;
        Duration::from_secs_f64(per_test * total.saturating_sub(processed) as f64)
    };

    format!(
        "   {} {:.1}% | {}/{} | {} | ETA: {}",
        bar,
        percent,
        processed,
        total,
        current_id,
        format_eta(remaining)
    )
}

/// `Xm Ys` from one minute up, `Ys` below.
pub fn format_eta(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
