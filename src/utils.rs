use std::time::{Duration, Instant};
use tracing::info;

// below this many diagonals the elimination is too short to report on
const PROGRESSION_MIN_ROWS: usize = 500;
const PROGRESSION_STEPS: usize = 10;

// show the progression of a long elimination, roughly every tenth of the diagonals
#[inline(always)]
pub fn show_progression(diagonal: usize, total: usize, now: Instant) {
    if total < PROGRESSION_MIN_ROWS || diagonal == 0 || diagonal % (total / PROGRESSION_STEPS) != 0 {
        return;
    }

    let percent = (diagonal * 100) / total;
    let elapsed = now.elapsed().as_secs_f64();
    let total_estimation = elapsed * total as f64 / diagonal as f64;
    let remaining = total_estimation - elapsed;

    info!(
        "Progression {}% - {:.1}s / ~{:.1}s - ~{:.1}s left - {} / {}",
        percent, elapsed, total_estimation, remaining, diagonal, total
    );
}

// run `f` and measure how long it took
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
