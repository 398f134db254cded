use crate::config::Config;

/// Number of slices a solver may reasonably take, used to normalize
/// remaining-time estimates.
pub(super) fn horizon(config: &Config) -> f64 {
    if config.max_time_seconds > 0 && config.scheduler_time > 0 {
        (config.max_time_seconds * 1000 / config.scheduler_time).max(1) as f64
    } else {
        1000.0
    }
}

/// Fits a line through the best distances observed after each slice and
/// returns how many more slices it takes to reach distance zero, capped at
/// `horizon`. A flat or rising line never gets there.
pub(super) fn remaining_slices(history: &[u32], horizon: f64) -> f64 {
    let n = history.len();
    if n < 2 {
        return horizon;
    }
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = history.iter().map(|&y| y as f64).sum::<f64>() / n as f64;
    let (mut covariance, mut variance) = (0.0, 0.0);
    for (x, &y) in history.iter().enumerate() {
        let dx = x as f64 - mean_x;
        covariance += dx * (y as f64 - mean_y);
        variance += dx * dx;
    }
    let slope = covariance / variance;
    if slope >= 0.0 {
        return horizon;
    }
    let intercept = mean_y - slope * mean_x;
    let zero_at = (-intercept / slope).min(horizon);
    (zero_at - (n - 1) as f64).clamp(0.0, horizon)
}

/// Maps remaining slices into [0, 1], larger meaning closer to a solution.
pub(super) fn reward(history: &[u32], horizon: f64) -> f64 {
    (1.0 - remaining_slices(history, horizon) / horizon).clamp(0.0, 1.0)
}
