//! Order statistics over simulated outcomes

/// Percentiles reported for every year of a projection
pub const REPORTED_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

/// Percentile of already-sorted values, interpolating linearly between
/// the closest ranks
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let w = rank - lower as f64;
        sorted[lower] * (1.0 - w) + sorted[upper] * w
    }
}

/// Sorts `values` in place and returns the requested percentile
pub fn percentile(values: &mut [f64], p: f64) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    percentile_sorted(values, p)
}

/// Sorts `values` in place and returns each of `REPORTED_PERCENTILES`
pub fn reported_percentiles(values: &mut [f64]) -> [f64; 5] {
    values.sort_by(|a, b| a.total_cmp(b));
    REPORTED_PERCENTILES.map(|p| percentile_sorted(values, p))
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
