//! Interpolated percentiles.

/// Percentile `p` (in `[0, 1]`) of ascending `sorted` values.
///
/// Uses linear interpolation between order statistics:
/// `h = (n - 1) * p`, `x = x[⌊h⌋] + (h - ⌊h⌋) * (x[⌊h⌋ + 1] - x[⌊h⌋])`.
/// Returns `None` for an empty slice. `p` is clamped to `[0, 1]`.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let fraction = h - h.floor();
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}
