//! Tick and contour-level generation.

/// Evenly spaced band boundaries between `low` and `high`.
///
/// Returns `bands + 1` levels. A non-positive range yields the single
/// value twice so callers still get one band.
pub fn band_levels(low: f32, high: f32, bands: usize) -> Vec<f32> {
    let bands = bands.max(1);
    if !(high > low) {
        return vec![low, low];
    }
    let step = (high - low) / bands as f32;
    let mut levels: Vec<f32> = (0..=bands).map(|i| low + step * i as f32).collect();
    // Pin the last level to avoid accumulated rounding.
    levels[bands] = high;
    levels
}

/// "Nice" tick positions (multiples of 1, 2 or 5 times a power of ten)
/// inside `[low, high]`, aiming for about `target` ticks.
pub fn nice_ticks(low: f64, high: f64, target: usize) -> Vec<f64> {
    if !(high > low) || target == 0 || !low.is_finite() || !high.is_finite() {
        return if low.is_finite() { vec![low] } else { vec![] };
    }

    let step = nice_step((high - low) / target as f64);
    let start = (low / step).ceil();
    let end = (high / step).floor();

    let mut ticks = Vec::new();
    let mut i = start;
    while i <= end {
        let tick = i * step;
        // Avoid printing "-0".
        ticks.push(if tick == 0.0 { 0.0 } else { tick });
        i += 1.0;
    }
    ticks
}

/// Round a raw step up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format a tick label with just enough decimals for `step`.
///
/// Very large or very small magnitudes switch to scientific notation.
pub fn format_tick(value: f64, step: f64) -> String {
    let abs = value.abs();
    if abs != 0.0 && (abs >= 1e5 || abs < 1e-3) {
        return format!("{:.1e}", value);
    }
    let decimals = if step > 0.0 && step < 1.0 {
        (-step.log10().floor()) as usize
    } else {
        0
    };
    format!("{:.*}", decimals, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_levels_basic() {
        let levels = band_levels(0.0, 10.0, 5);
        assert_eq!(levels, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_band_levels_empty_range() {
        assert_eq!(band_levels(3.0, 3.0, 8), vec![3.0, 3.0]);
    }

    #[test]
    fn test_nice_ticks_symmetric() {
        let ticks = nice_ticks(-5.0, 5.0, 5);
        assert_eq!(ticks, vec![-4.0, -2.0, 0.0, 2.0, 4.0]);
    }

    #[test]
    fn test_nice_ticks_offset_range() {
        let ticks = nice_ticks(3.0, 27.0, 5);
        assert_eq!(ticks, vec![5.0, 10.0, 15.0, 20.0, 25.0]);
    }

    #[test]
    fn test_nice_ticks_inverted_range() {
        assert_eq!(nice_ticks(10.0, 0.0, 5), vec![10.0]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(2.0, 2.0), "2");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
        assert_eq!(format_tick(-0.5, 0.5), "-0.5");
        assert_eq!(format_tick(250000.0, 50000.0), "2.5e5");
    }
}
