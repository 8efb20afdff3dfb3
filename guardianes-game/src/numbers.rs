//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// `round(part / whole * 100)` clamped into `0..=100`.
///
/// A zero `whole` yields 0 rather than dividing by zero.
#[must_use]
pub fn ratio_pct(part: u32, whole: u32) -> u8 {
    if whole == 0 {
        return 0;
    }
    let pct = f64::from(part) / f64::from(whole) * 100.0;
    clamp_i32_to_pct(round_f64_to_i32(pct))
}

/// Rounded mean of two values, clamped into `0..=100`.
#[must_use]
pub fn mean_pct(a: u32, b: u32) -> u8 {
    let mean = (f64::from(a) + f64::from(b)) / 2.0;
    clamp_i32_to_pct(round_f64_to_i32(mean))
}

/// Clamp a signed value into `0..=100` and narrow it.
#[must_use]
pub fn clamp_i32_to_pct(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
    }

    #[test]
    fn ratio_rounds_half_away_from_zero() {
        assert_eq!(ratio_pct(1, 3), 33);
        assert_eq!(ratio_pct(2, 3), 67);
        assert_eq!(ratio_pct(3, 5), 60);
        assert_eq!(ratio_pct(5, 0), 0);
        assert_eq!(ratio_pct(13, 12), 100);
    }

    #[test]
    fn mean_and_clamp() {
        assert_eq!(mean_pct(95, 40), 68);
        assert_eq!(mean_pct(100, 100), 100);
        assert_eq!(clamp_i32_to_pct(-4), 0);
        assert_eq!(clamp_i32_to_pct(140), 100);
    }
}
