//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the u64 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    cast::<f64, u64>(value.min(max).floor()).unwrap_or(u64::MAX)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(f64::MAX)
}

/// Multiply an integer amount by a factor and floor the result.
#[must_use]
pub fn scale_floor(value: u64, factor: f64) -> u64 {
    floor_f64_to_u64(u64_to_f64(value) * factor)
}

/// Ratio of two counters as a percentage, 0 when the denominator is 0.
#[must_use]
pub fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    u64_to_f64(numerator) / u64_to_f64(denominator) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite_and_negative() {
        assert_eq!(floor_f64_to_u64(f64::NAN), 0);
        assert_eq!(floor_f64_to_u64(-3.2), 0);
        assert_eq!(floor_f64_to_u64(f64::MAX), u64::MAX);
        assert_eq!(floor_f64_to_u64(7.99), 7);
    }

    #[test]
    fn scale_floor_matches_integer_math() {
        assert_eq!(scale_floor(100, 1.5), 150);
        assert_eq!(scale_floor(15, 1.5), 22);
        assert_eq!(scale_floor(0, 3.0), 0);
    }

    #[test]
    fn percent_guards_zero_denominator() {
        assert!(percent(3, 0).abs() < f64::EPSILON);
        assert!((percent(1, 4) - 25.0).abs() < f64::EPSILON);
    }
}
