//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

/// Map a value from one range into another, saturating at the ends of the
/// target range when the value lies outside the source range.
///
/// The source range may be given in either order.
pub fn lin_map_sat<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    let (lo, hi) = if source_range.0 <= source_range.1 {
        (source_range.0, source_range.1)
    } else {
        (source_range.1, source_range.0)
    };

    lin_map(source_range, target_range, clamp(&value, &lo, &hi))
}

/// Clamp `value` into `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0.0, 90.0), (-2764.0, -4000.0), 45.0), -3382.0);
        assert_eq!(lin_map((0.0, 10.0), (0.0, 1.0), 20.0), 2.0);
    }

    #[test]
    fn test_lin_map_sat() {
        assert_eq!(lin_map_sat((0.0, 90.0), (-2764.0, -4000.0), -10.0), -2764.0);
        assert_eq!(lin_map_sat((0.0, 90.0), (-2764.0, -4000.0), 120.0), -4000.0);
        assert_eq!(lin_map_sat((90.0, 0.0), (-4000.0, -2764.0), 45.0), -3382.0);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&1.5f64, &-1.0, &1.0), 1.0);
        assert_eq!(clamp(&-1.5f64, &-1.0, &1.0), -1.0);
        assert_eq!(clamp(&0.25f64, &-1.0, &1.0), 0.25);
    }
}
