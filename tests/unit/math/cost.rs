//! Tests for route cost arithmetic and spread statistics

#[cfg(test)]
mod tests {
    use unlockgen::math::cost::{is_balanced, mean_cost, tile_cost, variance_percent};

    // Tests the doubling cost per level
    // Verified by using 2^level instead of 2^(level-1)
    #[test]
    fn test_tile_cost_doubles_per_level() {
        assert_eq!(tile_cost(0), 0);
        assert_eq!(tile_cost(1), 1);
        assert_eq!(tile_cost(2), 2);
        assert_eq!(tile_cost(7), 64);
    }

    // Tests saturation for levels beyond the integer width
    // Verified by replacing checked_shl with a plain shift
    #[test]
    fn test_tile_cost_saturates() {
        assert_eq!(tile_cost(64), 1_u64 << 63);
        assert_eq!(tile_cost(65), u64::MAX);
        assert_eq!(tile_cost(u8::MAX), u64::MAX);
    }

    // Tests the mean over empty and non-empty lists
    // Verified by dividing by len + 1
    #[test]
    fn test_mean_cost() {
        assert!(mean_cost(&[]).abs() < f64::EPSILON);
        assert!((mean_cost(&[100, 10]) - 55.0).abs() < f64::EPSILON);
    }

    // Tests the spread as largest deviation relative to the mean
    // Verified by measuring deviation from the minimum instead of the mean
    #[test]
    fn test_variance_percent() {
        let spread = variance_percent(&[100, 10]);
        assert!((spread - 45.0 / 55.0 * 100.0).abs() < 1e-9);

        let even = variance_percent(&[10, 11, 12]);
        assert!((even - 100.0 / 11.0).abs() < 1e-9);

        assert!(variance_percent(&[]).abs() < f64::EPSILON);
        assert!(variance_percent(&[0, 0]).abs() < f64::EPSILON);
    }

    // Tests the 15 percent balance verdict
    // Verified by comparing against the minimum instead of the mean
    #[test]
    fn test_is_balanced() {
        assert!(is_balanced(&[10, 11, 12]));
        assert!(!is_balanced(&[100, 10]));
        assert!(!is_balanced(&[]));
        assert!(is_balanced(&[90, 110]));
        assert!(!is_balanced(&[80, 120]));
    }
}
