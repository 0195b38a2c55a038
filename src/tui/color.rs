//! Threshold colors for histogram segments.

/// Fill level of one bar segment relative to the queue limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorTier {
    /// Lower third of the limit.
    Low,
    /// Middle third.
    Mid,
    /// Upper third, up to and including the limit.
    High,
    /// Above the limit.
    Overflow,
}

/// Maps a segment row (0 = bottom) to its tier for the given limit.
///
/// Low is strictly below a third of the limit; the other thresholds use
/// integer division. For `limit = 30`: rows 0..=9 are Low, 10..=20 Mid,
/// 21..=30 High and anything above Overflow.
pub fn color_tier(row: u64, limit: u64) -> ColorTier {
    if row.saturating_mul(3) < limit {
        ColorTier::Low
    } else if row <= limit.saturating_mul(2) / 3 {
        ColorTier::Mid
    } else if row <= limit {
        ColorTier::High
    } else {
        ColorTier::Overflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_for_limit_30() {
        assert_eq!(color_tier(9, 30), ColorTier::Low);
        assert_eq!(color_tier(10, 30), ColorTier::Mid);
        assert_eq!(color_tier(20, 30), ColorTier::Mid);
        assert_eq!(color_tier(21, 30), ColorTier::High);
        assert_eq!(color_tier(30, 30), ColorTier::High);
        assert_eq!(color_tier(31, 30), ColorTier::Overflow);
    }

    #[test]
    fn test_small_limits() {
        assert_eq!(color_tier(0, 0), ColorTier::Mid);
        assert_eq!(color_tier(1, 0), ColorTier::Overflow);
        assert_eq!(color_tier(0, 1), ColorTier::Low);
        assert_eq!(color_tier(0, 2), ColorTier::Low);
        assert_eq!(color_tier(0, 3), ColorTier::Low);
        assert_eq!(color_tier(1, 3), ColorTier::Mid);
        assert_eq!(color_tier(3, 3), ColorTier::High);
    }

    #[test]
    fn test_low_boundary_off_multiples_of_three() {
        // Row 10 is still Low once the limit is past 30.
        assert_eq!(color_tier(10, 31), ColorTier::Low);
        assert_eq!(color_tier(11, 34), ColorTier::Low);
        assert_eq!(color_tier(12, 34), ColorTier::Mid);
        assert_eq!(color_tier(11, 33), ColorTier::Mid);
    }

    #[test]
    fn test_tiers_are_monotonic() {
        for limit in 0..64 {
            let mut last = ColorTier::Low;
            for row in 0..80 {
                let tier = color_tier(row, limit);
                assert!(rank(tier) >= rank(last), "limit={limit} row={row}");
                last = tier;
            }
        }
    }

    fn rank(tier: ColorTier) -> u8 {
        match tier {
            ColorTier::Low => 0,
            ColorTier::Mid => 1,
            ColorTier::High => 2,
            ColorTier::Overflow => 3,
        }
    }
}
