use rand::Rng;

/// Source for the days-until-stall estimate of an elevated-risk deal whose
/// velocity trend does not by itself predict when it will stall.
///
/// Implementations must return a value inside `[min, max]`.
pub trait StallHorizon: Send + Sync {
    fn sample_days(&self, min: u32, max: u32) -> u32;
}

/// Uniform draw over the inclusive range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHorizon;

impl StallHorizon for RandomHorizon {
    fn sample_days(&self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Always answers the same number of days, clamped into the requested range.
#[derive(Debug, Clone, Copy)]
pub struct FixedHorizon(pub u32);

impl StallHorizon for FixedHorizon {
    fn sample_days(&self, min: u32, max: u32) -> u32 {
        self.0.clamp(min, max.max(min))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_horizon_stays_in_bounds() {
        let horizon = RandomHorizon;
        for _ in 0..200 {
            let days = horizon.sample_days(3, 6);
            assert!((3..=6).contains(&days));
        }
    }

    #[test]
    fn test_random_horizon_degenerate_range() {
        assert_eq!(RandomHorizon.sample_days(4, 4), 4);
        assert_eq!(RandomHorizon.sample_days(5, 2), 5);
    }

    #[test]
    fn test_fixed_horizon_clamps() {
        assert_eq!(FixedHorizon(4).sample_days(3, 6), 4);
        assert_eq!(FixedHorizon(0).sample_days(3, 6), 3);
        assert_eq!(FixedHorizon(10).sample_days(3, 6), 6);
    }
}
