//! Cadence-based tiredness estimate
//!
//! Tiredness grows linearly with completed reps (60 at the target rep
//! count) and gains a fixed penalty when the latest inter-rep interval is
//! markedly longer than the one before it.

/// Tiredness contributed by reaching the target rep count
const TARGET_REP_TIREDNESS: f64 = 60.0;
/// Penalty applied when cadence slows down
const SLOWDOWN_PENALTY: f64 = 20.0;
/// Interval growth ratio treated as a slowdown
const SLOWDOWN_RATIO: f64 = 1.3;

#[derive(Debug, Clone)]
pub struct FatigueEstimator {
    target_reps: u32,
}

impl FatigueEstimator {
    pub fn new(target_reps: u32) -> Self {
        Self {
            target_reps: target_reps.max(1),
        }
    }

    /// Tiredness in [0, 100] from the rep count and rep completion times
    pub fn estimate(&self, rep_count: u32, rep_times: &[u64]) -> u8 {
        if rep_count == 0 {
            return 0;
        }

        let mut tiredness = rep_count as f64 / self.target_reps as f64 * TARGET_REP_TIREDNESS;

        if Self::is_slowing_down(rep_times) {
            tiredness += SLOWDOWN_PENALTY;
        }

        tiredness.clamp(0.0, 100.0).round() as u8
    }

    /// Compare the last two intervals among the latest three rep times
    pub fn is_slowing_down(rep_times: &[u64]) -> bool {
        match rep_times {
            [.., first, second, third] => {
                let earlier = second.saturating_sub(*first) as f64;
                let latest = third.saturating_sub(*second) as f64;
                latest > earlier * SLOWDOWN_RATIO
            }
            _ => false,
        }
    }
}
