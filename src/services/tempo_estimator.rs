/// Tempo estimation from depth velocity
///
/// The hip's relative depth is the movement proxy. Each sample contributes
/// |Δdepth| / Δt to a rolling window whose mean is mapped to a pace label.

use statrs::statistics::Statistics;
use std::collections::VecDeque;

use crate::models::Tempo;

/// Mean velocity above which the movement is too fast
pub const FAST_VELOCITY: f64 = 0.015;
/// Mean velocity below which the movement is too slow
pub const SLOW_VELOCITY: f64 = 0.003;

#[derive(Debug, Clone)]
pub struct TempoEstimator {
    window: usize,
    history: VecDeque<f64>,
    last_sample: Option<(f64, u64)>,
    tempo: Tempo,
}

impl TempoEstimator {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
            last_sample: None,
            tempo: Tempo::default(),
        }
    }

    /// Record a depth sample and reclassify the pace
    pub fn update(&mut self, depth: f64, now_ms: u64) -> Tempo {
        let velocity = match self.last_sample {
            Some((last_depth, last_ms)) if now_ms > last_ms => {
                let elapsed_seconds = (now_ms - last_ms) as f64 / 1000.0;
                (depth - last_depth).abs() / elapsed_seconds
            }
            _ => 0.0,
        };
        self.last_sample = Some((depth, now_ms));

        self.history.push_back(velocity);
        while self.history.len() > self.window {
            self.history.pop_front();
        }

        self.tempo = Self::classify(self.mean_velocity());
        self.tempo
    }

    /// Map a mean velocity to a pace label.
    ///
    /// A window with no depth movement at all carries no pace signal and
    /// stays at "Good pace".
    pub fn classify(mean_velocity: f64) -> Tempo {
        if mean_velocity == 0.0 {
            Tempo::GoodPace
        } else if mean_velocity > FAST_VELOCITY {
            Tempo::SlowDown
        } else if mean_velocity < SLOW_VELOCITY {
            Tempo::SpeedUpSlightly
        } else {
            Tempo::GoodPace
        }
    }

    pub fn mean_velocity(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().mean()
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }
}
