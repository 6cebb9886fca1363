/// Rep counting hysteresis
///
/// Two phases, Top and Bottom. The metric angle dropping under the entry
/// threshold moves the counter to Bottom; the exercise-specific exit
/// condition moves it back to Top and counts one rep, subject to an
/// absolute cooldown between counted reps.

use crate::models::ExerciseKind;

/// Transition rule for one exercise kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepRule {
    /// Exit requires returning to the calibrated standing posture
    ReturnToBaseline {
        enter_below: f64,
        similarity_above: f64,
    },
    /// Exit once the metric angle climbs past a second threshold
    AngleRange { enter_below: f64, exit_above: f64 },
    /// No movement model; never counts
    Disabled,
}

impl RepRule {
    pub fn for_kind(kind: ExerciseKind) -> Self {
        match kind {
            ExerciseKind::Squat => Self::ReturnToBaseline {
                enter_below: 105.0,
                similarity_above: 85.0,
            },
            ExerciseKind::ShoulderRaise => Self::AngleRange {
                enter_below: 90.0,
                exit_above: 140.0,
            },
            ExerciseKind::Unknown => Self::Disabled,
        }
    }

    fn enters_bottom(&self, metric_angle: f64) -> bool {
        match *self {
            Self::ReturnToBaseline { enter_below, .. } | Self::AngleRange { enter_below, .. } => {
                metric_angle < enter_below
            }
            Self::Disabled => false,
        }
    }

    fn exits_bottom(&self, metric_angle: f64, baseline_similarity: f64) -> bool {
        match *self {
            Self::ReturnToBaseline {
                similarity_above, ..
            } => baseline_similarity > similarity_above,
            Self::AngleRange { exit_above, .. } => metric_angle > exit_above,
            Self::Disabled => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepPhase {
    Top,
    Bottom,
}

/// One frame's input to the counter
#[derive(Debug, Clone, Copy)]
pub struct RepSample {
    pub metric_angle: f64,
    pub baseline_similarity: f64,
    /// Form score in effect this frame
    pub quality: u8,
    pub now_ms: u64,
}

#[derive(Debug, Clone)]
pub struct RepCounter {
    rule: RepRule,
    phase: RepPhase,
    rep_count: u32,
    last_rep_ms: u64,
    cooldown_ms: u64,
    min_samples: usize,
    rep_history: Vec<f64>,
    rep_times: Vec<u64>,
    rep_qualities: Vec<u8>,
}

impl RepCounter {
    /// Create a counter whose cooldown clock starts at `started_at_ms`
    pub fn new(rule: RepRule, cooldown_ms: u64, min_samples: usize, started_at_ms: u64) -> Self {
        Self {
            rule,
            phase: RepPhase::Top,
            rep_count: 0,
            last_rep_ms: started_at_ms,
            cooldown_ms,
            min_samples,
            rep_history: Vec::new(),
            rep_times: Vec::new(),
            rep_qualities: Vec::new(),
        }
    }

    /// Feed one sample; returns true only on the frame a rep is counted
    pub fn update(&mut self, sample: RepSample) -> bool {
        self.rep_history.push(sample.metric_angle);

        if self.rep_history.len() < self.min_samples {
            return false;
        }

        if self.phase == RepPhase::Top && self.rule.enters_bottom(sample.metric_angle) {
            tracing::debug!("Entered bottom position at {:.1}°", sample.metric_angle);
            self.phase = RepPhase::Bottom;
        } else if self.phase == RepPhase::Bottom
            && self
                .rule
                .exits_bottom(sample.metric_angle, sample.baseline_similarity)
            && sample.now_ms.saturating_sub(self.last_rep_ms) >= self.cooldown_ms
        {
            self.phase = RepPhase::Top;
            self.rep_count += 1;
            self.last_rep_ms = sample.now_ms;
            self.rep_times.push(sample.now_ms);
            self.rep_qualities.push(sample.quality);
            tracing::info!(
                "Rep {} counted (angle {:.1}°, quality {})",
                self.rep_count,
                sample.metric_angle,
                sample.quality
            );
            return true;
        }

        false
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn phase(&self) -> RepPhase {
        self.phase
    }

    pub fn rep_times(&self) -> &[u64] {
        &self.rep_times
    }

    pub fn rep_qualities(&self) -> &[u8] {
        &self.rep_qualities
    }

    pub fn samples_seen(&self) -> usize {
        self.rep_history.len()
    }
}
