/// Standing-baseline calibration
///
/// The first non-empty frame inside the calibration window becomes the
/// baseline. After the window closes the tracker is terminal and only
/// reports how closely the live pose matches that baseline.

use crate::models::{LandmarkName, Landmarks};

pub const CALIBRATING_STATUS: &str = "Calibrating... Stand still";
pub const CALIBRATION_COMPLETE_STATUS: &str = "Calibration complete! Begin exercise";

/// Landmarks compared against the baseline
pub const BASELINE_LANDMARKS: [LandmarkName; 6] = [
    LandmarkName::LeftHip,
    LandmarkName::RightHip,
    LandmarkName::LeftKnee,
    LandmarkName::RightKnee,
    LandmarkName::LeftShoulder,
    LandmarkName::RightShoulder,
];

/// Score lost per pixel of average landmark drift
const DRIFT_PENALTY_PER_PIXEL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    Calibrating,
    Calibrated,
}

#[derive(Debug, Clone)]
pub struct CalibrationTracker {
    state: CalibrationState,
    baseline: Option<Landmarks>,
    started_at_ms: u64,
    duration_ms: u64,
}

impl CalibrationTracker {
    pub fn new(started_at_ms: u64, duration_ms: u64) -> Self {
        Self {
            state: CalibrationState::Calibrating,
            baseline: None,
            started_at_ms,
            duration_ms,
        }
    }

    /// Advance calibration with the current frame.
    ///
    /// Returns the status line to show, or `None` once calibration is over.
    pub fn update(&mut self, landmarks: &Landmarks, now_ms: u64) -> Option<&'static str> {
        if self.state == CalibrationState::Calibrated {
            return None;
        }

        if now_ms.saturating_sub(self.started_at_ms) < self.duration_ms {
            if self.baseline.is_none() && !landmarks.is_empty() {
                tracing::debug!("Captured calibration baseline with {} landmarks", landmarks.len());
                self.baseline = Some(landmarks.clone());
            }
            return Some(CALIBRATING_STATUS);
        }

        self.state = CalibrationState::Calibrated;
        tracing::info!(
            "Calibration complete (baseline captured: {})",
            self.baseline.is_some()
        );
        Some(CALIBRATION_COMPLETE_STATUS)
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn is_calibrating(&self) -> bool {
        self.state == CalibrationState::Calibrating
    }

    pub fn baseline(&self) -> Option<&Landmarks> {
        self.baseline.as_ref()
    }

    /// Match between the live pose and the baseline, in [0, 100].
    ///
    /// Reports 100 while calibrating, without a baseline, or when none of
    /// the key landmarks are visible in both poses.
    pub fn similarity(&self, current: &Landmarks) -> f64 {
        let baseline = match (&self.state, &self.baseline) {
            (CalibrationState::Calibrated, Some(baseline)) => baseline,
            _ => return 100.0,
        };

        let distances: Vec<f64> = BASELINE_LANDMARKS
            .iter()
            .filter_map(|name| match (current.get(*name), baseline.get(*name)) {
                (Some(now), Some(then)) => Some(now.distance_to(then)),
                _ => None,
            })
            .collect();

        if distances.is_empty() {
            return 100.0;
        }

        let average = distances.iter().sum::<f64>() / distances.len() as f64;
        (100.0 - average * DRIFT_PENALTY_PER_PIXEL).max(0.0)
    }
}
