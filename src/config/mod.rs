use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::TrackingError;

/// Tracking configuration shared by the session and the frame loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Keypoints at or below this confidence never reach the analyzers
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Length of the standing-baseline capture window
    #[serde(default = "default_calibration_duration_ms")]
    pub calibration_duration_ms: u64,

    /// Minimum spacing between two counted reps
    #[serde(default = "default_rep_cooldown_ms")]
    pub rep_cooldown_ms: u64,

    /// Metric samples required before the rep counter evaluates transitions
    #[serde(default = "default_min_rep_samples")]
    pub min_rep_samples: usize,

    /// Number of velocity samples averaged for the tempo label
    #[serde(default = "default_tempo_window")]
    pub tempo_window: usize,

    /// Rep count at which the fatigue base term reaches 60
    #[serde(default = "default_fatigue_target_reps")]
    pub fatigue_target_reps: u32,

    /// Frame loop tick period
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_min_confidence() -> f32 {
    0.2
}

fn default_calibration_duration_ms() -> u64 {
    3000
}

fn default_rep_cooldown_ms() -> u64 {
    800
}

fn default_min_rep_samples() -> usize {
    2
}

fn default_tempo_window() -> usize {
    10
}

fn default_fatigue_target_reps() -> u32 {
    10
}

fn default_frame_interval_ms() -> u64 {
    33
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            calibration_duration_ms: default_calibration_duration_ms(),
            rep_cooldown_ms: default_rep_cooldown_ms(),
            min_rep_samples: default_min_rep_samples(),
            tempo_window: default_tempo_window(),
            fatigue_target_reps: default_fatigue_target_reps(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl TrackingConfig {
    /// Create configuration from `PHYSALIGN_*` environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            min_confidence: env_or("PHYSALIGN_MIN_CONFIDENCE", defaults.min_confidence),
            calibration_duration_ms: env_or(
                "PHYSALIGN_CALIBRATION_MS",
                defaults.calibration_duration_ms,
            ),
            rep_cooldown_ms: env_or("PHYSALIGN_REP_COOLDOWN_MS", defaults.rep_cooldown_ms),
            min_rep_samples: env_or("PHYSALIGN_MIN_REP_SAMPLES", defaults.min_rep_samples),
            tempo_window: env_or("PHYSALIGN_TEMPO_WINDOW", defaults.tempo_window),
            fatigue_target_reps: env_or(
                "PHYSALIGN_FATIGUE_TARGET_REPS",
                defaults.fatigue_target_reps,
            ),
            frame_interval_ms: env_or("PHYSALIGN_FRAME_INTERVAL_MS", defaults.frame_interval_ms),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall or divide by zero in the pipeline
    pub fn validate(&self) -> Result<(), TrackingError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(TrackingError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        if self.tempo_window == 0 {
            return Err(TrackingError::InvalidConfig(
                "tempo_window must be at least 1".to_string(),
            ));
        }
        if self.fatigue_target_reps == 0 {
            return Err(TrackingError::InvalidConfig(
                "fatigue_target_reps must be at least 1".to_string(),
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(TrackingError::InvalidConfig(
                "frame_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}
