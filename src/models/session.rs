use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::TrackingError;
use crate::models::exercise::Tempo;
use crate::models::landmark::Landmarks;

/// User self-reported fatigue, independent of the estimated tiredness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FatigueReport {
    /// 1 (fresh) to 10 (exhausted)
    pub level: Option<u8>,
    pub notes: Option<String>,
}

impl FatigueReport {
    pub fn new(level: u8, notes: impl Into<String>) -> std::result::Result<Self, TrackingError> {
        if !(1..=10).contains(&level) {
            return Err(TrackingError::InvalidFatigueLevel(level));
        }
        Ok(Self {
            level: Some(level),
            notes: Some(notes.into()),
        })
    }
}

/// Aggregate state delivered to the UI once per processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSnapshot {
    pub rep_count: u32,
    pub quality: u8,
    pub feedback: String,
    /// Reserved; always 0
    pub stress_level: f64,
    pub tiredness: u8,
    pub tempo: Tempo,
    pub landmarks: Landmarks,
    pub fatigue_level: Option<u8>,
    pub fatigue_notes: Option<String>,
    /// Present while calibrating and on the frame calibration completes
    pub calibration_status: Option<String>,
    /// Live match against the standing baseline, in [0, 100]
    pub baseline_similarity: f64,
    /// True only on the frame a rep was counted
    pub rep_completed: bool,
}

impl Default for ExerciseSnapshot {
    fn default() -> Self {
        Self {
            rep_count: 0,
            quality: 100,
            feedback: "Stand in frame".to_string(),
            stress_level: 0.0,
            tiredness: 0,
            tempo: Tempo::GoodPace,
            landmarks: Landmarks::default(),
            fatigue_level: None,
            fatigue_notes: None,
            calibration_status: None,
            baseline_similarity: 100.0,
            rep_completed: false,
        }
    }
}

/// Metrics captured at the moment a rep is counted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepMetric {
    /// Milliseconds since session start
    pub timestamp_ms: u64,
    pub rep_number: u32,
    pub quality: u8,
    pub feedback: String,
    pub tiredness: u8,
    pub tempo: Tempo,
    /// Mean depth velocity behind the tempo label
    pub tempo_velocity: f64,
    pub landmarks: Landmarks,
    pub fatigue_level: Option<u8>,
    pub fatigue_notes: Option<String>,
}

/// End-of-session aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub reps_completed: u32,
    pub duration_seconds: u64,
    pub average_quality: f64,
    pub average_tempo: f64,
    pub quality_per_rep: Vec<u8>,
    pub tempo_per_rep: Vec<f64>,
}

/// Payload handed to the session-submission collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSubmission {
    pub exercise_name: String,
    pub rep_count: u32,
    pub target_reps: u32,
    pub completion_percentage: f64,
    pub metrics: Vec<RepMetric>,
    pub summary: SessionSummary,
    pub fatigue_level: Option<u8>,
    pub fatigue_notes: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl SessionSubmission {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize session submission")
    }
}

/// Share of the prescribed reps completed, capped at 100
pub fn completion_percentage(rep_count: u32, target_reps: u32) -> f64 {
    if target_reps == 0 {
        return 0.0;
    }
    (rep_count as f64 / target_reps as f64 * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_fatigue_report_bounds() {
        assert!(FatigueReport::new(1, "").is_ok());
        assert!(FatigueReport::new(10, "legs burning").is_ok());
        assert_matches!(
            FatigueReport::new(0, ""),
            Err(TrackingError::InvalidFatigueLevel(0))
        );
        assert_matches!(
            FatigueReport::new(11, ""),
            Err(TrackingError::InvalidFatigueLevel(11))
        );
    }

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(5, 10), 50.0);
        assert_eq!(completion_percentage(15, 10), 100.0);
        assert_eq!(completion_percentage(3, 0), 0.0);
    }

    #[test]
    fn test_default_snapshot() {
        let snapshot = ExerciseSnapshot::default();
        assert_eq!(snapshot.feedback, "Stand in frame");
        assert_eq!(snapshot.stress_level, 0.0);
        assert!(!snapshot.rep_completed);
    }

    #[test]
    fn test_submission_json_shape() {
        let submission = SessionSubmission {
            exercise_name: "Wall squats".to_string(),
            rep_count: 4,
            target_reps: 8,
            completion_percentage: completion_percentage(4, 8),
            metrics: Vec::new(),
            summary: SessionSummary {
                reps_completed: 4,
                duration_seconds: 42,
                average_quality: 85.0,
                average_tempo: 0.01,
                quality_per_rep: vec![80, 90, 85, 85],
                tempo_per_rep: vec![0.01; 4],
            },
            fatigue_level: Some(5),
            fatigue_notes: Some(String::new()),
            completed_at: Utc::now(),
        };

        let json: serde_json::Value =
            serde_json::from_str(&submission.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["exercise_name"], "Wall squats");
        assert_eq!(json["completion_percentage"], 50.0);
        assert_eq!(json["summary"]["quality_per_rep"][1], 90);
        assert_eq!(json["fatigue_level"], 5);
    }
}
