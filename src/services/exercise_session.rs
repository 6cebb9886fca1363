/// Exercise session: the per-frame pipeline
///
/// One `ExerciseSession` owns every piece of mutable state for a single
/// recording: calibration, the rep counter, tempo and fatigue estimators,
/// the user's fatigue self-report and the per-rep metrics handed off when
/// the session ends. Each frame runs:
/// calibration -> analyzer -> rep counter -> tempo -> fatigue -> snapshot.

use chrono::Utc;
use statrs::statistics::Statistics;

use crate::config::TrackingConfig;
use crate::errors::TrackingError;
use crate::models::{
    completion_percentage, CameraView, ExerciseKind, ExerciseSnapshot, FatigueReport,
    LandmarkName, Landmarks, RepMetric, SessionSubmission, SessionSummary,
};
use crate::services::calibration::CalibrationTracker;
use crate::services::exercise_analyzer::{analyzer_for, ExerciseAnalyzer};
use crate::services::fatigue_estimator::FatigueEstimator;
use crate::services::rep_counter::{RepCounter, RepRule, RepSample};
use crate::services::tempo_estimator::TempoEstimator;

/// Landmark whose depth drives the tempo estimate
const DEPTH_LANDMARK: LandmarkName = LandmarkName::LeftHip;

pub struct ExerciseSession {
    exercise_name: String,
    kind: ExerciseKind,
    view: CameraView,
    analyzer: Box<dyn ExerciseAnalyzer>,
    calibration: CalibrationTracker,
    rep_counter: RepCounter,
    tempo: TempoEstimator,
    fatigue: FatigueEstimator,
    fatigue_report: FatigueReport,
    rep_metrics: Vec<RepMetric>,
    started_at_ms: u64,
    last_frame_ms: u64,
    last_snapshot: ExerciseSnapshot,
}

impl ExerciseSession {
    /// Start a session for a program exercise.
    ///
    /// The exercise name is resolved to an analyzer once, here.
    pub fn new(
        exercise_name: impl Into<String>,
        view: CameraView,
        config: &TrackingConfig,
        started_at_ms: u64,
    ) -> Self {
        let exercise_name = exercise_name.into();
        let kind = ExerciseKind::from_exercise_name(&exercise_name);

        if kind == ExerciseKind::Unknown {
            tracing::warn!("No movement model for exercise {:?}", exercise_name);
        } else {
            tracing::info!("Tracking {:?} as {} ({:?} view)", exercise_name, kind, view);
        }

        Self {
            analyzer: analyzer_for(kind),
            calibration: CalibrationTracker::new(started_at_ms, config.calibration_duration_ms),
            rep_counter: RepCounter::new(
                RepRule::for_kind(kind),
                config.rep_cooldown_ms,
                config.min_rep_samples,
                started_at_ms,
            ),
            tempo: TempoEstimator::new(config.tempo_window),
            fatigue: FatigueEstimator::new(config.fatigue_target_reps),
            fatigue_report: FatigueReport::default(),
            rep_metrics: Vec::new(),
            started_at_ms,
            last_frame_ms: started_at_ms,
            last_snapshot: ExerciseSnapshot::default(),
            exercise_name,
            kind,
            view,
        }
    }

    /// Run the pipeline over one frame's landmarks
    pub fn process_frame(&mut self, landmarks: Landmarks, now_ms: u64) -> ExerciseSnapshot {
        self.last_frame_ms = self.last_frame_ms.max(now_ms);

        let calibration_status = self.calibration.update(&landmarks, now_ms);
        let analysis = self.analyzer.analyze(&landmarks, self.view);
        let baseline_similarity = self.calibration.similarity(&landmarks);

        let rep_completed = if !self.calibration.is_calibrating() && analysis.is_assessed() {
            self.rep_counter.update(RepSample {
                metric_angle: analysis.metric_angle,
                baseline_similarity,
                quality: analysis.quality,
                now_ms,
            })
        } else {
            false
        };

        if let Some(point) = landmarks.get(DEPTH_LANDMARK) {
            self.tempo.update(point.z.unwrap_or(0.0), now_ms);
        }

        let rep_count = self.rep_counter.rep_count();
        let tiredness = self.fatigue.estimate(rep_count, self.rep_counter.rep_times());

        let snapshot = ExerciseSnapshot {
            rep_count,
            quality: analysis.quality,
            feedback: analysis.feedback,
            stress_level: 0.0,
            tiredness,
            tempo: self.tempo.tempo(),
            landmarks,
            fatigue_level: self.fatigue_report.level,
            fatigue_notes: self.fatigue_report.notes.clone(),
            calibration_status: calibration_status.map(str::to_string),
            baseline_similarity,
            rep_completed,
        };

        if rep_completed {
            self.rep_metrics.push(RepMetric {
                timestamp_ms: now_ms.saturating_sub(self.started_at_ms),
                rep_number: rep_count,
                quality: snapshot.quality,
                feedback: snapshot.feedback.clone(),
                tiredness,
                tempo: snapshot.tempo,
                tempo_velocity: self.tempo.mean_velocity(),
                landmarks: snapshot.landmarks.clone(),
                fatigue_level: snapshot.fatigue_level,
                fatigue_notes: snapshot.fatigue_notes.clone(),
            });
        }

        self.last_snapshot = snapshot.clone();
        snapshot
    }

    /// Record the user's self-reported fatigue.
    ///
    /// An out-of-range level leaves the previous report untouched.
    pub fn report_fatigue(&mut self, level: u8, notes: impl Into<String>) -> Result<(), TrackingError> {
        self.apply_fatigue_report(FatigueReport::new(level, notes)?);
        Ok(())
    }

    pub(crate) fn apply_fatigue_report(&mut self, report: FatigueReport) {
        self.last_snapshot.fatigue_level = report.level;
        self.last_snapshot.fatigue_notes = report.notes.clone();
        self.fatigue_report = report;
    }

    /// Most recent snapshot; the last-known-good state when frames are skipped
    pub fn last_snapshot(&self) -> &ExerciseSnapshot {
        &self.last_snapshot
    }

    pub fn exercise_name(&self) -> &str {
        &self.exercise_name
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn view(&self) -> CameraView {
        self.view
    }

    pub fn started_at_ms(&self) -> u64 {
        self.started_at_ms
    }

    pub fn rep_count(&self) -> u32 {
        self.rep_counter.rep_count()
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibration.is_calibrating()
    }

    pub fn rep_metrics(&self) -> &[RepMetric] {
        &self.rep_metrics
    }

    pub fn summary(&self) -> SessionSummary {
        let quality_per_rep = self.rep_counter.rep_qualities().to_vec();
        let tempo_per_rep: Vec<f64> = self.rep_metrics.iter().map(|m| m.tempo_velocity).collect();

        SessionSummary {
            reps_completed: self.rep_counter.rep_count(),
            duration_seconds: self.last_frame_ms.saturating_sub(self.started_at_ms) / 1000,
            average_quality: mean_or_zero(quality_per_rep.iter().map(|q| *q as f64)),
            average_tempo: mean_or_zero(tempo_per_rep.iter().copied()),
            quality_per_rep,
            tempo_per_rep,
        }
    }

    /// Close the session into the payload for the submission step
    pub fn into_submission(self, target_reps: u32) -> SessionSubmission {
        let summary = self.summary();
        let rep_count = self.rep_counter.rep_count();

        SessionSubmission {
            exercise_name: self.exercise_name,
            rep_count,
            target_reps,
            completion_percentage: completion_percentage(rep_count, target_reps),
            metrics: self.rep_metrics,
            summary,
            fatigue_level: self.fatigue_report.level,
            fatigue_notes: self.fatigue_report.notes,
            completed_at: Utc::now(),
        }
    }
}

fn mean_or_zero(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        0.0
    } else {
        values.mean()
    }
}
