// Tracking pipeline services

pub mod calibration;
pub mod exercise_analyzer;
pub mod exercise_session;
pub mod fatigue_estimator;
pub mod geometry;
pub mod pose_tracker;
pub mod rep_counter;
pub mod tempo_estimator;

pub use calibration::{CalibrationState, CalibrationTracker};
pub use exercise_analyzer::{analyzer_for, ExerciseAnalyzer, ShoulderRaiseAnalyzer, SquatAnalyzer};
pub use exercise_session::ExerciseSession;
pub use fatigue_estimator::FatigueEstimator;
pub use geometry::angle_between;
pub use pose_tracker::{KeypointSource, MediaResource, PoseTracker, TrackerHandle};
pub use rep_counter::{RepCounter, RepPhase, RepRule, RepSample};
pub use tempo_estimator::TempoEstimator;
