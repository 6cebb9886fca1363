/// Exercise form analyzers
///
/// Each analyzer maps the current frame's landmarks to a form score, a
/// feedback line and the joint angle that drives rep counting. Penalties
/// accumulate against a score of 100; when several checks fire, the last
/// one evaluated owns the feedback string.

use crate::models::{AnalysisResult, CameraView, ExerciseKind, LandmarkName, Landmarks};
use crate::services::geometry::angle_between;

use LandmarkName::*;

/// Knee angle above which the squat is too shallow
const SQUAT_SHALLOW_ANGLE: f64 = 120.0;
/// Knee angle below which the squat is too deep
const SQUAT_DEEP_ANGLE: f64 = 70.0;
/// Shoulder-hip-knee angle above which the torso is too upright
const SQUAT_UPRIGHT_HIP_ANGLE: f64 = 140.0;
/// Maximum tolerated left/right asymmetry, in degrees
const ASYMMETRY_TOLERANCE: f64 = 15.0;
/// Arm angle above which the raise has not gone high enough
const RAISE_LOW_ANGLE: f64 = 100.0;
/// Elbow angle below which the arm counts as bent
const BENT_ELBOW_ANGLE: f64 = 160.0;

pub const FULL_BODY_NEEDED: &str = "Full body needed";
pub const SHOULDERS_NEEDED: &str = "Shoulders needed";
pub const ARMS_NEEDED: &str = "Arms needed";

/// Common interface of the per-exercise analyzers
pub trait ExerciseAnalyzer: Send + Sync {
    fn kind(&self) -> ExerciseKind;

    fn analyze(&self, landmarks: &Landmarks, view: CameraView) -> AnalysisResult;
}

/// Pick the analyzer for a resolved exercise kind
pub fn analyzer_for(kind: ExerciseKind) -> Box<dyn ExerciseAnalyzer> {
    match kind {
        ExerciseKind::Squat => Box::new(SquatAnalyzer),
        ExerciseKind::ShoulderRaise => Box::new(ShoulderRaiseAnalyzer),
        ExerciseKind::Unknown => Box::new(UnrecognizedAnalyzer),
    }
}

/// Angle at `vertex`, when all three landmarks are present
fn joint_angle(
    landmarks: &Landmarks,
    a: LandmarkName,
    vertex: LandmarkName,
    c: LandmarkName,
) -> Option<f64> {
    Some(angle_between(
        landmarks.get(a)?,
        landmarks.get(vertex)?,
        landmarks.get(c)?,
    ))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SquatAnalyzer;

impl SquatAnalyzer {
    fn analyze_side(&self, landmarks: &Landmarks) -> AnalysisResult {
        let knee_angle = match joint_angle(landmarks, LeftHip, LeftKnee, LeftAnkle) {
            Some(angle) => angle,
            None => return AnalysisResult::insufficient(FULL_BODY_NEEDED),
        };

        let mut deductions = 0;
        let mut feedback = "Perfect form";

        if knee_angle > SQUAT_SHALLOW_ANGLE {
            deductions += 20;
            feedback = "Go deeper";
        } else if knee_angle < SQUAT_DEEP_ANGLE {
            deductions += 15;
            feedback = "Not too deep";
        }

        if let Some(hip_angle) = joint_angle(landmarks, LeftShoulder, LeftHip, LeftKnee) {
            if hip_angle > SQUAT_UPRIGHT_HIP_ANGLE {
                deductions += 20;
                feedback = "Push hips back";
            }
        }

        AnalysisResult::assessed(feedback, deductions, knee_angle)
    }

    fn analyze_front(&self, landmarks: &Landmarks) -> AnalysisResult {
        let angles = (
            joint_angle(landmarks, LeftHip, LeftKnee, LeftAnkle),
            joint_angle(landmarks, RightHip, RightKnee, RightAnkle),
        );
        let (left, right) = match angles {
            (Some(left), Some(right)) => (left, right),
            _ => return AnalysisResult::insufficient(FULL_BODY_NEEDED),
        };

        let average = (left + right) / 2.0;
        let difference = (left - right).abs();

        let (deductions, feedback) = if difference > ASYMMETRY_TOLERANCE {
            (30, "Balance left and right")
        } else if average > SQUAT_SHALLOW_ANGLE {
            (20, "Go deeper")
        } else if average < SQUAT_DEEP_ANGLE {
            (15, "Not too deep")
        } else {
            (0, "Perfect form")
        };

        AnalysisResult::assessed(feedback, deductions, average)
    }
}

impl ExerciseAnalyzer for SquatAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Squat
    }

    fn analyze(&self, landmarks: &Landmarks, view: CameraView) -> AnalysisResult {
        match view {
            CameraView::Side => self.analyze_side(landmarks),
            CameraView::Front => self.analyze_front(landmarks),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ShoulderRaiseAnalyzer;

impl ExerciseAnalyzer for ShoulderRaiseAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::ShoulderRaise
    }

    fn analyze(&self, landmarks: &Landmarks, _view: CameraView) -> AnalysisResult {
        if !landmarks.contains(LeftShoulder) || !landmarks.contains(RightShoulder) {
            return AnalysisResult::insufficient(SHOULDERS_NEEDED);
        }

        let left_arm = joint_angle(landmarks, LeftHip, LeftShoulder, LeftElbow);
        let right_arm = joint_angle(landmarks, RightHip, RightShoulder, RightElbow);

        let mut deductions = 0;
        let mut feedback = "Perfect height";

        let average = match (left_arm, right_arm) {
            (Some(left), Some(right)) => {
                let average = (left + right) / 2.0;
                if (left - right).abs() > ASYMMETRY_TOLERANCE {
                    deductions += 25;
                    feedback = "Raise arms evenly";
                } else if average > RAISE_LOW_ANGLE {
                    deductions += 20;
                    feedback = "Raise higher";
                }
                average
            }
            (Some(single), None) | (None, Some(single)) => {
                if single > RAISE_LOW_ANGLE {
                    deductions += 20;
                    feedback = "Raise higher";
                }
                single
            }
            (None, None) => return AnalysisResult::insufficient(ARMS_NEEDED),
        };

        let bent_elbow = [
            joint_angle(landmarks, LeftShoulder, LeftElbow, LeftWrist),
            joint_angle(landmarks, RightShoulder, RightElbow, RightWrist),
        ]
        .into_iter()
        .flatten()
        .any(|elbow| elbow < BENT_ELBOW_ANGLE);

        if bent_elbow {
            deductions += 15;
            feedback = "Straighten arms";
        }

        AnalysisResult::assessed(feedback, deductions, average)
    }
}

/// Fallback for exercises without a movement model; never counts reps
#[derive(Debug, Default, Clone, Copy)]
pub struct UnrecognizedAnalyzer;

impl ExerciseAnalyzer for UnrecognizedAnalyzer {
    fn kind(&self) -> ExerciseKind {
        ExerciseKind::Unknown
    }

    fn analyze(&self, _landmarks: &Landmarks, _view: CameraView) -> AnalysisResult {
        AnalysisResult::unrecognized()
    }
}
