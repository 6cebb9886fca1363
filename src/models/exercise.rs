use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement analyzers supported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Squat,
    ShoulderRaise,
    Unknown,
}

impl ExerciseKind {
    /// Resolve a free-text exercise name from a program.
    ///
    /// Matching is a case-insensitive substring test: "squat" wins over
    /// "shoulder"/"raise".
    pub fn from_exercise_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("squat") {
            Self::Squat
        } else if name.contains("shoulder") || name.contains("raise") {
            Self::ShoulderRaise
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseKind::Squat => write!(f, "squat"),
            ExerciseKind::ShoulderRaise => write!(f, "shoulder_raise"),
            ExerciseKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Camera orientation relative to the subject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraView {
    #[default]
    Side,
    Front,
}

impl std::str::FromStr for CameraView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "side" => Ok(Self::Side),
            "front" => Ok(Self::Front),
            other => Err(format!("Unknown camera view: {}", other)),
        }
    }
}

/// Whether an analyzer could assess the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Assessed,
    InsufficientData,
    Unrecognized,
}

/// Per-frame output of an exercise analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub feedback: String,
    /// Form score in [0, 100]
    pub quality: u8,
    /// Joint angle driving the rep counter, in degrees
    pub metric_angle: f64,
    pub status: AnalysisStatus,
}

impl AnalysisResult {
    /// Start from a perfect score and subtract penalties, floored at 0
    pub fn assessed(feedback: impl Into<String>, deductions: u32, metric_angle: f64) -> Self {
        Self {
            feedback: feedback.into(),
            quality: 100u32.saturating_sub(deductions) as u8,
            metric_angle,
            status: AnalysisStatus::Assessed,
        }
    }

    pub fn insufficient(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            quality: 0,
            metric_angle: 0.0,
            status: AnalysisStatus::InsufficientData,
        }
    }

    pub fn unrecognized() -> Self {
        Self {
            feedback: "Exercise not recognized".to_string(),
            quality: 0,
            metric_angle: 0.0,
            status: AnalysisStatus::Unrecognized,
        }
    }

    pub fn is_assessed(&self) -> bool {
        self.status == AnalysisStatus::Assessed
    }
}

/// Discrete pace classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tempo {
    #[serde(rename = "Slow down")]
    SlowDown,
    #[serde(rename = "Speed up slightly")]
    SpeedUpSlightly,
    #[default]
    #[serde(rename = "Good pace")]
    GoodPace,
}

impl Tempo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tempo::SlowDown => "Slow down",
            Tempo::SpeedUpSlightly => "Speed up slightly",
            Tempo::GoodPace => "Good pace",
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
