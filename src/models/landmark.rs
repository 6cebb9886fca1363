/// Landmark models: raw detector keypoints and the filtered landmark map
///
/// The pose detector yields named keypoints with a confidence score. Only
/// keypoints above the configured confidence make it into a frame's
/// `Landmarks`, so an absent key means "not reliably seen this frame".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Frame-relative coordinate of a body landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Relative depth, when the detector provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn with_depth(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Planar Euclidean distance, ignoring depth
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// COCO landmark vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl LandmarkName {
    pub const ALL: [LandmarkName; 17] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandmarkName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("Unknown landmark name: {}", s))
    }
}

/// A keypoint as emitted by the pose detector, before confidence filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Keypoint name (e.g., "left_shoulder")
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection confidence (0-1)
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64, confidence: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z: None,
            confidence,
        }
    }

    pub fn with_depth(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }
}

/// The confidently detected landmarks of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmarks(BTreeMap<LandmarkName, Point>);

impl Landmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only keypoints scoring above `min_confidence`.
    ///
    /// Names outside the vocabulary are dropped.
    pub fn from_keypoints(keypoints: &[Keypoint], min_confidence: f32) -> Self {
        let mut landmarks = Self::new();

        for kp in keypoints {
            if kp.confidence <= min_confidence {
                continue;
            }
            match kp.name.parse::<LandmarkName>() {
                Ok(name) => {
                    landmarks.insert(
                        name,
                        Point {
                            x: kp.x,
                            y: kp.y,
                            z: kp.z,
                        },
                    );
                }
                Err(e) => tracing::debug!("{}", e),
            }
        }

        landmarks
    }

    pub fn insert(&mut self, name: LandmarkName, point: Point) -> Option<Point> {
        self.0.insert(name, point)
    }

    pub fn get(&self, name: LandmarkName) -> Option<&Point> {
        self.0.get(&name)
    }

    pub fn contains(&self, name: LandmarkName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LandmarkName, &Point)> {
        self.0.iter()
    }
}

impl FromIterator<(LandmarkName, Point)> for Landmarks {
    fn from_iter<I: IntoIterator<Item = (LandmarkName, Point)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::with_depth(3.0, 4.0, 0.7);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_landmark_names_round_trip_through_strings() {
        for name in LandmarkName::ALL {
            assert_eq!(name.as_str().parse::<LandmarkName>().unwrap(), name);
        }
        assert!("left_toe".parse::<LandmarkName>().is_err());
    }

    #[test]
    fn test_confidence_filtering() {
        let keypoints = vec![
            Keypoint::new("left_hip", 100.0, 200.0, 0.9),
            Keypoint::new("left_knee", 110.0, 300.0, 0.2),
            Keypoint::new("left_ankle", 105.0, 400.0, 0.1),
            Keypoint::new("tail", 1.0, 1.0, 0.99),
        ];

        let landmarks = Landmarks::from_keypoints(&keypoints, 0.2);

        assert_eq!(landmarks.len(), 1);
        assert!(landmarks.contains(LandmarkName::LeftHip));
        assert!(!landmarks.contains(LandmarkName::LeftKnee));
    }

    #[test]
    fn test_landmarks_serialize_as_named_map() {
        let landmarks: Landmarks = [
            (LandmarkName::LeftHip, Point::with_depth(1.0, 2.0, 0.5)),
            (LandmarkName::RightKnee, Point::new(3.0, 4.0)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_value(&landmarks).unwrap();
        assert_eq!(json["left_hip"]["z"], 0.5);
        assert_eq!(json["right_knee"]["x"], 3.0);
        assert!(json["right_knee"].get("z").is_none());

        let back: Landmarks = serde_json::from_value(json).unwrap();
        assert_eq!(back, landmarks);
    }
}
