use physalign::models::{Keypoint, Landmarks};
use physalign::TrackingConfig;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .init();
    });
}

/// Side-view camera frame rate used by the session tests
pub const FRAME_MS: u64 = 33;

/// Upright stance seen from the left side: knee and hip fully extended
pub fn standing_keypoints() -> Vec<Keypoint> {
    vec![
        Keypoint::new("left_shoulder", 300.0, 100.0, 0.9),
        Keypoint::new("left_hip", 300.0, 200.0, 0.9),
        Keypoint::new("left_knee", 300.0, 300.0, 0.9),
        Keypoint::new("left_ankle", 300.0, 400.0, 0.9),
        // Occluded far side, below the confidence threshold
        Keypoint::new("right_knee", 120.0, 40.0, 0.1),
    ]
}

/// Bottom of a squat: knee at 90 degrees, hips dropped and pushed back
pub fn squat_bottom_keypoints() -> Vec<Keypoint> {
    vec![
        Keypoint::new("left_shoulder", 250.0, 220.0, 0.9),
        Keypoint::new("left_hip", 210.0, 320.0, 0.9),
        Keypoint::new("left_knee", 300.0, 320.0, 0.9),
        Keypoint::new("left_ankle", 300.0, 400.0, 0.9),
    ]
}

pub fn standing() -> Landmarks {
    Landmarks::from_keypoints(&standing_keypoints(), TrackingConfig::default().min_confidence)
}

pub fn squat_bottom() -> Landmarks {
    Landmarks::from_keypoints(&squat_bottom_keypoints(), TrackingConfig::default().min_confidence)
}
