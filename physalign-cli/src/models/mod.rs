use anyhow::{Context, Result};
use physalign::models::Keypoint;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One frame of a recorded keypoint stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Milliseconds since the recording started
    pub timestamp_ms: u64,

    /// `None` when the detector found nobody in frame
    #[serde(default)]
    pub keypoints: Option<Vec<Keypoint>>,
}

/// Read a recording: a JSON array of frames in capture order
pub fn load_recording(path: &Path) -> Result<Vec<RecordedFrame>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recording {}", path.display()))?;

    let mut frames: Vec<RecordedFrame> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse recording {}", path.display()))?;

    // Out-of-order captures would run the session clock backwards
    frames.sort_by_key(|frame| frame.timestamp_ms);

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_without_keypoints() {
        let frames: Vec<RecordedFrame> = serde_json::from_str(
            r#"[
                {"timestamp_ms": 0},
                {"timestamp_ms": 33, "keypoints": [
                    {"name": "left_hip", "x": 300.0, "y": 200.0, "confidence": 0.8}
                ]}
            ]"#,
        )
        .unwrap();

        assert!(frames[0].keypoints.is_none());
        let keypoints = frames[1].keypoints.as_ref().unwrap();
        assert_eq!(keypoints[0].name, "left_hip");
        assert_eq!(keypoints[0].z, None);
    }

    #[test]
    fn test_load_sorts_by_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recording.json");
        fs::write(&path, r#"[{"timestamp_ms": 66}, {"timestamp_ms": 0}, {"timestamp_ms": 33}]"#)
            .unwrap();

        let stamps: Vec<u64> = load_recording(&path)
            .unwrap()
            .iter()
            .map(|f| f.timestamp_ms)
            .collect();
        assert_eq!(stamps, vec![0, 33, 66]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_recording(Path::new("/nonexistent/recording.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read recording"));
    }
}
