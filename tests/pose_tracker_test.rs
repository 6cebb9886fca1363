/// Frame loop tests on a paused tokio clock
///
/// Tests cover:
/// - Rep counting through the async loop
/// - Skipped frames on detector failures
/// - Fatigue self-reports reaching the snapshot stream
/// - Camera release on stop
mod common;

use async_trait::async_trait;
use common::{squat_bottom_keypoints, standing_keypoints};
use mockall::mock;
use physalign::models::{CameraView, Keypoint};
use physalign::services::{ExerciseSession, KeypointSource, MediaResource, PoseTracker};
use physalign::{TrackingConfig, TrackingError};
use std::time::Duration;
use tokio::time::{sleep, Instant};

mock! {
    pub Camera {}

    impl MediaResource for Camera {
        fn release(&mut self);
    }
}

fn camera() -> MockCamera {
    let mut camera = MockCamera::new();
    camera.expect_release().times(1).return_const(());
    camera
}

/// Detector that replays a pose script keyed on elapsed time
struct ScriptedSource<F> {
    started: Instant,
    script: F,
}

impl<F> ScriptedSource<F>
where
    F: FnMut(u64) -> Result<Option<Vec<Keypoint>>, TrackingError> + Send,
{
    fn new(script: F) -> Self {
        Self {
            started: Instant::now(),
            script,
        }
    }
}

#[async_trait]
impl<F> KeypointSource for ScriptedSource<F>
where
    F: FnMut(u64) -> Result<Option<Vec<Keypoint>>, TrackingError> + Send,
{
    async fn detect(&mut self) -> Result<Option<Vec<Keypoint>>, TrackingError> {
        let elapsed_ms = self.started.elapsed().as_millis() as u64;
        (self.script)(elapsed_ms)
    }
}

fn one_squat(elapsed_ms: u64) -> Result<Option<Vec<Keypoint>>, TrackingError> {
    Ok(Some(match elapsed_ms {
        3300..=3800 => squat_bottom_keypoints(),
        _ => standing_keypoints(),
    }))
}

fn squat_session(config: &TrackingConfig) -> ExerciseSession {
    ExerciseSession::new("Squats", CameraView::Side, config, 0)
}

#[tokio::test(start_paused = true)]
async fn test_counts_rep_through_frame_loop() {
    let config = TrackingConfig::default();
    let handle = PoseTracker::start(
        ScriptedSource::new(one_squat),
        camera(),
        squat_session(&config),
        &config,
    );

    sleep(Duration::from_millis(2000)).await;
    assert_eq!(
        handle.snapshot().calibration_status.as_deref(),
        Some("Calibrating... Stand still")
    );

    sleep(Duration::from_millis(4000)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.rep_count, 1);
    assert_eq!(snapshot.calibration_status, None);

    let submission = handle.finish(10).await.unwrap();
    assert_eq!(submission.rep_count, 1);
    assert_eq!(submission.metrics.len(), 1);
    assert_eq!(submission.completion_percentage, 10.0);
}

#[tokio::test(start_paused = true)]
async fn test_detector_failures_keep_last_snapshot() {
    let config = TrackingConfig::default();
    let script = |elapsed_ms: u64| -> Result<Option<Vec<Keypoint>>, TrackingError> {
        if elapsed_ms < 500 {
            Ok(Some(standing_keypoints()))
        } else if elapsed_ms < 1000 {
            Err(TrackingError::Detection("inference backend unavailable".to_string()))
        } else {
            Ok(None)
        }
    };
    let handle = PoseTracker::start(
        ScriptedSource::new(script),
        camera(),
        squat_session(&config),
        &config,
    );

    sleep(Duration::from_millis(400)).await;
    let before = handle.snapshot();
    assert_eq!(before.feedback, "Push hips back");

    sleep(Duration::from_millis(1600)).await;
    assert_eq!(handle.snapshot(), before);

    handle.finish(10).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_fatigue_report_reaches_subscribers() {
    let config = TrackingConfig::default();
    let handle = PoseTracker::start(
        ScriptedSource::new(|_| Ok(None)),
        camera(),
        squat_session(&config),
        &config,
    );
    let mut snapshots = handle.subscribe();

    handle.report_fatigue(8, "shaky knees").unwrap();
    snapshots.changed().await.unwrap();

    let snapshot = snapshots.borrow_and_update().clone();
    assert_eq!(snapshot.fatigue_level, Some(8));
    assert_eq!(snapshot.fatigue_notes.as_deref(), Some("shaky knees"));

    let submission = handle.finish(10).await.unwrap();
    assert_eq!(submission.fatigue_level, Some(8));
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_late_frames() {
    let config = TrackingConfig::default();
    let mut handle = PoseTracker::start(
        ScriptedSource::new(|_| Ok(Some(standing_keypoints()))),
        camera(),
        squat_session(&config),
        &config,
    );

    sleep(Duration::from_millis(100)).await;
    handle.stop();
    let stopped_at = handle.snapshot();

    sleep(Duration::from_millis(1000)).await;
    assert!(handle.is_stopped());
    assert_eq!(handle.snapshot(), stopped_at);
}
