/// Pose tracker: the asynchronous frame loop
///
/// Ticks at the configured frame rate, pulls keypoints from a detector,
/// filters them into landmarks and pushes them through an `ExerciseSession`.
/// The latest snapshot is published on a watch channel so consumers always
/// see the last-known-good state, including across skipped frames.
/// Stopping cancels the loop and releases the camera exactly once.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[cfg(test)]
use mockall::automock;

use crate::config::TrackingConfig;
use crate::errors::TrackingError;
use crate::models::{ExerciseSnapshot, FatigueReport, Keypoint, Landmarks, SessionSubmission};
use crate::services::exercise_session::ExerciseSession;

/// Pose detector producing keypoints for the current camera frame
#[async_trait]
pub trait KeypointSource: Send {
    /// `Ok(None)` when no person is in frame
    async fn detect(&mut self) -> Result<Option<Vec<Keypoint>>, TrackingError>;
}

/// Camera (or other capture device) owned by the tracker
#[cfg_attr(test, automock)]
pub trait MediaResource: Send {
    fn release(&mut self);
}

pub struct PoseTracker;

impl PoseTracker {
    /// Spawn the frame loop for `session` on the current tokio runtime.
    ///
    /// Frame timestamps are the session's start time plus the time elapsed
    /// since this call.
    pub fn start<S, M>(
        source: S,
        media: M,
        session: ExerciseSession,
        config: &TrackingConfig,
    ) -> TrackerHandle
    where
        S: KeypointSource + 'static,
        M: MediaResource + 'static,
    {
        let (snapshot_tx, snapshot_rx) = watch::channel(session.last_snapshot().clone());
        let (fatigue_tx, fatigue_rx) = watch::channel(FatigueReport::default());
        let cancel = CancellationToken::new();

        tracing::info!(
            "Starting frame loop for {:?} at {}ms per frame",
            session.exercise_name(),
            config.frame_interval_ms
        );

        let frame_loop = FrameLoop {
            min_confidence: config.min_confidence,
            frame_interval: config.frame_interval().max(Duration::from_millis(1)),
            snapshots: snapshot_tx,
            fatigue_reports: fatigue_rx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(frame_loop.run(source, session));

        TrackerHandle {
            cancel,
            media: Some(Box::new(media)),
            snapshots: snapshot_rx,
            fatigue_reports: fatigue_tx,
            task: Some(task),
        }
    }
}

struct FrameLoop {
    min_confidence: f32,
    frame_interval: Duration,
    snapshots: watch::Sender<ExerciseSnapshot>,
    fatigue_reports: watch::Receiver<FatigueReport>,
    cancel: CancellationToken,
}

impl FrameLoop {
    async fn run<S: KeypointSource>(mut self, mut source: S, mut session: ExerciseSession) -> ExerciseSession {
        let started = Instant::now();
        let mut ticker = interval(self.frame_interval);
        // A tick that elapses while detection is in flight is dropped, not queued
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut reports_open = true;

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                changed = self.fatigue_reports.changed(), if reports_open => {
                    if changed.is_err() {
                        reports_open = false;
                        continue;
                    }
                    let report = self.fatigue_reports.borrow_and_update().clone();
                    session.apply_fatigue_report(report);
                    self.snapshots.send_replace(session.last_snapshot().clone());
                }

                _ = ticker.tick() => {
                    let detection = tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => break,
                        detection = source.detect() => detection,
                    };

                    if self.cancel.is_cancelled() {
                        tracing::debug!("Discarding detection that finished after stop");
                        break;
                    }

                    match detection {
                        Ok(Some(keypoints)) => {
                            let landmarks = Landmarks::from_keypoints(&keypoints, self.min_confidence);
                            let now_ms = session.started_at_ms() + started.elapsed().as_millis() as u64;
                            let snapshot = session.process_frame(landmarks, now_ms);
                            self.snapshots.send_replace(snapshot);
                        }
                        Ok(None) => tracing::debug!("No pose in frame, keeping last snapshot"),
                        Err(e) => tracing::warn!("Skipping frame: {}", e),
                    }
                }
            }
        }

        tracing::info!(
            "Frame loop stopped with {} reps counted",
            session.rep_count()
        );
        session
    }
}

/// Owner-side handle of a running tracker
pub struct TrackerHandle {
    cancel: CancellationToken,
    media: Option<Box<dyn MediaResource>>,
    snapshots: watch::Receiver<ExerciseSnapshot>,
    fatigue_reports: watch::Sender<FatigueReport>,
    task: Option<JoinHandle<ExerciseSession>>,
}

impl TrackerHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> ExerciseSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExerciseSnapshot> {
        self.snapshots.clone()
    }

    /// Forward a fatigue self-report (level 1 to 10) to the running session
    pub fn report_fatigue(&self, level: u8, notes: impl Into<String>) -> Result<(), TrackingError> {
        let report = FatigueReport::new(level, notes)?;
        self.fatigue_reports.send_replace(report);
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop the frame loop and release the camera. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(mut media) = self.media.take() {
            tracing::debug!("Releasing camera");
            media.release();
        }
    }

    /// Stop, wait for the frame loop to wind down and build the submission
    pub async fn finish(mut self, target_reps: u32) -> Result<SessionSubmission, TrackingError> {
        self.stop();
        let task = self.task.take().ok_or(TrackingError::AlreadyFinished)?;
        let session = task.await?;
        Ok(session.into_submission(target_reps))
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
