use anyhow::Result;
use clap::Args;
use colored::Colorize;
use physalign::models::{CameraView, ExerciseSnapshot, Landmarks, SessionSummary};
use physalign::services::calibration::CALIBRATION_COMPLETE_STATUS;
use physalign::services::ExerciseSession;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::{load_recording, RecordedFrame};

#[derive(Args)]
pub struct ReplayCommand {
    /// Recorded keypoint stream (JSON array of frames)
    file: PathBuf,

    /// Program exercise name, e.g. "Wall Squats" or "Lateral Shoulder Raise"
    #[arg(short, long)]
    exercise: String,

    /// Camera orientation relative to the patient (side or front)
    #[arg(long)]
    view: Option<CameraView>,

    /// Prescribed number of reps
    #[arg(short, long)]
    target_reps: Option<u32>,

    /// Self-reported fatigue after the set (1-10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    fatigue_level: Option<u8>,

    /// Notes attached to the fatigue report
    #[arg(long, requires = "fatigue_level")]
    fatigue_notes: Option<String>,

    /// Print the session submission as JSON
    #[arg(long)]
    json: bool,
}

impl ReplayCommand {
    pub async fn execute(self, config: &Config) -> Result<()> {
        let frames = load_recording(&self.file)?;
        let view = self.view.unwrap_or(config.replay.view);
        let target_reps = self.target_reps.unwrap_or(config.replay.target_reps);
        let started_at_ms = frames.first().map(|f| f.timestamp_ms).unwrap_or(0);

        tracing::info!("Replaying {} frames from {}", frames.len(), self.file.display());

        let mut session = ExerciseSession::new(self.exercise.clone(), view, &config.tracking, started_at_ms);
        let snapshots = replay_frames(&mut session, &frames, config.tracking.min_confidence);

        if let Some(level) = self.fatigue_level {
            session.report_fatigue(level, self.fatigue_notes.unwrap_or_default())?;
        }

        if self.json {
            let submission = session.into_submission(target_reps);
            println!("{}", submission.to_json_pretty()?);
            return Ok(());
        }

        println!("{} {}", "Replaying".bold(), self.exercise);
        println!("────────────────────────────────");
        for snapshot in &snapshots {
            print_events(snapshot);
        }

        let summary = session.summary();
        let submission = session.into_submission(target_reps);
        println!();
        print_summary(&summary, submission.completion_percentage, target_reps);

        Ok(())
    }
}

/// Push every frame with a detection through the session.
///
/// Frames without keypoints are skipped and leave the session untouched,
/// the same way the live tracker treats a failed detection.
pub fn replay_frames(
    session: &mut ExerciseSession,
    frames: &[RecordedFrame],
    min_confidence: f32,
) -> Vec<ExerciseSnapshot> {
    frames
        .iter()
        .filter_map(|frame| {
            let keypoints = frame.keypoints.as_ref()?;
            let landmarks = Landmarks::from_keypoints(keypoints, min_confidence);
            Some(session.process_frame(landmarks, frame.timestamp_ms))
        })
        .collect()
}

fn print_events(snapshot: &ExerciseSnapshot) {
    if snapshot.calibration_status.as_deref() == Some(CALIBRATION_COMPLETE_STATUS) {
        println!("{}", CALIBRATION_COMPLETE_STATUS.cyan());
    }

    if snapshot.rep_completed {
        let quality = format!("{:>3}%", snapshot.quality);
        let quality = match snapshot.quality {
            80..=100 => quality.green(),
            60..=79 => quality.yellow(),
            _ => quality.red(),
        };
        println!(
            "✓ Rep {:<3} quality {}  {:<24} {}",
            snapshot.rep_count, quality, snapshot.feedback, snapshot.tempo
        );
    }
}

fn print_summary(summary: &SessionSummary, completion_percentage: f64, target_reps: u32) {
    println!("{}", "Session Summary".bold());
    println!(
        "Reps:            {} / {} ({:.0}%)",
        summary.reps_completed, target_reps, completion_percentage
    );
    println!("Duration:        {}s", summary.duration_seconds);
    println!("Average quality: {:.1}", summary.average_quality);
    println!("Average tempo:   {:.4}", summary.average_tempo);
}
