//! Playback scheduler: dedicated play-loop thread with paced stepping.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use contracts::{PlaybackCallback, PlaybackConfig, PlaybackUpdate, ReplayError, StopReason};
use tracing::{debug, warn};

use crate::pipeline::ReplayPipeline;

/// Scheduler state as observed by the controller thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// No play loop exists
    Idle,
    /// A play loop is stepping through frames
    Running,
    /// Stop requested, loop not yet joined
    Stopping,
}

/// State shared between the controller thread and the play loop.
///
/// The cancel flag and the current index are the only two pieces of
/// mutable state two execution units ever touch; everything else the
/// loop reads is immutable for the session. One instance exists per
/// run and dies with it.
struct PlaybackShared {
    cancel: AtomicBool,
    current_index: AtomicUsize,
    pacer: Mutex<()>,
    wake: Condvar,
}

impl PlaybackShared {
    fn new(start_index: usize) -> Self {
        Self {
            cancel: AtomicBool::new(false),
            current_index: AtomicUsize::new(start_index),
            pacer: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    fn request_stop(&self) {
        self.cancel.store(true, Ordering::Release);
        // Take the pacer lock so a waiter between its flag check and
        // wait_timeout cannot miss this notification.
        let _guard = self.lock_pacer();
        self.wake.notify_all();
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn set_current(&self, index: usize) {
        self.current_index.store(index, Ordering::Release);
    }

    fn current(&self) -> usize {
        self.current_index.load(Ordering::Acquire)
    }

    fn lock_pacer(&self) -> MutexGuard<'_, ()> {
        self.pacer.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep up to `timeout`, returning early when a stop is requested.
    fn paced_wait(&self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock_pacer();
        loop {
            if self.cancelled() {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            let (next, _) = self
                .wake
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            guard = next;
        }
    }
}

/// Drives the play loop over a replay pipeline.
///
/// At most one loop is live at a time: a start while Running is
/// rejected with `PlaybackBusy`, and `stop` joins the loop before
/// returning so no stale loop can keep advancing the displayed index
/// after a new run begins.
pub struct PlaybackController {
    pipeline: Arc<ReplayPipeline>,
    config: PlaybackConfig,
    shared: Arc<PlaybackShared>,
    worker: Option<JoinHandle<()>>,
}

impl PlaybackController {
    /// Create an idle controller over a pipeline.
    pub fn new(pipeline: Arc<ReplayPipeline>, config: PlaybackConfig) -> Self {
        Self {
            pipeline,
            config,
            shared: Arc::new(PlaybackShared::new(0)),
            worker: None,
        }
    }

    /// Current scheduler state.
    pub fn state(&self) -> PlaybackState {
        match &self.worker {
            None => PlaybackState::Idle,
            Some(handle) if handle.is_finished() => PlaybackState::Idle,
            Some(_) if self.shared.cancelled() => PlaybackState::Stopping,
            Some(_) => PlaybackState::Running,
        }
    }

    /// True while a play loop is live.
    pub fn is_running(&self) -> bool {
        self.state() != PlaybackState::Idle
    }

    /// Index most recently handed to the render pipeline.
    pub fn current_index(&self) -> usize {
        self.shared.current()
    }

    /// Spawn the play loop at `start_index` and return immediately.
    ///
    /// Every delivery (overlays and the final `Finished`) goes
    /// through `callback`, invoked synchronously inside the loop.
    ///
    /// # Errors
    /// - `PlaybackBusy` while a previous loop is still live
    /// - `OutOfRange` when `start_index` is outside the frame source
    pub fn start(
        &mut self,
        start_index: usize,
        callback: PlaybackCallback,
    ) -> Result<(), ReplayError> {
        if let Some(handle) = &self.worker {
            if !handle.is_finished() {
                return Err(ReplayError::PlaybackBusy);
            }
        }
        // Reap a loop that already ran to completion on its own.
        self.join_worker();

        let frame_count = self.pipeline.frame_count();
        if start_index >= frame_count {
            return Err(ReplayError::out_of_range("frame", start_index, frame_count));
        }

        // Fresh shared state per run; identity does not persist across
        // a stop/restart cycle.
        let shared = Arc::new(PlaybackShared::new(start_index));
        self.shared = shared.clone();

        let pipeline = self.pipeline.clone();
        let speed = self.config.speed;

        let handle = std::thread::Builder::new()
            .name("play-loop".into())
            .spawn(move || play_loop(pipeline, shared, speed, start_index, callback))?;
        self.worker = Some(handle);

        metrics::counter!("replay_playback_starts_total").increment(1);
        Ok(())
    }

    /// Request a stop and block until the play loop has fully terminated.
    ///
    /// Safe to call while Idle; a no-op then.
    pub fn stop(&mut self) {
        self.shared.request_stop();
        self.join_worker();
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("play loop thread panicked");
            }
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shared.request_stop();
        self.join_worker();
    }
}

/// One run of the play loop, from `start_index` to the last frame or a
/// stop request, whichever comes first.
///
/// Per step: record the wall clock, render and deliver the frame, check
/// the cancel flag, then sleep the recorded inter-frame delta minus the
/// measured overhead. Delay is never negative: a slow step makes
/// playback fall behind real time, never speeds it up, and no frame is
/// skipped.
fn play_loop(
    pipeline: Arc<ReplayPipeline>,
    shared: Arc<PlaybackShared>,
    speed: f64,
    start_index: usize,
    callback: PlaybackCallback,
) {
    debug!(start_index, speed, "play loop started");

    let last_index = pipeline.frame_count().saturating_sub(1);
    let mut reason = StopReason::Completed;
    let mut index = start_index;

    loop {
        // A stop during the paced wait must land before the next frame
        // is shown.
        if shared.cancelled() {
            reason = StopReason::Cancelled;
            break;
        }

        let step_started = Instant::now();
        shared.set_current(index);

        match pipeline.render_frame(index) {
            Ok(overlay) => callback(PlaybackUpdate::Overlay(overlay)),
            Err(e) => {
                // One bad frame degrades to "nothing shown this step";
                // the loop and its pacing carry on.
                warn!(index, error = %e, "frame render failed");
                metrics::counter!("replay_playback_render_errors_total").increment(1);
            }
        }

        if shared.cancelled() {
            reason = StopReason::Cancelled;
            break;
        }
        if index >= last_index {
            break;
        }

        match step_delta(&pipeline, index, speed) {
            Ok(delta) => {
                let overhead = step_started.elapsed();
                let pause = paced_delay(delta, overhead);

                metrics::histogram!("replay_step_overhead_ms")
                    .record(overhead.as_secs_f64() * 1000.0);
                metrics::histogram!("replay_step_sleep_ms").record(pause.as_secs_f64() * 1000.0);
                if pause.is_zero() && overhead > delta {
                    metrics::counter!("replay_steps_behind_total").increment(1);
                }

                if !pause.is_zero() {
                    shared.paced_wait(pause);
                }
            }
            Err(e) => {
                // Unreachable for a well-formed source; bail rather
                // than free-run without pacing.
                warn!(index, error = %e, "pacing lookup failed, ending playback");
                break;
            }
        }

        index += 1;
    }

    callback(PlaybackUpdate::Finished(reason));
    metrics::counter!(
        "replay_playback_finished_total",
        "reason" => match reason {
            StopReason::Completed => "completed",
            StopReason::Cancelled => "cancelled",
        }
    )
    .increment(1);
    debug!(?reason, last_shown = shared.current(), "play loop finished");
}

/// Recorded delay between `index` and its successor, scaled by speed.
fn step_delta(pipeline: &ReplayPipeline, index: usize, speed: f64) -> Result<Duration, ReplayError> {
    let frames = pipeline.frames();
    let delta = frames.timestamp_at(index + 1)? - frames.timestamp_at(index)?;
    Ok(delta.div_f64(speed))
}

/// Overhead-compensated pause: `max(delta - overhead, 0)`.
fn paced_delay(delta: Duration, overhead: Duration) -> Duration {
    delta.saturating_sub(overhead)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{
        CameraFrame, CameraIntrinsics, CameraRig, ImageData, ImageFormat, SensorPose, Timestamp,
    };
    use projection::ProjectionContext;
    use std::sync::Mutex as StdMutex;
    use timeline::FrameStore;

    fn make_frame(timestamp_ms: u64) -> CameraFrame {
        CameraFrame {
            timestamp: Timestamp::from_millis(timestamp_ms),
            image: ImageData {
                width: 4,
                height: 4,
                format: ImageFormat::Rgb8,
                data: Bytes::from(vec![0u8; 48]),
            },
        }
    }

    fn test_rig() -> CameraRig {
        CameraRig {
            intrinsics: CameraIntrinsics {
                fx: 100.0,
                fy: 100.0,
                cx: 2.0,
                cy: 2.0,
                width: 4,
                height: 4,
            },
            lidar_to_camera: SensorPose::default(),
            calibration_file: None,
        }
    }

    fn pipeline_with_timestamps(timestamps_ms: &[u64]) -> Arc<ReplayPipeline> {
        let frames =
            FrameStore::new(timestamps_ms.iter().map(|&t| make_frame(t)).collect()).unwrap();
        Arc::new(ReplayPipeline::new(
            Arc::new(frames),
            None,
            ProjectionContext::new(&test_rig()),
        ))
    }

    /// Collects every update the loop delivers.
    fn collecting_callback() -> (PlaybackCallback, Arc<StdMutex<Vec<PlaybackUpdate>>>) {
        let collected = Arc::new(StdMutex::new(Vec::new()));
        let sink = collected.clone();
        let callback: PlaybackCallback = Arc::new(move |update| {
            sink.lock().unwrap().push(update);
        });
        (callback, collected)
    }

    fn overlay_indices(updates: &[PlaybackUpdate]) -> Vec<usize> {
        updates
            .iter()
            .filter_map(|u| match u {
                PlaybackUpdate::Overlay(o) => Some(o.frame_index),
                PlaybackUpdate::Finished(_) => None,
            })
            .collect()
    }

    fn finished_reason(updates: &[PlaybackUpdate]) -> Option<StopReason> {
        updates.iter().find_map(|u| match u {
            PlaybackUpdate::Finished(reason) => Some(*reason),
            _ => None,
        })
    }

    #[test]
    fn test_paced_delay_formula() {
        let d = Duration::from_millis(100);
        assert_eq!(
            paced_delay(d, Duration::from_millis(30)),
            Duration::from_millis(70)
        );
        // Overhead beyond the delta never produces a negative sleep
        assert_eq!(paced_delay(d, Duration::from_millis(130)), Duration::ZERO);
        assert_eq!(paced_delay(d, d), Duration::ZERO);
    }

    #[test]
    fn test_runs_to_completion_in_order() {
        let pipeline = pipeline_with_timestamps(&[0, 5, 10, 15]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());
        let (callback, collected) = collecting_callback();

        controller.start(0, callback).unwrap();
        // stop() doubles as "wait for the loop to finish"
        while controller.is_running() {
            std::thread::sleep(Duration::from_millis(5));
        }
        controller.stop();

        let updates = collected.lock().unwrap();
        assert_eq!(overlay_indices(&updates), vec![0, 1, 2, 3]);
        assert_eq!(finished_reason(&updates), Some(StopReason::Completed));
        assert_eq!(controller.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_start_mid_session() {
        let pipeline = pipeline_with_timestamps(&[0, 5, 10, 15]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());
        let (callback, collected) = collecting_callback();

        controller.start(2, callback).unwrap();
        while controller.is_running() {
            std::thread::sleep(Duration::from_millis(5));
        }

        let updates = collected.lock().unwrap();
        assert_eq!(overlay_indices(&updates), vec![2, 3]);
    }

    #[test]
    fn test_second_start_rejected_while_running() {
        let pipeline = pipeline_with_timestamps(&[0, 200, 400, 600]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());
        let (callback, _collected) = collecting_callback();

        controller.start(0, callback.clone()).unwrap();
        let second = controller.start(0, callback);
        assert!(matches!(second, Err(ReplayError::PlaybackBusy)));

        controller.stop();
    }

    #[test]
    fn test_stop_joins_and_halts_promptly() {
        // Long recorded gaps: without an interruptible wait this test
        // would take seconds.
        let pipeline = pipeline_with_timestamps(&[0, 2_000, 4_000, 6_000]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());
        let (callback, collected) = collecting_callback();

        controller.start(0, callback).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let stop_started = Instant::now();
        controller.stop();
        assert!(stop_started.elapsed() < Duration::from_millis(500));
        assert_eq!(controller.state(), PlaybackState::Idle);

        let updates = collected.lock().unwrap();
        // Only the first frame was shown; nothing past the index in
        // progress at cancellation time.
        assert_eq!(overlay_indices(&updates), vec![0]);
        assert_eq!(finished_reason(&updates), Some(StopReason::Cancelled));
    }

    #[test]
    fn test_restart_after_stop() {
        let pipeline = pipeline_with_timestamps(&[0, 1_000, 2_000]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());

        let (callback, _) = collecting_callback();
        controller.start(0, callback).unwrap();
        controller.stop();

        let (callback, collected) = collecting_callback();
        controller.start(1, callback).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        controller.stop();

        let updates = collected.lock().unwrap();
        assert!(overlay_indices(&updates).starts_with(&[1]));
    }

    #[test]
    fn test_out_of_range_start_index() {
        let pipeline = pipeline_with_timestamps(&[0, 10]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());
        let (callback, _) = collecting_callback();
        assert!(matches!(
            controller.start(2, callback),
            Err(ReplayError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_pacing_matches_recorded_cadence() {
        // Two frames 120ms apart: the run should take roughly that long.
        let pipeline = pipeline_with_timestamps(&[0, 120]);
        let mut controller = PlaybackController::new(pipeline, PlaybackConfig::default());
        let (callback, _) = collecting_callback();

        let started = Instant::now();
        controller.start(0, callback).unwrap();
        while controller.is_running() {
            std::thread::sleep(Duration::from_millis(5));
        }
        let elapsed = started.elapsed();
        controller.stop();

        assert!(elapsed >= Duration::from_millis(100), "ran in {elapsed:?}");
    }

    #[test]
    fn test_speed_multiplier_shortens_pacing() {
        let pipeline = pipeline_with_timestamps(&[0, 400, 800]);
        let mut controller =
            PlaybackController::new(pipeline, PlaybackConfig { speed: 100.0 });
        let (callback, collected) = collecting_callback();

        let started = Instant::now();
        controller.start(0, callback).unwrap();
        while controller.is_running() {
            std::thread::sleep(Duration::from_millis(2));
        }
        controller.stop();

        // 800ms of recorded time at 100x collapses to ~8ms of wall time
        assert!(started.elapsed() < Duration::from_millis(300));
        let updates = collected.lock().unwrap();
        assert_eq!(overlay_indices(&updates), vec![0, 1, 2]);
    }
}
