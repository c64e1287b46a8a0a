//! Playback statistics and summary reporting.

use std::time::Duration;

use contracts::StopReason;
use observability::PlaybackMetricsAggregator;

/// Statistics from one playback run
#[derive(Debug, Clone, Default)]
pub struct PlaybackStats {
    /// Total frames displayed
    pub frames_shown: u64,

    /// Frames that carried a projected overlay
    pub frames_with_overlay: u64,

    /// Total wall-clock duration of the run
    pub duration: Duration,

    /// Number of sinks that received overlays
    pub active_sinks: usize,

    /// Why the play loop ended (None when it never reported)
    pub stop_reason: Option<StopReason>,

    /// Aggregated per-overlay metrics
    pub playback_metrics: PlaybackMetricsAggregator,
}

impl PlaybackStats {
    /// Displayed frames per second of wall-clock time
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_shown as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Fraction of frames that carried an overlay, as percentage
    #[allow(dead_code)]
    pub fn overlay_rate(&self) -> f64 {
        if self.frames_shown > 0 {
            self.frames_with_overlay as f64 / self.frames_shown as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Playback Statistics ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames shown: {}", self.frames_shown);
        println!("   ├─ Frames with overlay: {}", self.frames_with_overlay);
        println!("   ├─ FPS: {:.2}", self.fps());
        println!("   ├─ Active sinks: {}", self.active_sinks);
        match self.stop_reason {
            Some(StopReason::Completed) => println!("   └─ Ended: end of session"),
            Some(StopReason::Cancelled) => println!("   └─ Ended: stopped"),
            None => println!("   └─ Ended: (unknown)"),
        }

        let summary = self.playback_metrics.summary();

        println!("\nOverlay Metrics");
        println!("   ├─ Points per overlay: {}", summary.points_per_overlay);
        println!("   ├─ In-bounds ratio: {}", summary.in_bounds_ratio);
        println!("   └─ Step gap (ms): {}", summary.step_gap_ms);

        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps() {
        let stats = PlaybackStats {
            frames_shown: 50,
            duration: Duration::from_secs(5),
            ..Default::default()
        };
        assert!((stats.fps() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlay_rate() {
        let stats = PlaybackStats {
            frames_shown: 10,
            frames_with_overlay: 4,
            ..Default::default()
        };
        assert!((stats.overlay_rate() - 40.0).abs() < 1e-9);

        let empty = PlaybackStats::default();
        assert_eq!(empty.overlay_rate(), 0.0);
    }
}
