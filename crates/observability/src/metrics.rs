//! Playback metrics collection
//!
//! Records and aggregates per-overlay statistics of a replay run.

use contracts::{OverlayFrame, StopReason};
use metrics::{counter, gauge, histogram};

/// Record metrics for one displayed overlay
///
/// Call once per `OverlayFrame` the pipeline delivers.
pub fn record_overlay_metrics(overlay: &OverlayFrame) {
    counter!("replay_browser_overlays_total").increment(1);

    // Frame index (detects stalls and restarts)
    gauge!("replay_browser_last_frame_index").set(overlay.frame_index as f64);

    // Session progress in recorded time
    gauge!("replay_browser_elapsed_seconds").set(overlay.elapsed.as_secs_f64());

    let total = overlay.points.len();
    histogram!("replay_browser_overlay_points").record(total as f64);

    if total > 0 {
        let ratio = overlay.in_bounds_count() as f64 / total as f64;
        histogram!("replay_browser_in_bounds_ratio").record(ratio);
    } else {
        counter!("replay_browser_empty_overlays_total").increment(1);
    }
}

/// Record the end of a play loop
pub fn record_playback_finished(reason: StopReason) {
    let label = match reason {
        StopReason::Completed => "completed",
        StopReason::Cancelled => "cancelled",
    };
    counter!("replay_browser_runs_total", "reason" => label).increment(1);
}

/// Record an overlay handed to a sink
pub fn record_sink_dispatch(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "dropped" };
    counter!(
        "replay_browser_sink_dispatch_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Playback metrics aggregator
///
/// Aggregates in memory for the end-of-run summary the CLI prints.
#[derive(Debug, Clone, Default)]
pub struct PlaybackMetricsAggregator {
    /// Total overlays displayed
    pub frames_shown: u64,

    /// Overlays that actually carried points
    pub frames_with_overlay: u64,

    /// Points-per-overlay statistics
    pub points_stats: RunningStats,

    /// In-bounds ratio statistics (only overlays with points)
    pub in_bounds_stats: RunningStats,

    /// Wall-clock gap between consecutive overlays (ms), fed by the caller
    pub step_gap_stats: RunningStats,
}

impl PlaybackMetricsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one displayed overlay into the aggregate
    pub fn update(&mut self, overlay: &OverlayFrame) {
        self.frames_shown += 1;

        let total = overlay.points.len();
        self.points_stats.push(total as f64);

        if total > 0 {
            self.frames_with_overlay += 1;
            self.in_bounds_stats
                .push(overlay.in_bounds_count() as f64 / total as f64);
        }
    }

    /// Record the wall-clock gap since the previous overlay
    pub fn record_step_gap_ms(&mut self, gap_ms: f64) {
        self.step_gap_stats.push(gap_ms);
    }

    /// Produce the summary report
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            frames_shown: self.frames_shown,
            frames_with_overlay: self.frames_with_overlay,
            overlay_rate: if self.frames_shown > 0 {
                self.frames_with_overlay as f64 / self.frames_shown as f64 * 100.0
            } else {
                0.0
            },
            points_per_overlay: StatsSummary::from(&self.points_stats),
            in_bounds_ratio: StatsSummary::from(&self.in_bounds_stats),
            step_gap_ms: StatsSummary::from(&self.step_gap_stats),
        }
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Summary of one replay run
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub frames_shown: u64,
    pub frames_with_overlay: u64,
    pub overlay_rate: f64,
    pub points_per_overlay: StatsSummary,
    pub in_bounds_ratio: StatsSummary,
    pub step_gap_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Playback Summary ===")?;
        writeln!(f, "Frames shown: {}", self.frames_shown)?;
        writeln!(
            f,
            "Frames with overlay: {} ({:.2}%)",
            self.frames_with_overlay, self.overlay_rate
        )?;
        writeln!(f, "Points per overlay: {}", self.points_per_overlay)?;
        writeln!(f, "In-bounds ratio: {}", self.in_bounds_ratio)?;
        writeln!(f, "Step gap (ms): {}", self.step_gap_ms)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics calculator (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a value
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Number of samples
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Minimum value
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum value
    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{ImageData, ImageFormat, ProjectedPoint, Timestamp};
    use std::time::Duration;

    fn make_overlay(points: Vec<ProjectedPoint>) -> OverlayFrame {
        OverlayFrame {
            frame_index: 0,
            timestamp: Timestamp::from_millis(0),
            elapsed: Duration::ZERO,
            image: ImageData {
                width: 2,
                height: 2,
                format: ImageFormat::Rgb8,
                data: Bytes::from(vec![0u8; 12]),
            },
            points,
            scan_index: None,
        }
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_update() {
        let mut aggregator = PlaybackMetricsAggregator::new();

        aggregator.update(&make_overlay(vec![
            ProjectedPoint { x: 1.0, y: 1.0, in_bounds: true },
            ProjectedPoint { x: -1.0, y: 1.0, in_bounds: false },
        ]));
        aggregator.update(&make_overlay(Vec::new()));

        assert_eq!(aggregator.frames_shown, 2);
        assert_eq!(aggregator.frames_with_overlay, 1);
        assert!((aggregator.in_bounds_stats.mean() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let mut aggregator = PlaybackMetricsAggregator::new();
        aggregator.update(&make_overlay(vec![ProjectedPoint {
            x: 1.0,
            y: 1.0,
            in_bounds: true,
        }]));
        aggregator.record_step_gap_ms(100.0);

        let output = format!("{}", aggregator.summary());
        assert!(output.contains("Frames shown: 1"));
        assert!(output.contains("100.00%"));
        assert!(output.contains("Step gap"));
    }

    #[test]
    fn test_reset() {
        let mut aggregator = PlaybackMetricsAggregator::new();
        aggregator.update(&make_overlay(Vec::new()));
        aggregator.reset();
        assert_eq!(aggregator.frames_shown, 0);
    }
}
