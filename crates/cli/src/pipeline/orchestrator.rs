//! Playback orchestrator - coordinates all components.
//!
//! Opens the dataset, spawns the paced play loop, tees its updates into
//! metrics and the sink dispatcher, and handles cooperative shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use contracts::{FrameSource, PlaybackUpdate, ScanSource, SessionManifest};
use dispatcher::create_dispatcher;
use observability::{record_overlay_metrics, record_playback_finished, PlaybackMetricsAggregator};
use playback::{PlaybackController, ReplayPipeline};
use tracing::{info, warn};

use super::PlaybackStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The session manifest
    pub manifest: SessionManifest,

    /// Frame index to start playback from
    pub start_index: usize,

    /// Maximum number of frames to display (None = unlimited)
    pub max_frames: Option<u64>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main playback orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run playback to completion (end of session, frame limit, or Ctrl-C)
    pub async fn run(self) -> Result<PlaybackStats> {
        let start_time = Instant::now();
        let manifest = &self.config.manifest;

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Open dataset
        info!("Opening dataset...");
        let dataset = dataset_loader::open_dataset(manifest).context("Failed to open dataset")?;
        info!(
            frames = dataset.frames.len(),
            scans = dataset.scans.as_ref().map(|s| s.len()).unwrap_or(0),
            "Dataset ready"
        );

        // Build render pipeline and scheduler
        let replay = Arc::new(ReplayPipeline::from_dataset(&dataset));
        let mut controller = PlaybackController::new(replay, manifest.playback);

        // Setup Dispatcher
        info!("Setting up dispatcher...");
        if manifest.sinks.is_empty() {
            warn!("No sinks configured - overlays will be discarded");
        }
        let (sink_tx, sink_rx) = async_channel::unbounded::<PlaybackUpdate>();
        let dispatcher = create_dispatcher(manifest.sinks.clone(), sink_rx)
            .context("Failed to create dispatcher")?;
        let active_sinks = manifest.sinks.len();
        let dispatcher_handle = dispatcher.spawn();
        info!(active_sinks, "Dispatcher started");

        // Start playback
        let (callback, updates) = playback::update_channel();
        controller
            .start(self.config.start_index, callback)
            .context("Failed to start playback")?;
        info!(
            start_index = self.config.start_index,
            speed = manifest.playback.speed,
            max_frames = ?self.config.max_frames,
            "Playback running"
        );

        // Drain updates: aggregate metrics, forward to sinks
        let mut stats = PlaybackStats {
            active_sinks,
            ..Default::default()
        };
        let mut aggregator = PlaybackMetricsAggregator::new();
        let mut last_overlay_at: Option<Instant> = None;
        let mut stop_requested = false;

        let shutdown_signal = setup_shutdown_signal();
        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                update = updates.recv() => {
                    match update {
                        Ok(PlaybackUpdate::Overlay(overlay)) => {
                            record_overlay_metrics(&overlay);
                            aggregator.update(&overlay);
                            if let Some(prev) = last_overlay_at {
                                aggregator.record_step_gap_ms(prev.elapsed().as_secs_f64() * 1000.0);
                            }
                            last_overlay_at = Some(Instant::now());

                            let _ = sink_tx.send(PlaybackUpdate::Overlay(overlay)).await;

                            if let Some(max) = self.config.max_frames {
                                if aggregator.frames_shown >= max && !stop_requested {
                                    info!(frames = aggregator.frames_shown, "Reached max frames limit");
                                    stop_requested = true;
                                    controller.stop();
                                }
                            }
                        }
                        Ok(PlaybackUpdate::Finished(reason)) => {
                            record_playback_finished(reason);
                            stats.stop_reason = Some(reason);
                            let _ = sink_tx.send(PlaybackUpdate::Finished(reason)).await;
                            break;
                        }
                        Err(_) => break,
                    }
                }
                _ = &mut shutdown_signal, if !stop_requested => {
                    warn!("Received shutdown signal, stopping playback...");
                    stop_requested = true;
                    // Joins the loop; its Finished(Cancelled) is already
                    // queued and the drain above will pick it up.
                    controller.stop();
                }
            }
        }

        // Shutdown: loop already terminated, reap it and flush the sinks
        controller.stop();
        drop(sink_tx);
        let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;

        stats.frames_shown = aggregator.frames_shown;
        stats.frames_with_overlay = aggregator.frames_with_overlay;
        stats.playback_metrics = aggregator;
        stats.duration = start_time.elapsed();

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            frames = stats.frames_shown,
            fps = format!("{:.2}", stats.fps()),
            "Playback shutdown complete"
        );

        Ok(stats)
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
