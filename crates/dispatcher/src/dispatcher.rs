//! Dispatcher - main loop for fan-out to sinks

use async_channel::Receiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use contracts::{OverlayFrame, PlaybackUpdate, SinkConfig, SinkType};

use crate::error::DispatcherError;
use crate::handle::SinkHandle;
use crate::metrics::MetricsSnapshot;
use crate::sinks::{FileSink, LogSink};

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    input_rx: Receiver<PlaybackUpdate>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(config: DispatcherConfig, input_rx: Receiver<PlaybackUpdate>) -> Self {
        Self { config, input_rx }
    }

    /// Build and start the dispatcher
    #[instrument(name = "dispatcher_builder_build", skip(self))]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let handles = Self::initialize_handles(&self.config)?;

        Ok(Dispatcher {
            handles,
            input_rx: self.input_rx,
        })
    }

    #[instrument(
        name = "dispatcher_initialize_handles",
        skip(config),
        fields(sink_count = config.sinks.len())
    )]
    fn initialize_handles(config: &DispatcherConfig) -> Result<Vec<SinkHandle>, DispatcherError> {
        let mut handles = Vec::with_capacity(config.sinks.len());
        for sink_config in &config.sinks {
            handles.push(create_sink_handle(sink_config)?);
        }
        Ok(handles)
    }
}

/// Create a SinkHandle from configuration
#[instrument(
    name = "dispatcher_create_sink_handle",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink_handle(config: &SinkConfig) -> Result<SinkHandle, DispatcherError> {
    match config.sink_type {
        SinkType::Log => {
            let sink = LogSink::new(&config.name);
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
        SinkType::File => {
            let sink = FileSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e.to_string()))?;
            Ok(SinkHandle::spawn(sink, config.queue_capacity))
        }
    }
}

/// The main Dispatcher that fans out overlays to sinks
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
    input_rx: Receiver<PlaybackUpdate>,
}

impl Dispatcher {
    /// Create a dispatcher with custom sink handles (for testing)
    pub fn with_handles(handles: Vec<SinkHandle>, input_rx: Receiver<PlaybackUpdate>) -> Self {
        Self { handles, input_rx }
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.handles
            .iter()
            .map(|h| (h.name().to_string(), h.metrics().snapshot()))
            .collect()
    }

    /// Run the dispatcher main loop
    ///
    /// Consumes playback updates and fans overlays out to all sinks.
    /// Returns when the input channel is closed.
    #[instrument(name = "dispatcher_run", skip(self))]
    pub async fn run(self) {
        info!(sinks = self.handles.len(), "Dispatcher started");

        let mut overlay_count: u64 = 0;

        while let Ok(update) = self.input_rx.recv().await {
            match update {
                PlaybackUpdate::Overlay(overlay) => {
                    overlay_count += 1;
                    self.dispatch_overlay(&overlay);

                    if overlay_count % 100 == 0 {
                        debug!(overlays = overlay_count, "Dispatcher progress");
                    }
                }
                PlaybackUpdate::Finished(reason) => {
                    info!(?reason, "Play loop reported finish");
                }
            }
        }

        info!(
            overlays = overlay_count,
            "Dispatcher input closed, shutting down"
        );

        Self::shutdown_handles(self.handles).await;

        info!("Dispatcher shutdown complete");
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    fn dispatch_overlay(&self, overlay: &OverlayFrame) {
        for handle in &self.handles {
            handle.try_send(overlay.clone());
        }
    }

    async fn shutdown_handles(handles: Vec<SinkHandle>) {
        for handle in handles {
            handle.shutdown().await;
        }
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip(sink_configs, input_rx))]
pub fn create_dispatcher(
    sink_configs: Vec<SinkConfig>,
    input_rx: Receiver<PlaybackUpdate>,
) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        sinks: sink_configs,
    };
    DispatcherBuilder::new(config, input_rx).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use contracts::{ImageData, ImageFormat, StopReason, Timestamp};
    use std::collections::HashMap;
    use std::time::Duration;

    fn make_update(frame_index: usize) -> PlaybackUpdate {
        PlaybackUpdate::Overlay(OverlayFrame {
            frame_index,
            timestamp: Timestamp::from_millis(frame_index as u64 * 100),
            elapsed: Duration::from_millis(frame_index as u64 * 100),
            image: ImageData {
                width: 2,
                height: 2,
                format: ImageFormat::Rgb8,
                data: Bytes::from(vec![0u8; 12]),
            },
            points: Vec::new(),
            scan_index: None,
        })
    }

    #[tokio::test]
    async fn test_dispatcher_fanout() {
        let (input_tx, input_rx) = async_channel::unbounded();

        // Create log sinks for testing
        let sink1 = LogSink::new("sink1");
        let sink2 = LogSink::new("sink2");

        let handles = vec![SinkHandle::spawn(sink1, 10), SinkHandle::spawn(sink2, 10)];

        let dispatcher = Dispatcher::with_handles(handles, input_rx);
        let handle = dispatcher.spawn();

        // Send some overlays plus the terminating event
        for i in 0..5 {
            input_tx.send(make_update(i)).await.unwrap();
        }
        input_tx
            .send(PlaybackUpdate::Finished(StopReason::Completed))
            .await
            .unwrap();

        // Close input channel
        drop(input_tx);

        // Wait for dispatcher to finish
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_create_dispatcher_from_config() {
        let (input_tx, input_rx) = async_channel::unbounded();

        let configs = vec![SinkConfig {
            name: "test_log".to_string(),
            sink_type: SinkType::Log,
            queue_capacity: 50,
            params: HashMap::new(),
        }];

        let dispatcher = create_dispatcher(configs, input_rx).unwrap();
        let handle = dispatcher.spawn();

        input_tx.send(make_update(1)).await.unwrap();

        drop(input_tx);
        handle.await.unwrap();
    }
}
