//! `seek` command implementation.

use anyhow::{Context, Result};
use contracts::PlaybackUpdate;
use dispatcher::create_dispatcher;
use playback::ReplayPipeline;
use tracing::info;

use crate::cli::SeekArgs;

/// Execute the `seek` command: render one frame index and dispatch it.
pub async fn run_seek(args: &SeekArgs) -> Result<()> {
    info!(config = %args.config.display(), index = args.index, "Seeking single frame");

    if !args.config.exists() {
        anyhow::bail!("Manifest file not found: {}", args.config.display());
    }

    let manifest = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load manifest from {}", args.config.display()))?;

    let dataset = dataset_loader::open_dataset(&manifest).context("Failed to open dataset")?;
    let pipeline = ReplayPipeline::from_dataset(&dataset);

    let overlay = pipeline
        .render_frame(args.index)
        .with_context(|| format!("Failed to render frame {}", args.index))?;

    println!("\n=== Frame {} ===", overlay.frame_index);
    println!("Timestamp: {}", overlay.timestamp);
    println!("Elapsed: {:.2}s", overlay.elapsed.as_secs_f64());
    match overlay.scan_index {
        Some(scan_index) => println!(
            "Overlay: scan #{} with {} points ({} in bounds)",
            scan_index,
            overlay.points.len(),
            overlay.in_bounds_count()
        ),
        None => println!("Overlay: none (frame outside scan coverage)"),
    }
    println!();

    // Hand the overlay to the configured sinks, if any
    if !manifest.sinks.is_empty() {
        let (tx, rx) = async_channel::unbounded();
        let dispatcher =
            create_dispatcher(manifest.sinks.clone(), rx).context("Failed to create dispatcher")?;
        let handle = dispatcher.spawn();

        tx.send(PlaybackUpdate::Overlay(overlay))
            .await
            .context("Dispatcher rejected overlay")?;
        drop(tx);

        handle.await.context("Dispatcher worker failed")?;
        info!(sinks = manifest.sinks.len(), "Overlay dispatched");
    }

    Ok(())
}
