//! `play` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::PlayArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `play` command
pub async fn run_play(args: &PlayArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading manifest");

    // Validate manifest path
    if !args.config.exists() {
        anyhow::bail!("Manifest file not found: {}", args.config.display());
    }

    // Load and parse manifest
    let mut manifest = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load manifest from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(speed) = args.speed {
        if !speed.is_finite() || speed <= 0.0 {
            anyhow::bail!("--speed must be a positive finite number, got {speed}");
        }
        info!(speed, "Overriding playback speed from CLI");
        manifest.playback.speed = speed;
    }

    info!(
        dataset = ?manifest.dataset.kind,
        camera = format!("{}x{}", manifest.camera.width, manifest.camera.height),
        speed = manifest.playback.speed,
        sinks = manifest.sinks.len(),
        "Manifest loaded"
    );

    if manifest.sinks.is_empty() {
        warn!("No sinks configured - overlays will be discarded");
    }

    // Dry run - validate manifest, open the dataset, and exit
    if args.dry_run {
        let dataset =
            dataset_loader::open_dataset(&manifest).context("Failed to open dataset")?;
        info!("Dry run mode - dataset opens cleanly, exiting");
        print_dataset_summary(&dataset);
        return Ok(());
    }

    // Build pipeline configuration
    let pipeline_config = PipelineConfig {
        manifest,
        start_index: args.start_index,
        max_frames: if args.max_frames == 0 {
            None
        } else {
            Some(args.max_frames)
        },
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run the playback pipeline; Ctrl-C handling lives
    // inside so the play loop is always stopped cooperatively.
    info!("Starting playback...");
    let stats = Pipeline::new(pipeline_config)
        .run()
        .await
        .context("Playback execution failed")?;

    stats.print_summary();
    info!("Replay Browser finished");
    Ok(())
}

/// Print dataset summary for dry-run mode
fn print_dataset_summary(dataset: &contracts::ReplayDataset) {
    use contracts::{FrameSource, ScanSource};

    println!("\n=== Dataset Summary ===\n");
    println!("Frames: {}", dataset.frames.len());
    if let (Ok(first), Ok(last)) = (
        dataset.frames.timestamp_at(0),
        dataset
            .frames
            .timestamp_at(dataset.frames.len().saturating_sub(1)),
    ) {
        println!("Session span: {} .. {}", first, last);
    }

    match &dataset.scans {
        Some(scans) => {
            println!("Scans: {}", scans.len());
            println!(
                "Scan coverage: [{}, {})",
                scans.start_time(),
                scans.stop_time()
            );
        }
        None => println!("Scans: none (no overlay will be drawn)"),
    }

    println!(
        "Camera: {}x{} (fx={:.1}, fy={:.1})",
        dataset.rig.intrinsics.width,
        dataset.rig.intrinsics.height,
        dataset.rig.intrinsics.fx,
        dataset.rig.intrinsics.fy
    );
    println!();
}
