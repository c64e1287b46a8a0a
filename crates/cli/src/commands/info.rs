//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Manifest info for JSON output
#[derive(Serialize)]
struct ManifestInfo {
    version: String,
    dataset: DatasetInfo,
    camera: CameraInfo,
    lidar: LidarInfo,
    playback_speed: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sinks: Vec<SinkInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    probe: Option<ProbeInfo>,
}

#[derive(Serialize)]
struct DatasetInfo {
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

#[derive(Serialize)]
struct CameraInfo {
    fx: f64,
    fy: f64,
    cx: f64,
    cy: f64,
    width: u32,
    height: u32,
}

#[derive(Serialize)]
struct LidarInfo {
    location: [f64; 3],
    rotation_deg: [f64; 3],
    point_stride: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    calibration_file: Option<String>,
}

#[derive(Serialize)]
struct SinkInfo {
    name: String,
    sink_type: String,
}

/// Opened-dataset facts (only with --probe)
#[derive(Serialize)]
struct ProbeInfo {
    frame_count: usize,
    scan_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    scan_coverage_us: Option<[u64; 2]>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading manifest info");

    if !args.config.exists() {
        anyhow::bail!("Manifest file not found: {}", args.config.display());
    }

    let manifest = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load manifest from {}", args.config.display()))?;

    let probe = if args.probe {
        Some(probe_dataset(&manifest)?)
    } else {
        None
    };

    if args.json {
        let info = build_manifest_info(&manifest, probe);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize manifest info")?;
        println!("{}", json);
    } else {
        print_manifest_info(&manifest, probe.as_ref());
    }

    Ok(())
}

fn probe_dataset(manifest: &contracts::SessionManifest) -> Result<ProbeInfo> {
    use contracts::{FrameSource, ScanSource};

    let dataset = dataset_loader::open_dataset(manifest).context("Failed to open dataset")?;
    Ok(ProbeInfo {
        frame_count: dataset.frames.len(),
        scan_count: dataset.scans.as_ref().map(|s| s.len()).unwrap_or(0),
        scan_coverage_us: dataset
            .scans
            .as_ref()
            .map(|s| [s.start_time().as_micros(), s.stop_time().as_micros()]),
    })
}

fn build_manifest_info(
    manifest: &contracts::SessionManifest,
    probe: Option<ProbeInfo>,
) -> ManifestInfo {
    let camera = &manifest.camera;
    let lidar = &manifest.lidar;

    ManifestInfo {
        version: format!("{:?}", manifest.version),
        dataset: DatasetInfo {
            kind: format!("{:?}", manifest.dataset.kind),
            path: manifest
                .dataset
                .path
                .as_ref()
                .map(|p| p.display().to_string()),
        },
        camera: CameraInfo {
            fx: camera.fx,
            fy: camera.fy,
            cx: camera.cx,
            cy: camera.cy,
            width: camera.width,
            height: camera.height,
        },
        lidar: LidarInfo {
            location: [
                lidar.pose.location.x,
                lidar.pose.location.y,
                lidar.pose.location.z,
            ],
            rotation_deg: [
                lidar.pose.rotation.pitch,
                lidar.pose.rotation.yaw,
                lidar.pose.rotation.roll,
            ],
            point_stride: lidar.point_stride,
            calibration_file: lidar
                .calibration_file
                .as_ref()
                .map(|p| p.display().to_string()),
        },
        playback_speed: manifest.playback.speed,
        sinks: manifest
            .sinks
            .iter()
            .map(|s| SinkInfo {
                name: s.name.clone(),
                sink_type: format!("{:?}", s.sink_type),
            })
            .collect(),
        probe,
    }
}

fn print_manifest_info(manifest: &contracts::SessionManifest, probe: Option<&ProbeInfo>) {
    println!("\n=== Session Manifest ===\n");

    println!("Dataset");
    println!("   ├─ Version: {:?}", manifest.version);
    println!("   ├─ Kind: {:?}", manifest.dataset.kind);
    match &manifest.dataset.path {
        Some(path) => println!("   └─ Path: {}", path.display()),
        None => println!("   └─ Path: (none)"),
    }

    let camera = &manifest.camera;
    println!("\nCamera");
    println!("   ├─ Resolution: {}x{}", camera.width, camera.height);
    println!("   ├─ Focal: fx={:.3}, fy={:.3}", camera.fx, camera.fy);
    println!("   └─ Principal point: cx={:.3}, cy={:.3}", camera.cx, camera.cy);

    let lidar = &manifest.lidar;
    println!("\nLiDAR");
    println!(
        "   ├─ Mount: x={:.2}m, y={:.2}m, z={:.2}m",
        lidar.pose.location.x, lidar.pose.location.y, lidar.pose.location.z
    );
    println!(
        "   ├─ Rotation: pitch={:.1}°, yaw={:.1}°, roll={:.1}°",
        lidar.pose.rotation.pitch, lidar.pose.rotation.yaw, lidar.pose.rotation.roll
    );
    println!("   ├─ Point stride: {} bytes", lidar.point_stride);
    match &lidar.calibration_file {
        Some(path) => println!("   └─ Calibration file: {}", path.display()),
        None => println!("   └─ Calibration file: (none)"),
    }

    println!("\nPlayback");
    println!("   └─ Speed: {}x", manifest.playback.speed);

    if !manifest.sinks.is_empty() {
        println!("\nSinks ({})", manifest.sinks.len());
        for (i, sink) in manifest.sinks.iter().enumerate() {
            let is_last = i == manifest.sinks.len() - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            println!("   {} {} ({:?})", prefix, sink.name, sink.sink_type);
        }
    }

    if let Some(probe) = probe {
        println!("\nDataset Probe");
        println!("   ├─ Frames: {}", probe.frame_count);
        println!("   ├─ Scans: {}", probe.scan_count);
        match probe.scan_coverage_us {
            Some([start, stop]) => {
                println!(
                    "   └─ Scan coverage: [{:.3}s, {:.3}s)",
                    start as f64 / 1e6,
                    stop as f64 / 1e6
                )
            }
            None => println!("   └─ Scan coverage: (no scans)"),
        }
    }

    println!();
}
