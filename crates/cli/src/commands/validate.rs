//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{DatasetKind, SinkType};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ManifestSummary>,
}

#[derive(Serialize)]
struct ManifestSummary {
    version: String,
    dataset_kind: String,
    camera_resolution: String,
    playback_speed: f64,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating manifest");

    let result = validate_manifest(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Manifest validation failed")
    }
}

fn validate_manifest(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(manifest) => {
            let warnings = collect_warnings(&manifest);

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ManifestSummary {
                    version: format!("{:?}", manifest.version),
                    dataset_kind: format!("{:?}", manifest.dataset.kind),
                    camera_resolution: format!(
                        "{}x{}",
                        manifest.camera.width, manifest.camera.height
                    ),
                    playback_speed: manifest.playback.speed,
                    sink_count: manifest.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect manifest warnings (non-fatal issues)
fn collect_warnings(manifest: &contracts::SessionManifest) -> Vec<String> {
    let mut warnings = Vec::new();

    // Check for empty sinks
    if manifest.sinks.is_empty() {
        warnings.push("No sinks configured - overlays will be discarded".to_string());
    }

    // Synthetic datasets ignore a configured path
    if manifest.dataset.kind == DatasetKind::Synthetic && manifest.dataset.path.is_some() {
        warnings.push("dataset.path is ignored for synthetic datasets".to_string());
    }

    // A calibration file that is not on disk fails later, at open time
    if let Some(ref path) = manifest.lidar.calibration_file {
        if !path.exists() {
            warnings.push(format!(
                "lidar.calibration_file '{}' does not exist",
                path.display()
            ));
        }
    }

    // File sinks without a base_path fall back to ./output
    for sink in &manifest.sinks {
        if sink.sink_type == SinkType::File && !sink.params.contains_key("base_path") {
            warnings.push(format!(
                "Sink '{}' has no base_path - defaulting to ./output",
                sink.name
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Manifest is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Dataset: {}", summary.dataset_kind);
            println!("  Camera: {}", summary.camera_resolution);
            println!("  Playback speed: {}x", summary.playback_speed);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Manifest is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
