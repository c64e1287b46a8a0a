//! Manifest parsing
//!
//! Supports TOML (primary) and JSON formats.

use contracts::{ReplayError, SessionManifest};

/// Manifest file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse a TOML manifest
pub fn parse_toml(content: &str) -> Result<SessionManifest, ReplayError> {
    toml::from_str(content).map_err(|e| ReplayError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a JSON manifest
pub fn parse_json(content: &str) -> Result<SessionManifest, ReplayError> {
    serde_json::from_str(content).map_err(|e| ReplayError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse a manifest in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<SessionManifest, ReplayError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DatasetKind;

    #[test]
    fn test_parse_toml_minimal() {
        let content = r#"
[dataset]
kind = "synthetic"

[camera]
fx = 1150.96938467
fy = 1150.96938467
cx = 988.511326762
cy = 692.803953253
width = 1920
height = 1440

[lidar.pose.location]
x = 0.9
y = 0.0
z = -0.6

[lidar.pose.rotation]
pitch = 0.0
yaw = 0.0
roll = 0.0

[[sinks]]
name = "log_sink"
sink_type = "log"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let manifest = result.unwrap();
        assert_eq!(manifest.dataset.kind, DatasetKind::Synthetic);
        assert_eq!(manifest.camera.width, 1920);
        assert_eq!(manifest.sinks.len(), 1);
        // Defaults fill in what the file omits
        assert_eq!(manifest.lidar.point_stride, 16);
        assert_eq!(manifest.playback.speed, 1.0);
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "dataset": { "kind": "directory", "path": "./session" },
            "camera": {
                "fx": 500.0, "fy": 500.0, "cx": 320.0, "cy": 240.0,
                "width": 640, "height": 480
            },
            "lidar": {
                "pose": {
                    "location": { "x": 0.0, "y": 0.0, "z": 0.0 },
                    "rotation": { "pitch": 0.0, "yaw": 0.0, "roll": 0.0 }
                }
            },
            "sinks": [{ "name": "log", "sink_type": "log" }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ReplayError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
