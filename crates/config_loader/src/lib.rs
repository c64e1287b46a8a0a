//! # Config Loader
//!
//! Session manifest loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON manifest files
//! - Validate manifest legality
//! - Produce a typed `SessionManifest`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let manifest = ConfigLoader::load_from_path(Path::new("session.toml")).unwrap();
//! println!("camera: {}x{}", manifest.camera.width, manifest.camera.height);
//! ```

mod parser;
mod validator;

pub use contracts::SessionManifest;
pub use parser::ConfigFormat;

use contracts::ReplayError;
use std::path::Path;

/// Manifest loader
///
/// Provides static methods to load manifests from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load manifest from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<SessionManifest, ReplayError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load manifest from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SessionManifest, ReplayError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize SessionManifest to TOML string
    pub fn to_toml(manifest: &SessionManifest) -> Result<String, ReplayError> {
        toml::to_string_pretty(manifest)
            .map_err(|e| ReplayError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize SessionManifest to JSON string
    pub fn to_json(manifest: &SessionManifest) -> Result<String, ReplayError> {
        serde_json::to_string_pretty(manifest)
            .map_err(|e| ReplayError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer manifest format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ReplayError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ReplayError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ReplayError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read manifest file content
    fn read_file(path: &Path) -> Result<String, ReplayError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate manifest content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SessionManifest, ReplayError> {
        let manifest = parser::parse(content, format)?;
        validator::validate(&manifest)?;
        Ok(manifest)
    }
}
