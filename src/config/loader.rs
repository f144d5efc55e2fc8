//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::profile::Profiles;

/// Error type for configuration loading and profile construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("\"{0}\" has an unsupported extension (expected .toml or .json)")]
    UnsupportedExtension(PathBuf),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("overlay image \"{path}\" could not be loaded: {source}")]
    OverlayImage {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("validation failed: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;

    let config: ProxyConfig = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => return Err(ConfigError::UnsupportedExtension(path.to_path_buf())),
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the runtime profile collection from a validated config.
pub fn build_profiles(config: &ProxyConfig) -> Result<Profiles, ConfigError> {
    let profiles = config
        .profiles
        .iter()
        .map(|p| p.build())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Profiles::new(profiles))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [[profiles]]

        [profiles.loader]
        type = "direct"
        dir = "/srv/images"

        [profiles.encoder]
        type = "png"
    "#;

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let config = load_config(&path).unwrap();
        let profiles = build_profiles(&config).unwrap();
        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "profiles": [{
                    "loader": { "type": "direct", "dir": "/srv/images" },
                    "encoder": { "type": "png" }
                }]
            }"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.profiles.len(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_invalid_config_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "profiles = []").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }
}
