//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool sizes, queue depths, quality)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::{EncoderConfig, ProxyConfig};

/// A single semantic problem in the configuration.
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Check everything serde cannot.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.dispatcher.workers == 0 {
        errors.push(err("dispatcher.workers", "must be at least 1"));
    }
    if config.dispatcher.queue_depth == 0 {
        errors.push(err("dispatcher.queue_depth", "must be at least 1"));
    }
    if config.dispatcher.cache_capacity == 0 {
        errors.push(err("dispatcher.cache_capacity", "must be at least 1"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be at least 1"));
    }

    if config.profiles.is_empty() {
        errors.push(err("profiles", "at least one profile is required"));
    }

    for (i, profile) in config.profiles.iter().enumerate() {
        if let EncoderConfig::Jpeg { quality } = profile.encoder {
            if quality == 0 || quality > 100 {
                errors.push(err(
                    &format!("profiles[{i}].encoder.quality"),
                    "must be in 1..=100",
                ));
            }
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LoaderConfig, ProfileConfig, SaverConfig};

    fn valid_config() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.profiles.push(ProfileConfig {
            host_pattern: None,
            path_pattern: None,
            loader: LoaderConfig::Direct {
                dir: "/srv".into(),
                pattern: None,
                replace: None,
            },
            filters: Vec::new(),
            encoder: EncoderConfig::Png,
            saver: SaverConfig::Null,
        });
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_empty_profiles_rejected() {
        let config = ProxyConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "profiles"));
    }

    #[test]
    fn test_zero_sizing_rejected() {
        let mut config = valid_config();
        config.dispatcher.workers = 0;
        config.dispatcher.cache_capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_bad_jpeg_quality_rejected() {
        let mut config = valid_config();
        config.profiles[0].encoder = EncoderConfig::Jpeg { quality: 0 };
        assert!(validate_config(&config).is_err());
    }
}
