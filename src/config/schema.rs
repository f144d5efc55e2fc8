//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! image proxy. All types derive Serde traits for deserialization from
//! config files. The pluggable capabilities (loader, filters, encoder,
//! saver) are internally tagged enums; `build()` turns each into the
//! runtime trait object a profile carries.

use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::loader::ConfigError;
use crate::encoder;
use crate::filter::{self, Gravity};
use crate::loader::{self, Rewrite};
use crate::profile::Profile;
use crate::saver;

/// Root configuration for the image proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Dispatcher pipeline sizing.
    pub dispatcher: DispatcherConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Transformation profiles, in declaration order. Matching walks
    /// them in reverse: declare catch-alls first, overrides after.
    pub profiles: Vec<ProfileConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Pipeline sizing for the request dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Bounded depth of each stage queue (admission control).
    pub queue_depth: usize,

    /// Worker-pool size per stage.
    pub workers: usize,

    /// Result cache capacity (entries).
    pub cache_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_depth: 32,
            workers: 4,
            cache_capacity: 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One transformation profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileConfig {
    /// Host regex; unset matches every host.
    pub host_pattern: Option<String>,

    /// Path regex; unset matches every path.
    pub path_pattern: Option<String>,

    /// Source of raw bytes.
    pub loader: LoaderConfig,

    /// Filter chain, applied in declared order.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,

    /// Output format.
    pub encoder: EncoderConfig,

    /// Persistence backend (default: discard).
    #[serde(default)]
    pub saver: SaverConfig,
}

impl ProfileConfig {
    /// Compile patterns and construct the runtime profile.
    pub fn build(&self) -> Result<Profile, ConfigError> {
        let host_pattern = self.host_pattern.as_deref().map(Regex::new).transpose()?;
        let path_pattern = self.path_pattern.as_deref().map(Regex::new).transpose()?;

        let filters = self
            .filters
            .iter()
            .map(|f| f.build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Profile::new(
            self.loader.build()?,
            filters,
            self.encoder.build(),
            self.saver.build(),
            host_pattern,
            path_pattern,
        ))
    }
}

fn build_rewrite(
    pattern: &Option<String>,
    replace: &Option<String>,
) -> Result<Option<Rewrite>, ConfigError> {
    match pattern {
        Some(p) => Ok(Some(Rewrite::new(
            Regex::new(p)?,
            replace.clone().unwrap_or_default(),
        ))),
        None => Ok(None),
    }
}

/// Loader selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoaderConfig {
    /// Filesystem tree rooted at `dir`.
    Direct {
        dir: PathBuf,
        pattern: Option<String>,
        replace: Option<String>,
    },
    /// HTTP(S) origin.
    Http {
        scheme: String,
        host: String,
        pattern: Option<String>,
        replace: Option<String>,
    },
}

impl LoaderConfig {
    pub fn build(&self) -> Result<Box<dyn loader::Loader>, ConfigError> {
        Ok(match self {
            LoaderConfig::Direct {
                dir,
                pattern,
                replace,
            } => Box::new(loader::Direct::new(
                dir.clone(),
                build_rewrite(pattern, replace)?,
            )),
            LoaderConfig::Http {
                scheme,
                host,
                pattern,
                replace,
            } => Box::new(loader::Http::new(
                scheme.clone(),
                host.clone(),
                build_rewrite(pattern, replace)?,
            )),
        })
    }
}

/// Filter selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    Null,
    Resize {
        #[serde(default)]
        width: u32,
        #[serde(default)]
        height: u32,
    },
    Thumbnail {
        width: u32,
        height: u32,
        #[serde(default)]
        gravity: Gravity,
    },
    Blur {
        sigma: f32,
    },
    Overlay {
        /// Path to the foreground image, loaded once at startup.
        image: PathBuf,
        #[serde(default)]
        gravity: Gravity,
        #[serde(default)]
        padding: u32,
    },
}

impl FilterConfig {
    pub fn build(&self) -> Result<Box<dyn filter::Filter>, ConfigError> {
        Ok(match self {
            FilterConfig::Null => Box::new(filter::Null),
            FilterConfig::Resize { width, height } => {
                Box::new(filter::Resize::new(*width, *height))
            }
            FilterConfig::Thumbnail {
                width,
                height,
                gravity,
            } => Box::new(filter::Thumbnail::new(*width, *height, *gravity)),
            FilterConfig::Blur { sigma } => Box::new(filter::Blur::new(*sigma)),
            FilterConfig::Overlay {
                image,
                gravity,
                padding,
            } => {
                let foreground = image::open(image)
                    .map_err(|e| ConfigError::OverlayImage {
                        path: image.clone(),
                        source: e,
                    })?
                    .into_rgba8();
                Box::new(filter::Overlay::new(foreground, *gravity, *padding))
            }
        })
    }
}

/// Encoder selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EncoderConfig {
    Png,
    Jpeg { quality: u8 },
}

impl EncoderConfig {
    pub fn build(&self) -> Box<dyn encoder::Encoder> {
        match self {
            EncoderConfig::Png => Box::new(encoder::Png),
            EncoderConfig::Jpeg { quality } => Box::new(encoder::Jpeg::new(*quality)),
        }
    }
}

/// Saver selection.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SaverConfig {
    #[default]
    Null,
    Direct {
        dir: PathBuf,
    },
    Hashed {
        dir: PathBuf,
    },
}

impl SaverConfig {
    pub fn build(&self) -> Box<dyn saver::Saver> {
        match self {
            SaverConfig::Null => Box::new(saver::Null),
            SaverConfig::Direct { dir } => Box::new(saver::Direct::new(dir.clone())),
            SaverConfig::Hashed { dir } => Box::new(saver::Hashed::new(dir.clone())),
        }
    }
}
