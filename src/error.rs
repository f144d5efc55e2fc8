//! Error definitions shared across the pipeline.
//!
//! # Taxonomy
//! - `DispatchError`: surfaced synchronously by `dispatch` (no pipeline
//!   involvement, no waiter registered)
//! - `JobError`: carried inside a failed job and delivered identically
//!   to every waiter of that key; never cached
//! - `SaveError`: absorbed at the persist stage (logged, never surfaced)
//! - `ConfigError`: startup-time configuration failures

use thiserror::Error;

/// Errors returned directly from `Dispatcher::dispatch`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No profile's host/path patterns match the request.
    #[error("no profile matches host \"{host}\" path \"{path}\"")]
    ProfileNotFound { host: String, path: String },

    /// The pipeline queues are closed (workers stopped).
    #[error("dispatcher is shut down")]
    Stopped,
}

/// Failure outcome of an in-flight job.
///
/// Exactly one of these converts a job into a failure; the failed job is
/// routed straight to the deliver stage and is never cached.
#[derive(Debug, Error)]
pub enum JobError {
    /// Source fetch failed.
    #[error("load failed: {0}")]
    Load(String),

    /// Source bytes are not a decodable image.
    #[error("decode failed: {0}")]
    Decode(String),

    /// A filter in the chain rejected or could not process the image.
    #[error("filter \"{name}\" failed: {reason}")]
    Filter { name: &'static str, reason: String },

    /// The transform task aborted (panicked) before producing an outcome.
    #[error("transform aborted: {0}")]
    Transform(String),

    /// The transformed image could not be serialized.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Persistence failure. Logged at the persist stage and otherwise ignored.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Source fetch failure, converted into `JobError::Load` by the load stage.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("origin returned status {0}")]
    Status(u16),
}

/// Filter failure.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("{0}")]
    Other(String),
}

/// Encoder failure.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{0}")]
    Image(#[from] image::ImageError),
}
