//! Asynchronous result persistence.
//!
//! # Responsibilities
//! - Define the `Saver` contract the persist stage consumes
//! - Provide discard, mirrored-path and hashed-path implementations
//!
//! # Design Decisions
//! - Persistence is best-effort: the persist stage logs failures and
//!   never feeds them back into the pipeline

pub mod direct;
pub mod hashed;
pub mod null;

pub use direct::Direct;
pub use hashed::Hashed;
pub use null::Null;

use async_trait::async_trait;

use crate::error::SaveError;

/// Writes encoded result bytes to durable storage.
#[async_trait]
pub trait Saver: Send + Sync + std::fmt::Debug {
    async fn save(&self, path: &str, data: &[u8]) -> Result<(), SaveError>;
}
