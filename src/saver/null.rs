//! Discarding saver.

use async_trait::async_trait;

use crate::error::SaveError;
use crate::saver::Saver;

/// Drops the bytes. For profiles served purely from the in-memory cache.
#[derive(Debug, Default)]
pub struct Null;

#[async_trait]
impl Saver for Null {
    async fn save(&self, _path: &str, _data: &[u8]) -> Result<(), SaveError> {
        Ok(())
    }
}
