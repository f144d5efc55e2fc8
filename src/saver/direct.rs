//! Mirrored-path saver.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::SaveError;
use crate::saver::Saver;

/// Writes results under `dir`, mirroring the request path so a plain
/// file server can answer subsequent requests directly.
#[derive(Debug)]
pub struct Direct {
    dir: PathBuf,
}

impl Direct {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_path(&self, path: &str) -> PathBuf {
        self.dir.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Saver for Direct {
    async fn save(&self, path: &str, data: &[u8]) -> Result<(), SaveError> {
        let file_path = self.file_path(path);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(file_path, data).await?;
        Ok(())
    }
}
