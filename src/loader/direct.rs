//! Filesystem loader.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::loader::{Loader, Rewrite};

/// Reads source bytes from a directory tree rooted at `dir`.
#[derive(Debug)]
pub struct Direct {
    dir: PathBuf,
    rewrite: Option<Rewrite>,
}

impl Direct {
    pub fn new(dir: PathBuf, rewrite: Option<Rewrite>) -> Self {
        Self { dir, rewrite }
    }

    fn file_path(&self, path: &str) -> PathBuf {
        let path = match &self.rewrite {
            Some(rw) => rw.apply(path).into_owned(),
            None => path.to_string(),
        };
        self.dir.join(path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Loader for Direct {
    async fn load(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        Ok(tokio::fs::read(self.file_path(path)).await?)
    }
}
