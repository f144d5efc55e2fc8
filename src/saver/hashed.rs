//! Hashed flat-directory saver.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use md5::{Digest, Md5};

use crate::error::SaveError;
use crate::saver::Saver;

/// Writes results into a single directory, naming each file by the
/// url-safe base64 of the md5 of its request key.
///
/// Keeps arbitrary request paths out of the filesystem namespace at the
/// cost of opaque file names.
#[derive(Debug)]
pub struct Hashed {
    dir: PathBuf,
}

impl Hashed {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_path(&self, path: &str) -> PathBuf {
        let digest = Md5::digest(path.as_bytes());
        let name = URL_SAFE_NO_PAD.encode(digest);
        self.dir.join(format!("{name}.png"))
    }
}

#[async_trait]
impl Saver for Hashed {
    async fn save(&self, path: &str, data: &[u8]) -> Result<(), SaveError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.file_path(path), data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_uses_hashed_name() {
        let dir = tempfile::tempdir().unwrap();
        let saver = Hashed::new(dir.path().to_path_buf());

        saver.save("/img/a.png", b"data").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].as_ref().unwrap().file_name();
        let name = name.to_str().unwrap();
        assert!(name.ends_with(".png"));
        // Flat name, no path separators leaked from the key.
        assert!(!name.contains('/'));
    }

    #[tokio::test]
    async fn test_same_key_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let saver = Hashed::new(dir.path().to_path_buf());

        saver.save("/k.png", b"one").await.unwrap();
        saver.save("/k.png", b"two").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
