//! HTTP origin loader.

use async_trait::async_trait;

use crate::error::LoadError;
use crate::loader::{Loader, Rewrite};

/// Fetches source bytes from an HTTP(S) origin.
#[derive(Debug)]
pub struct Http {
    client: reqwest::Client,
    scheme: String,
    host: String,
    rewrite: Option<Rewrite>,
}

impl Http {
    pub fn new(scheme: String, host: String, rewrite: Option<Rewrite>) -> Self {
        Self {
            client: reqwest::Client::new(),
            scheme,
            host,
            rewrite,
        }
    }

    fn url(&self, path: &str) -> String {
        let path = match &self.rewrite {
            Some(rw) => rw.apply(path).into_owned(),
            None => path.to_string(),
        };
        format!("{}://{}{}", self.scheme, self.host, path)
    }
}

#[async_trait]
impl Loader for Http {
    async fn load(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        let response = self.client.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let loader = Http::new("https".into(), "origin.example.com".into(), None);
        assert_eq!(
            loader.url("/img/a.jpg"),
            "https://origin.example.com/img/a.jpg"
        );
    }

    #[test]
    fn test_url_with_rewrite() {
        let rw = Rewrite::new(
            regex::Regex::new(r"^/cdn/").unwrap(),
            "/static/".to_string(),
        );
        let loader = Http::new("http".into(), "origin".into(), Some(rw));
        assert_eq!(loader.url("/cdn/a.jpg"), "http://origin/static/a.jpg");
    }
}
