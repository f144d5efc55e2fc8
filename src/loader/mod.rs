//! Source byte fetching.
//!
//! # Responsibilities
//! - Define the `Loader` contract the load stage consumes
//! - Provide filesystem and HTTP origin implementations
//!
//! # Design Decisions
//! - Loaders are async: the HTTP variant does network I/O and the
//!   filesystem variant goes through tokio's blocking pool
//! - An optional regex rewrite maps the request path to the source
//!   location, so the public URL space need not mirror storage layout

pub mod direct;
pub mod http;

pub use direct::Direct;
pub use http::Http;

use async_trait::async_trait;

use crate::error::LoadError;

/// Fetches the raw source bytes for a request key.
#[async_trait]
pub trait Loader: Send + Sync + std::fmt::Debug {
    async fn load(&self, path: &str) -> Result<Vec<u8>, LoadError>;
}

/// Optional path rewrite shared by the loader implementations.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pattern: regex::Regex,
    replace: String,
}

impl Rewrite {
    pub fn new(pattern: regex::Regex, replace: String) -> Self {
        Self { pattern, replace }
    }

    pub fn apply<'a>(&self, path: &'a str) -> std::borrow::Cow<'a, str> {
        self.pattern.replace_all(path, self.replace.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite() {
        let rw = Rewrite::new(
            regex::Regex::new(r"^/img/(\d+)x(\d+)/").unwrap(),
            "/originals/".to_string(),
        );
        assert_eq!(rw.apply("/img/100x100/cat.jpg"), "/originals/cat.jpg");
        assert_eq!(rw.apply("/other/cat.jpg"), "/other/cat.jpg");
    }
}
