//! Transformation profiles and request matching.
//!
//! # Responsibilities
//! - Bundle a loader, filter chain, encoder and saver per profile
//! - Match an incoming (host, path) to the profile that should serve it
//!
//! # Design Decisions
//! - Profiles are immutable after construction and shared via Arc; the
//!   dispatcher never locks to read them
//! - Matching walks profiles in reverse declaration order: the
//!   last-declared matching profile wins, so generic profiles go first
//!   in the config file and specific overrides after
//! - An unset pattern is a wildcard; host and path combine with AND

use std::sync::Arc;

use regex::Regex;

use crate::encoder::Encoder;
use crate::filter::Filter;
use crate::loader::Loader;
use crate::saver::Saver;

/// An immutable transformation profile.
#[derive(Debug)]
pub struct Profile {
    pub loader: Box<dyn Loader>,
    pub filters: Vec<Box<dyn Filter>>,
    pub encoder: Box<dyn Encoder>,
    pub saver: Box<dyn Saver>,
    host_pattern: Option<Regex>,
    path_pattern: Option<Regex>,
}

impl Profile {
    pub fn new(
        loader: Box<dyn Loader>,
        filters: Vec<Box<dyn Filter>>,
        encoder: Box<dyn Encoder>,
        saver: Box<dyn Saver>,
        host_pattern: Option<Regex>,
        path_pattern: Option<Regex>,
    ) -> Self {
        Self {
            loader,
            filters,
            encoder,
            saver,
            host_pattern,
            path_pattern,
        }
    }

    /// True when both patterns accept the request (unset = wildcard).
    pub fn matches(&self, host: &str, path: &str) -> bool {
        self.host_pattern.as_ref().map_or(true, |p| p.is_match(host))
            && self.path_pattern.as_ref().map_or(true, |p| p.is_match(path))
    }
}

/// Ordered, read-only collection of profiles.
#[derive(Debug, Clone, Default)]
pub struct Profiles {
    inner: Arc<Vec<Arc<Profile>>>,
}

impl Profiles {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            inner: Arc::new(profiles.into_iter().map(Arc::new).collect()),
        }
    }

    /// The last-declared profile matching (host, path), if any.
    pub fn matching(&self, host: &str, path: &str) -> Option<Arc<Profile>> {
        self.inner
            .iter()
            .rev()
            .find(|p| p.matches(host, path))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
