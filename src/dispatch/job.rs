//! The unit of work flowing through the pipeline.

use std::sync::Arc;
use std::time::Duration;

use crate::error::JobError;
use crate::profile::Profile;

/// Named per-stage duration breakdown, recorded for observability only.
///
/// Entries keep insertion order so a log line reads in pipeline order.
#[derive(Debug, Default)]
pub struct Timing {
    entries: Vec<(String, Duration)>,
}

impl Timing {
    pub fn record(&mut self, name: impl Into<String>, duration: Duration) {
        self.entries.push((name.into(), duration));
    }

    pub fn entries(&self) -> &[(String, Duration)] {
        &self.entries
    }
}

impl std::fmt::Display for Timing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (name, duration)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, duration)?;
        }
        Ok(())
    }
}

/// A single cache-miss computation.
///
/// Created at dispatch time, mutated by the load and transform stages
/// while exclusively owned, then frozen behind an `Arc` before the
/// deliver stage fans it out. Every waiter of the key reads the same
/// instance.
#[derive(Debug)]
pub struct Job {
    /// Request path; the cache and coalescing identity.
    pub key: String,

    /// The profile resolved for this request.
    pub profile: Arc<Profile>,

    /// Raw source bytes after load, encoded output bytes after a
    /// successful transform. `None` on failure.
    pub body: Option<Vec<u8>>,

    /// Failure outcome, if any stage failed.
    pub error: Option<JobError>,

    /// Per-stage timing breakdown.
    pub timing: Timing,
}

impl Job {
    pub fn new(key: impl Into<String>, profile: Arc<Profile>) -> Self {
        Self {
            key: key.into(),
            profile,
            body: None,
            error: None,
            timing: Timing::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Convert this job into a failure outcome. Any partial bytes are
    /// dropped so a failed job never carries corrupt output.
    pub fn fail(&mut self, error: JobError) {
        self.body = None;
        self.error = Some(error);
    }
}
