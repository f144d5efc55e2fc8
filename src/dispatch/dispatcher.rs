//! The request dispatcher façade.
//!
//! # Responsibilities
//! - Resolve the profile for (host, path); no match fails synchronously
//! - Register every caller as a waiter; admit a key at most once
//! - Answer from cache when possible, else run the staged pipeline
//! - Fan one result out to every waiter of the key
//!
//! # Data Flow
//! ```text
//! dispatch ──▶ load queue ──▶ transform queue ──┬──▶ persist queue
//!     │                                         └──▶ deliver queue
//!     └───────────── cache hit ────────────────────▶ deliver queue
//!
//! deliver: success → cache insert; always → drain waiters
//! ```
//!
//! # Design Decisions
//! - Bounded tokio mpsc queues between stages; a saturated load queue
//!   blocks the dispatching caller (admission control) instead of
//!   growing memory
//! - Worker pools share a stage's receiver behind an async mutex; the
//!   lock is held only across the receive, never across stage work
//! - No cancellation: an admitted job runs to completion even when all
//!   waiters have dropped their receivers; sink sends to gone waiters
//!   are ignored
//! - The cache and the registry are plain instances owned here and
//!   shared by Arc, not process-wide globals

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, Mutex};

use crate::config::DispatcherConfig;
use crate::dispatch::awaiters::AwaiterRegistry;
use crate::dispatch::cache::ResultCache;
use crate::dispatch::job::Job;
use crate::dispatch::stages;
use crate::error::{DispatchError, JobError};
use crate::observability::metrics;
use crate::profile::Profiles;

/// A stage queue receiver shared by that stage's worker pool.
type SharedRx<T> = Arc<Mutex<mpsc::Receiver<T>>>;

fn shared<T>(rx: mpsc::Receiver<T>) -> SharedRx<T> {
    Arc::new(Mutex::new(rx))
}

/// Receive the next message, competing with the other workers of the
/// pool. `None` when the queue is closed and drained.
async fn next<T>(rx: &SharedRx<T>) -> Option<T> {
    rx.lock().await.recv().await
}

/// Coalescing, caching front door to the transformation pipeline.
pub struct Dispatcher {
    profiles: Profiles,
    cache: Arc<ResultCache>,
    awaiters: Arc<AwaiterRegistry>,
    load_tx: mpsc::Sender<Job>,
    deliver_tx: mpsc::Sender<Arc<Job>>,
}

impl Dispatcher {
    /// Build the queues and spawn the per-stage worker pools.
    pub fn start(profiles: Profiles, config: &DispatcherConfig) -> Self {
        let cache = Arc::new(ResultCache::new(config.cache_capacity));
        let awaiters = Arc::new(AwaiterRegistry::new());

        let (load_tx, load_rx) = mpsc::channel::<Job>(config.queue_depth);
        let (transform_tx, transform_rx) = mpsc::channel::<Job>(config.queue_depth);
        let (persist_tx, persist_rx) = mpsc::channel::<Arc<Job>>(config.queue_depth);
        let (deliver_tx, deliver_rx) = mpsc::channel::<Arc<Job>>(config.queue_depth);

        let load_rx = shared(load_rx);
        let transform_rx = shared(transform_rx);
        let persist_rx = shared(persist_rx);
        let deliver_rx = shared(deliver_rx);

        for _ in 0..config.workers {
            tokio::spawn(load_worker(
                load_rx.clone(),
                transform_tx.clone(),
                deliver_tx.clone(),
            ));
            tokio::spawn(transform_worker(
                transform_rx.clone(),
                persist_tx.clone(),
                deliver_tx.clone(),
            ));
            tokio::spawn(persist_worker(persist_rx.clone()));
            tokio::spawn(deliver_worker(
                deliver_rx.clone(),
                cache.clone(),
                awaiters.clone(),
            ));
        }

        tracing::info!(
            workers = config.workers,
            queue_depth = config.queue_depth,
            cache_capacity = config.cache_capacity,
            profiles = profiles.len(),
            "dispatcher started"
        );

        Self {
            profiles,
            cache,
            awaiters,
            load_tx,
            deliver_tx,
        }
    }

    /// Resolve, coalesce and admit one request.
    ///
    /// Returns a receiver that yields exactly one shared job, success
    /// or failure. May block when the admission queue is saturated.
    pub async fn dispatch(
        &self,
        host: &str,
        path: &str,
    ) -> Result<oneshot::Receiver<Arc<Job>>, DispatchError> {
        let profile =
            self.profiles
                .matching(host, path)
                .ok_or_else(|| DispatchError::ProfileNotFound {
                    host: host.to_string(),
                    path: path.to_string(),
                })?;

        let (sink, receiver) = oneshot::channel();

        if self.awaiters.push(path, sink) {
            metrics::record_in_flight(self.awaiters.in_flight());

            let admitted: Result<(), ()> = if let Some(job) = self.cache.get(path) {
                metrics::record_cache_hit();
                tracing::debug!(key = %path, "cache hit");
                // Uniform path: the cached job goes through the same
                // registry drain as a computed one.
                self.deliver_tx.send(job).await.map_err(|_| ())
            } else {
                metrics::record_cache_miss();
                tracing::debug!(key = %path, "cache miss, admitting");
                self.load_tx
                    .send(Job::new(path, profile))
                    .await
                    .map_err(|_| ())
            };

            if admitted.is_err() {
                // Workers are gone; clear the entry so the key is not
                // stuck in flight, then report shutdown.
                while self.awaiters.pop(path).is_some() {}
                return Err(DispatchError::Stopped);
            }
        }

        Ok(receiver)
    }

    /// Cached entry count, for introspection endpoints.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Keys currently being computed.
    pub fn in_flight(&self) -> usize {
        self.awaiters.in_flight()
    }
}

async fn load_worker(
    rx: SharedRx<Job>,
    transform_tx: mpsc::Sender<Job>,
    deliver_tx: mpsc::Sender<Arc<Job>>,
) {
    while let Some(job) = next(&rx).await {
        let job = stages::load(job).await;
        if job.is_success() {
            if transform_tx.send(job).await.is_err() {
                break;
            }
        } else if deliver_tx.send(Arc::new(job)).await.is_err() {
            break;
        }
    }
}

async fn transform_worker(
    rx: SharedRx<Job>,
    persist_tx: mpsc::Sender<Arc<Job>>,
    deliver_tx: mpsc::Sender<Arc<Job>>,
) {
    while let Some(job) = next(&rx).await {
        let key = job.key.clone();
        let profile = job.profile.clone();
        let job = match tokio::task::spawn_blocking(move || stages::transform(job)).await {
            Ok(job) => job,
            Err(e) => {
                // A panicking transform took the job with it. Deliver a
                // failure in its place so the key's waiters drain and
                // the key leaves the in-flight state.
                tracing::error!(key = %key, error = %e, "transform task failed");
                let mut failed = Job::new(key, profile);
                failed.fail(JobError::Transform(e.to_string()));
                failed
            }
        };

        let job = Arc::new(job);
        if job.is_success() && persist_tx.send(job.clone()).await.is_err() {
            break;
        }
        if deliver_tx.send(job).await.is_err() {
            break;
        }
    }
}

async fn persist_worker(rx: SharedRx<Arc<Job>>) {
    while let Some(job) = next(&rx).await {
        stages::persist(&job).await;
    }
}

async fn deliver_worker(
    rx: SharedRx<Arc<Job>>,
    cache: Arc<ResultCache>,
    awaiters: Arc<AwaiterRegistry>,
) {
    while let Some(job) = next(&rx).await {
        if job.is_success() {
            cache.set(job.key.clone(), job.clone());
            metrics::record_cache_size(cache.len());
        }

        let mut delivered = 0usize;
        while let Some(sink) = awaiters.pop(&job.key) {
            // A waiter may have dropped its receiver; the computation
            // completes regardless.
            let _ = sink.send(job.clone());
            delivered += 1;
        }

        metrics::record_job_outcome(job.is_success());
        metrics::record_in_flight(awaiters.in_flight());
        tracing::debug!(
            key = %job.key,
            success = job.is_success(),
            waiters = delivered,
            timing = %job.timing,
            "delivered"
        );
    }
}
