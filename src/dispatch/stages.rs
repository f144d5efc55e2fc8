//! Bodies of the four pipeline stages.
//!
//! # Responsibilities
//! - load: fetch raw source bytes via the profile's loader
//! - transform: decode, orient, run the filter chain, encode
//! - persist: write the encoded bytes via the profile's saver
//!
//! The deliver stage lives in `dispatcher.rs` because it needs the
//! cache and the waiter registry; the bodies here only need the job.
//!
//! # Design Decisions
//! - Each body takes the job by value and returns it with either the
//!   next stage's input or a failure outcome set; routing between
//!   queues is the worker loop's job
//! - `transform` is synchronous and CPU-bound; the worker runs it under
//!   `spawn_blocking` so decode/filter/encode never stall the runtime
//! - Sub-step durations land in the job's timing breakdown and in the
//!   stage histograms

use std::time::Instant;

use crate::codec;
use crate::dispatch::job::Job;
use crate::error::JobError;
use crate::observability::metrics;

/// Load stage: fetch source bytes for the key.
pub(crate) async fn load(mut job: Job) -> Job {
    let profile = job.profile.clone();
    let started = Instant::now();

    let result = profile.loader.load(&job.key).await;
    let elapsed = started.elapsed();
    job.timing.record("load", elapsed);
    metrics::record_stage_duration("load", elapsed);

    match result {
        Ok(bytes) => job.body = Some(bytes),
        Err(e) => job.fail(JobError::Load(e.to_string())),
    }

    job
}

/// Transform stage: decode, best-effort orientation fix, filter chain
/// in declared order, encode.
pub(crate) fn transform(mut job: Job) -> Job {
    let profile = job.profile.clone();
    let stage_started = Instant::now();

    let Some(raw) = job.body.take() else {
        job.fail(JobError::Decode("no source bytes".into()));
        return job;
    };

    let started = Instant::now();
    let decoded = codec::decode(&raw);
    job.timing.record("transform:decode", started.elapsed());

    let mut img = match decoded {
        Ok(img) => img,
        Err(e) => {
            job.fail(e);
            return job;
        }
    };

    // Orientation correction is best-effort: unreadable metadata skips
    // it without failing the job.
    let started = Instant::now();
    img = codec::apply_orientation(img, codec::read_orientation(&raw));
    job.timing.record("transform:orient", started.elapsed());
    drop(raw);

    for filter in &profile.filters {
        let started = Instant::now();
        let result = filter.apply(img);
        job.timing
            .record(format!("transform:{}", filter.name()), started.elapsed());

        match result {
            Ok(out) => img = out,
            Err(e) => {
                job.fail(JobError::Filter {
                    name: filter.name(),
                    reason: e.to_string(),
                });
                return job;
            }
        }
    }

    let started = Instant::now();
    let encoded = profile.encoder.encode(&img);
    job.timing.record("transform:encode", started.elapsed());
    metrics::record_stage_duration("transform", stage_started.elapsed());

    match encoded {
        Ok(bytes) => job.body = Some(bytes),
        Err(e) => job.fail(JobError::Encode(e.to_string())),
    }

    job
}

/// Persist stage: best-effort write. Failures are logged and absorbed;
/// they never convert a delivered success into a failure.
pub(crate) async fn persist(job: &Job) {
    let Some(bytes) = job.body.as_deref() else {
        return;
    };

    let started = Instant::now();
    match job.profile.saver.save(&job.key, bytes).await {
        Ok(()) => {
            metrics::record_stage_duration("persist", started.elapsed());
        }
        Err(e) => {
            metrics::record_persist_failure();
            tracing::warn!(key = %job.key, error = %e, "persist failed, result still delivered");
        }
    }
}
