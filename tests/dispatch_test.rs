//! Dispatcher behavior: coalescing, caching, eviction and failure
//! isolation, observed through the public `dispatch` surface.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{dispatcher, png_bytes, profile_with, CountingLoader, Panicking, Rejecting};
use image_proxy::error::{DispatchError, JobError};
use image_proxy::filter::Resize;

#[tokio::test]
async fn test_concurrent_requests_coalesce_to_one_load() {
    let (loader, loads) =
        CountingLoader::single("/cat.png", png_bytes(10, 10), Duration::from_millis(100));
    let d = dispatcher(vec![profile_with(Box::new(loader), Vec::new())], 16);

    let mut receivers = Vec::new();
    for _ in 0..8 {
        receivers.push(d.dispatch("host", "/cat.png").await.unwrap());
    }

    let mut jobs = Vec::new();
    for rx in receivers {
        jobs.push(rx.await.unwrap());
    }

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    for job in &jobs {
        assert!(job.is_success());
        // Every waiter observes the same shared result.
        assert!(Arc::ptr_eq(job, &jobs[0]));
    }
    assert_eq!(d.cache_len(), 1);
    assert_eq!(d.in_flight(), 0);
}

#[tokio::test]
async fn test_cache_hit_skips_load() {
    let (loader, loads) =
        CountingLoader::single("/cat.png", png_bytes(10, 10), Duration::from_millis(1));
    let d = dispatcher(vec![profile_with(Box::new(loader), Vec::new())], 16);

    let first = d.dispatch("host", "/cat.png").await.unwrap().await.unwrap();
    let second = d.dispatch("host", "/cat.png").await.unwrap().await.unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_capacity_eviction_recomputes_oldest() {
    let mut images = std::collections::HashMap::new();
    images.insert("/a.png".to_string(), png_bytes(4, 4));
    images.insert("/b.png".to_string(), png_bytes(4, 4));
    images.insert("/c.png".to_string(), png_bytes(4, 4));
    let (loader, loads) = CountingLoader::new(images, Duration::from_millis(1));
    let d = dispatcher(vec![profile_with(Box::new(loader), Vec::new())], 2);

    // Awaiting each delivery guarantees the cache insert happened.
    for key in ["/a.png", "/b.png", "/c.png"] {
        d.dispatch("host", key).await.unwrap().await.unwrap();
    }
    assert_eq!(loads.load(Ordering::SeqCst), 3);
    assert_eq!(d.cache_len(), 2);

    // "/c.png" evicted the oldest entry "/a.png"; asking for it again
    // is a miss while "/b.png" is still answered from cache.
    d.dispatch("host", "/b.png").await.unwrap().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 3);

    d.dispatch("host", "/a.png").await.unwrap().await.unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let (loader, loads) =
        CountingLoader::single("/exists.png", png_bytes(4, 4), Duration::from_millis(1));
    let d = dispatcher(vec![profile_with(Box::new(loader), Vec::new())], 16);

    let failed = d
        .dispatch("host", "/missing.png")
        .await
        .unwrap()
        .await
        .unwrap();
    assert!(matches!(failed.error, Some(JobError::Load(_))));
    assert!(failed.body.is_none());
    assert_eq!(d.cache_len(), 0);

    // The same key is recomputed, not served from cache.
    d.dispatch("host", "/missing.png")
        .await
        .unwrap()
        .await
        .unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failure_does_not_affect_other_keys() {
    let (loader, _) =
        CountingLoader::single("/ok.png", png_bytes(4, 4), Duration::from_millis(1));
    let d = dispatcher(vec![profile_with(Box::new(loader), Vec::new())], 16);

    let failed = d
        .dispatch("host", "/gone.png")
        .await
        .unwrap()
        .await
        .unwrap();
    assert!(!failed.is_success());

    let ok = d.dispatch("host", "/ok.png").await.unwrap().await.unwrap();
    assert!(ok.is_success());
    assert_eq!(d.cache_len(), 1);
}

#[tokio::test]
async fn test_filter_rejection_delivered_to_all_waiters() {
    let (loader, _) =
        CountingLoader::single("/cat.png", png_bytes(10, 10), Duration::from_millis(50));
    let d = dispatcher(
        vec![profile_with(Box::new(loader), vec![Box::new(Rejecting)])],
        16,
    );

    let rx1 = d.dispatch("host", "/cat.png").await.unwrap();
    let rx2 = d.dispatch("host", "/cat.png").await.unwrap();

    let job1 = rx1.await.unwrap();
    let job2 = rx2.await.unwrap();

    assert!(Arc::ptr_eq(&job1, &job2));
    assert!(matches!(
        job1.error,
        Some(JobError::Filter {
            name: "rejecting",
            ..
        })
    ));
    assert_eq!(d.cache_len(), 0);
}

#[tokio::test]
async fn test_panicking_filter_delivers_failure_and_frees_key() {
    let (loader, loads) =
        CountingLoader::single("/cat.png", png_bytes(10, 10), Duration::from_millis(1));
    let d = dispatcher(
        vec![profile_with(Box::new(loader), vec![Box::new(Panicking)])],
        16,
    );

    let rx = d.dispatch("host", "/cat.png").await.unwrap();
    let job = tokio::time::timeout(Duration::from_secs(2), rx)
        .await
        .expect("waiter must not hang on a panicked transform")
        .unwrap();

    assert!(matches!(job.error, Some(JobError::Transform(_))));
    assert!(job.body.is_none());
    assert_eq!(d.cache_len(), 0);
    assert_eq!(d.in_flight(), 0);

    // The key is idle again: a fresh dispatch restarts the computation.
    let rx = d.dispatch("host", "/cat.png").await.unwrap();
    let job = tokio::time::timeout(Duration::from_secs(2), rx)
        .await
        .expect("second dispatch must complete")
        .unwrap();
    assert!(!job.is_success());
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unmatched_request_rejected() {
    let (loader, _) = CountingLoader::single("/a.png", png_bytes(4, 4), Duration::ZERO);
    let profile = image_proxy::profile::Profile::new(
        Box::new(loader),
        Vec::new(),
        Box::new(image_proxy::encoder::Png),
        Box::new(image_proxy::saver::Null),
        None,
        Some(regex::Regex::new("^/images/").unwrap()),
    );
    let d = dispatcher(vec![profile], 16);

    let err = d.dispatch("host", "/other/a.png").await.unwrap_err();
    assert!(matches!(err, DispatchError::ProfileNotFound { .. }));
    assert_eq!(d.in_flight(), 0);
}

#[tokio::test]
async fn test_resize_profile_end_to_end() {
    let (loader, loads) =
        CountingLoader::single("/big.png", png_bytes(100, 100), Duration::from_millis(50));
    let d = dispatcher(
        vec![profile_with(Box::new(loader), vec![Box::new(Resize::new(50, 50))])],
        16,
    );

    let rx1 = d.dispatch("host", "/big.png").await.unwrap();
    let rx2 = d.dispatch("host", "/big.png").await.unwrap();

    let job1 = rx1.await.unwrap();
    let job2 = rx2.await.unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(job1.is_success());
    assert_eq!(job1.body, job2.body);

    let out = image::load_from_memory(job1.body.as_ref().unwrap()).unwrap();
    assert_eq!((out.width(), out.height()), (50, 50));

    // Delivery records the full stage breakdown.
    let stages: Vec<&str> = job1
        .timing
        .entries()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert!(stages.contains(&"load"));
    assert!(stages.contains(&"transform:resize"));
}
