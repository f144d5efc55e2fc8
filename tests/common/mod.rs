//! Shared fixtures for the integration tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use image_proxy::config::DispatcherConfig;
use image_proxy::dispatch::Dispatcher;
use image_proxy::encoder::Png;
use image_proxy::error::{FilterError, LoadError};
use image_proxy::filter::Filter;
use image_proxy::loader::Loader;
use image_proxy::profile::{Profile, Profiles};
use image_proxy::saver::{self, Saver};

/// An opaque solid-color PNG of the given dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// In-memory loader that counts invocations and simulates latency.
///
/// The invocation counter is the coalescing observable: N concurrent
/// requests for one key must produce exactly one load.
#[derive(Debug)]
pub struct CountingLoader {
    images: HashMap<String, Vec<u8>>,
    delay: Duration,
    loads: Arc<AtomicUsize>,
}

impl CountingLoader {
    pub fn new(images: HashMap<String, Vec<u8>>, delay: Duration) -> (Self, Arc<AtomicUsize>) {
        let loads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                images,
                delay,
                loads: loads.clone(),
            },
            loads,
        )
    }

    pub fn single(path: &str, bytes: Vec<u8>, delay: Duration) -> (Self, Arc<AtomicUsize>) {
        let mut images = HashMap::new();
        images.insert(path.to_string(), bytes);
        Self::new(images, delay)
    }
}

#[async_trait]
impl Loader for CountingLoader {
    async fn load(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.images.get(path).cloned().ok_or_else(|| {
            LoadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no fixture for {path}"),
            ))
        })
    }
}

/// Filter that rejects every image it sees.
#[derive(Debug)]
#[allow(dead_code)]
pub struct Rejecting;

impl Filter for Rejecting {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn apply(
        &self,
        _img: image::DynamicImage,
    ) -> Result<image::DynamicImage, FilterError> {
        Err(FilterError::Other("rejected by fixture".to_string()))
    }
}

/// Filter that panics instead of returning.
#[derive(Debug)]
#[allow(dead_code)]
pub struct Panicking;

impl Filter for Panicking {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn apply(
        &self,
        _img: image::DynamicImage,
    ) -> Result<image::DynamicImage, FilterError> {
        panic!("filter blew up");
    }
}

/// Wildcard profile around the given loader and filter chain, PNG
/// output, no persistence.
pub fn profile_with(loader: Box<dyn Loader>, filters: Vec<Box<dyn Filter>>) -> Profile {
    Profile::new(loader, filters, Box::new(Png), Box::new(saver::Null), None, None)
}

/// Wildcard profile with an explicit saver.
#[allow(dead_code)]
pub fn profile_with_saver(loader: Box<dyn Loader>, saver: Box<dyn Saver>) -> Profile {
    Profile::new(loader, Vec::new(), Box::new(Png), saver, None, None)
}

/// Small dispatcher suitable for tests.
pub fn dispatcher(profiles: Vec<Profile>, cache_capacity: usize) -> Dispatcher {
    Dispatcher::start(
        Profiles::new(profiles),
        &DispatcherConfig {
            queue_depth: 8,
            workers: 2,
            cache_capacity,
        },
    )
}
