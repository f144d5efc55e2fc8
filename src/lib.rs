//! On-demand image transformation proxy library.

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod http;
pub mod loader;
pub mod observability;
pub mod profile;
pub mod saver;

pub use config::schema::ProxyConfig;
pub use dispatch::Dispatcher;
pub use http::HttpServer;
