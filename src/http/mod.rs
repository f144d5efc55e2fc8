//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → image_handler (host + path → dispatch)
//!     → [dispatcher coalesces, caches, pipelines]
//!     → delivery channel resolves with the finished job
//!     → HTTP response (encoded bytes or error status)
//! ```

pub mod server;

pub use server::HttpServer;
