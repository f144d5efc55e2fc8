//! The request dispatcher: coalescing, caching, staged pipeline.
//!
//! # Data Flow
//! ```text
//! caller ──▶ Dispatcher::dispatch
//!     │  profile match (no match → synchronous error)
//!     │  waiter registry push
//!     │      not first → wait on sink
//!     │      first, cache hit → deliver queue (drain only)
//!     │      first, cache miss → load queue
//!     ▼
//! load ──▶ transform ──┬──▶ persist (fire-and-forget)
//!                      └──▶ deliver ──▶ cache insert + waiter drain
//! ```
//!
//! # Design Decisions
//! - At most one computation in flight per key (waiter registry)
//! - Only successful jobs enter the cache; failures are delivered to
//!   the waiters of that window and forgotten
//! - The cache and registry each have their own mutex with O(1)
//!   critical sections; no lock is held across I/O or a queue await

pub mod awaiters;
pub mod cache;
pub mod dispatcher;
pub mod job;
mod stages;

pub use awaiters::AwaiterRegistry;
pub use cache::ResultCache;
pub use dispatcher::Dispatcher;
pub use job::Job;
