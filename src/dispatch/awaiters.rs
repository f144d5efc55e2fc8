//! Waiter registry: coalesces concurrent requests for one key.
//!
//! # Responsibilities
//! - Track, per in-flight key, the ordered sinks awaiting its result
//! - Tell the first caller of a key that admission is its job
//!
//! # Design Decisions
//! - A key is present in the map iff a computation for it is in flight;
//!   the drained list is removed outright, never left empty, so the
//!   in-flight check is a plain membership test
//! - Own mutex, separate from the cache's; O(1) critical sections
//!   (append / pop-front), no I/O under the lock

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::dispatch::job::Job;

/// One caller's delivery channel. Completed with the shared job exactly
/// once; dropping the sender after send closes it.
pub type Sink = oneshot::Sender<Arc<Job>>;

/// Key -> FIFO list of sinks awaiting the in-flight computation.
#[derive(Default)]
pub struct AwaiterRegistry {
    inner: Mutex<HashMap<String, VecDeque<Sink>>>,
}

impl AwaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `sink` to the key's waiter list, creating it if absent.
    ///
    /// Returns true iff the list did not exist: the caller is the first
    /// waiter and must admit the key into the pipeline. A false return
    /// means a computation is already in flight and the sink will be
    /// completed by its deliver stage.
    pub fn push(&self, key: &str, sink: Sink) -> bool {
        let mut inner = self.inner.lock().expect("awaiters mutex poisoned");
        match inner.get_mut(key) {
            Some(list) => {
                list.push_back(sink);
                false
            }
            None => {
                inner.insert(key.to_string(), VecDeque::from([sink]));
                true
            }
        }
    }

    /// Remove and return the oldest sink for the key. When the list
    /// empties it is removed entirely, so the next `push` is "first"
    /// again. Returns `None` when nothing is waiting.
    pub fn pop(&self, key: &str) -> Option<Sink> {
        let mut inner = self.inner.lock().expect("awaiters mutex poisoned");
        let list = inner.get_mut(key)?;
        let sink = list.pop_front();
        if list.is_empty() {
            inner.remove(key);
        }
        sink
    }

    /// Number of keys currently in flight.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().expect("awaiters mutex poisoned").len()
    }
}
