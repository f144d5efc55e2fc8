//! Fixed-capacity result cache with approximate-LRU recency.
//!
//! # Responsibilities
//! - Hold completed successful jobs, keyed by request path
//! - Promote entries on access, evict the least recent at capacity
//!
//! # Design Decisions
//! - Recency promotion is a single swap with the neighbor one slot
//!   closer to the hot end, not a move-to-front. A hot key migrates one
//!   slot per access. This is intentional: it keeps `get` O(1) and it
//!   changes which keys survive eviction under skewed access compared
//!   to true LRU. Do not replace it with move-to-front.
//! - Three synchronized structures under one mutex: recency-ordered
//!   keys, parallel jobs, and a key -> position index. Positions in the
//!   index are absolute (monotonic); a base offset advanced on eviction
//!   keeps every operation O(1) without rewriting the index.
//! - No TTL. Entries leave only by eviction.
//! - No I/O under the lock.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::dispatch::job::Job;

/// Key -> completed job store. Front of the deque is the least recent.
pub struct ResultCache {
    inner: Mutex<Inner>,
}

struct Inner {
    /// Recency order, front = next eviction candidate.
    keys: VecDeque<String>,
    /// Jobs parallel to `keys`.
    jobs: VecDeque<Arc<Job>>,
    /// Key -> absolute position (`base` + deque index).
    index: HashMap<String, usize>,
    /// Absolute position of the deque front.
    base: usize,
    capacity: usize,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be positive");
        Self {
            inner: Mutex::new(Inner {
                keys: VecDeque::with_capacity(capacity),
                jobs: VecDeque::with_capacity(capacity),
                index: HashMap::with_capacity(capacity),
                base: 0,
                capacity,
            }),
        }
    }

    /// Look up a key. On a hit the entry is swapped one position toward
    /// the most-recent end.
    pub fn get(&self, key: &str) -> Option<Arc<Job>> {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");

        let abs = inner.index.get(key).copied()?;
        let pos = abs - inner.base;
        let job = inner.jobs[pos].clone();

        if pos + 1 < inner.keys.len() {
            let neighbor = inner.keys[pos + 1].clone();
            inner.keys.swap(pos, pos + 1);
            inner.jobs.swap(pos, pos + 1);
            inner.index.insert(key.to_string(), abs + 1);
            inner.index.insert(neighbor, abs);
        }

        Some(job)
    }

    /// Insert or replace. A new key lands at the most-recent end,
    /// evicting from the least-recent end if needed; an existing key is
    /// replaced in place with no recency change.
    pub fn set(&self, key: String, job: Arc<Job>) {
        let mut inner = self.inner.lock().expect("cache mutex poisoned");

        if let Some(abs) = inner.index.get(&key).copied() {
            let pos = abs - inner.base;
            inner.jobs[pos] = job;
            return;
        }

        while inner.keys.len() >= inner.capacity {
            if let Some(evicted) = inner.keys.pop_front() {
                inner.jobs.pop_front();
                inner.index.remove(&evicted);
                inner.base += 1;
            }
        }

        let abs = inner.base + inner.keys.len();
        inner.keys.push_back(key.clone());
        inner.jobs.push_back(job);
        inner.index.insert(key, abs);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("cache mutex poisoned").keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in recency order, least recent first. Test hook.
    #[cfg(test)]
    fn keys(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.keys.iter().cloned().collect()
    }
}
