use common::types::cache_key::CacheKey;
use common::types::cluster::Cluster;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A cached clustering result. Never modified after insertion.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub clusters: Vec<Cluster>,
    pub computed_at: Instant,
    /// Insertion order, breaks ties between equal timestamps.
    sequence: u64,
}

impl CacheEntry {
    fn age_key(&self) -> (Instant, u64) {
        (self.computed_at, self.sequence)
    }
}

/// Bounded map from viewport signature to clustering result.
///
/// Entries older than `ttl` are invisible to `get` and removed by `evict`.
/// When more than `max_size` entries remain, the oldest by
/// `(computed_at, insertion order)` go first.
#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    max_size: usize,
    next_sequence: u64,
}

impl ResultCache {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size + 1),
            ttl,
            max_size,
            next_sequence: 0,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.get_at(key, Instant::now())
    }

    pub fn put(&mut self, key: CacheKey, clusters: Vec<Cluster>) {
        self.put_at(key, clusters, Instant::now());
    }

    /// Drops expired entries, then the oldest ones until the cache fits in
    /// `max_size`. Returns how many entries were removed.
    pub fn evict(&mut self) -> usize {
        self.evict_at(Instant::now())
    }

    /// Drops expired entries only.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.computed_at) > self.ttl
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<&CacheEntry> {
        self.entries
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
    }

    fn put_at(&mut self, key: CacheKey, clusters: Vec<Cluster>, now: Instant) {
        let entry = CacheEntry {
            clusters,
            computed_at: now,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.entries.insert(key, entry);
        if self.entries.len() > self.max_size {
            self.evict_at(now);
        }
    }

    fn purge_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.computed_at) <= ttl);
        before - self.entries.len()
    }

    fn evict_at(&mut self, now: Instant) -> usize {
        let mut removed = self.purge_expired_at(now);
        if self.entries.len() <= self.max_size {
            return removed;
        }

        let mut by_age: Vec<(Instant, u64, CacheKey)> = self
            .entries
            .iter()
            .map(|(key, entry)| {
                let (computed_at, sequence) = entry.age_key();
                (computed_at, sequence, *key)
            })
            .collect();
        by_age.sort_by_key(|(computed_at, sequence, _)| (*computed_at, *sequence));

        let excess = self.entries.len() - self.max_size;
        for (_, _, key) in by_age.into_iter().take(excess) {
            self.entries.remove(&key);
            removed += 1;
        }
        removed
    }
}
