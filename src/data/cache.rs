use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Betting totals per game id.
///
/// Manual ("sticky") lines always win and never expire. Fresh odds-feed
/// lines come next and expire after the TTL so a stale odds pull is not
/// reused indefinitely. Totals carried by the score snapshot rank last and
/// are replaced wholesale every pass. Only positive, finite totals are kept.
pub struct LineStore {
    manual: DashMap<String, f64>,
    feed: DashMap<String, CachedLine>,
    snapshot: DashMap<String, f64>,
    ttl: Duration,
}

struct CachedLine {
    total: f64,
    timestamp: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSource {
    Manual,
    Feed,
    Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLine {
    pub total: f64,
    pub source: LineSource,
}

fn is_valid_total(total: f64) -> bool {
    total.is_finite() && total > 0.0
}

impl LineStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            manual: DashMap::new(),
            feed: DashMap::new(),
            snapshot: DashMap::new(),
            ttl,
        }
    }

    /// Returns false (and stores nothing) for a non-positive total.
    pub fn set_manual(&self, game_id: &str, total: f64) -> bool {
        if !is_valid_total(total) {
            return false;
        }
        self.manual.insert(game_id.to_string(), total);
        true
    }

    pub fn clear_manual(&self, game_id: &str) -> Option<f64> {
        self.manual.remove(game_id).map(|(_, total)| total)
    }

    pub fn insert_feed(&self, game_id: &str, total: f64) -> bool {
        if !is_valid_total(total) {
            return false;
        }
        self.feed.insert(
            game_id.to_string(),
            CachedLine {
                total,
                timestamp: Instant::now(),
            },
        );
        true
    }

    pub fn set_snapshot(&self, game_id: &str, total: f64) -> bool {
        if !is_valid_total(total) {
            return false;
        }
        self.snapshot.insert(game_id.to_string(), total);
        true
    }

    /// Drop every snapshot total before a new snapshot is applied.
    pub fn clear_snapshot(&self) {
        self.snapshot.clear();
    }

    /// Evict expired feed lines, including games no longer being read.
    pub fn sweep_expired(&self) -> usize {
        let before = self.feed.len();
        self.feed.retain(|_, line| line.timestamp.elapsed() <= self.ttl);
        before - self.feed.len()
    }

    /// Manual line, else a fresh feed line (stale ones are evicted on read),
    /// else the snapshot total.
    pub fn resolve(&self, game_id: &str) -> Option<ResolvedLine> {
        if let Some(total) = self.manual.get(game_id) {
            return Some(ResolvedLine {
                total: *total,
                source: LineSource::Manual,
            });
        }

        if let Some(entry) = self.feed.get(game_id) {
            if entry.timestamp.elapsed() > self.ttl {
                drop(entry); // Drop the read lock
                self.feed.remove(game_id);
            } else {
                return Some(ResolvedLine {
                    total: entry.total,
                    source: LineSource::Feed,
                });
            }
        }

        self.snapshot.get(game_id).map(|total| ResolvedLine {
            total: *total,
            source: LineSource::Snapshot,
        })
    }

    pub fn clear(&self) {
        self.manual.clear();
        self.feed.clear();
        self.snapshot.clear();
    }

    pub fn len(&self) -> usize {
        self.manual.len() + self.feed.len() + self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manual.is_empty() && self.feed.is_empty() && self.snapshot.is_empty()
    }
}
