use serde::{Deserialize, Serialize};

use super::{parse_directory, retain_highest_priority, CommunityGroup};
use crate::config::FishConfig;
use crate::error::FetchError;

/// What gets written to session storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub saved_at_ms: f64,
    pub groups: Vec<CommunityGroup>,
}

/// In-memory directory cache with a TTL, a capacity bound and a persisted
/// snapshot used as a fallback when the network is unavailable.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    groups: Vec<CommunityGroup>,
    fetched_at_ms: Option<f64>,
    ttl_ms: f64,
    capacity: usize,
    persisted: Option<DirectorySnapshot>,
}

impl DirectoryCache {
    pub fn new(ttl_ms: f64, capacity: usize) -> Self {
        Self {
            groups: Vec::new(),
            fetched_at_ms: None,
            ttl_ms,
            capacity,
            persisted: None,
        }
    }

    pub fn from_config(cfg: &FishConfig) -> Self {
        Self::new(cfg.directory_ttl_ms, cfg.directory_capacity)
    }

    /// Load a snapshot written earlier in this session. A still-fresh
    /// snapshot also seeds the in-memory cache. Corrupt data is ignored.
    pub fn restore(&mut self, raw: &str, now_ms: f64) {
        let snapshot: DirectorySnapshot = match serde_json::from_str(raw) {
            Ok(s) => s,
            Err(err) => {
                log::debug!("directory: ignoring corrupt snapshot: {err}");
                return;
            }
        };
        if now_ms - snapshot.saved_at_ms < self.ttl_ms && !snapshot.groups.is_empty() {
            self.groups = retain_highest_priority(snapshot.groups.clone(), self.capacity);
            self.fetched_at_ms = Some(snapshot.saved_at_ms);
        }
        self.persisted = Some(snapshot);
    }

    /// Cached groups, if they are younger than the TTL and non-empty.
    pub fn fresh(&self, now_ms: f64) -> Option<&[CommunityGroup]> {
        let fetched = self.fetched_at_ms?;
        if now_ms - fetched < self.ttl_ms && !self.groups.is_empty() {
            Some(&self.groups)
        } else {
            None
        }
    }

    /// Fold a fetch outcome into the cache and return the groups to use.
    /// Never fails: errors fall back to the persisted snapshot, then to empty.
    pub fn accept(&mut self, result: Result<String, FetchError>, now_ms: f64) -> Vec<CommunityGroup> {
        let parsed = result.and_then(|body| parse_directory(&body).map_err(FetchError::from));
        match parsed {
            Ok(groups) => {
                let raw_len = groups.len();
                let groups = retain_highest_priority(groups, self.capacity);
                if raw_len > groups.len() {
                    log::debug!("directory: kept {} of {raw_len} groups", groups.len());
                }
                self.groups = groups;
                self.fetched_at_ms = Some(now_ms);
                self.persisted = Some(DirectorySnapshot {
                    saved_at_ms: now_ms,
                    groups: self.groups.clone(),
                });
                self.groups.clone()
            }
            Err(err) => {
                log::warn!("directory: fetch failed: {err}");
                match &self.persisted {
                    Some(snapshot) => {
                        log::info!("directory: using saved snapshot ({} groups)", snapshot.groups.len());
                        retain_highest_priority(snapshot.groups.clone(), self.capacity)
                    }
                    None => Vec::new(),
                }
            }
        }
    }

    /// JSON for session storage, once something has been fetched or restored.
    pub fn snapshot_json(&self) -> Option<String> {
        let snapshot = self.persisted.as_ref()?;
        serde_json::to_string(snapshot).ok()
    }

    pub fn groups(&self) -> &[CommunityGroup] {
        &self.groups
    }
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::from_config(&FishConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::group;
    use super::*;

    const MINUTE: f64 = 60_000.0;

    fn body(groups: &[CommunityGroup]) -> String {
        serde_json::json!({ "community_groups": groups }).to_string()
    }

    #[test]
    fn fresh_until_ttl() {
        let mut cache = DirectoryCache::default();
        assert!(cache.fresh(0.0).is_none());
        let got = cache.accept(Ok(body(&[group(1, None)])), 1_000.0);
        assert_eq!(got.len(), 1);
        assert!(cache.fresh(1_000.0 + 29.0 * MINUTE).is_some());
        assert!(cache.fresh(1_000.0 + 30.0 * MINUTE).is_none());
    }

    #[test]
    fn empty_result_is_not_fresh() {
        let mut cache = DirectoryCache::default();
        cache.accept(Ok("[]".into()), 0.0);
        assert!(cache.fresh(1.0).is_none());
    }

    #[test]
    fn failure_uses_snapshot_then_empty() {
        let mut cache = DirectoryCache::default();
        assert!(cache.accept(Err(FetchError::Status(503)), 0.0).is_empty());

        cache.accept(Ok(body(&[group(1, None), group(2, None)])), 0.0);
        let fallback = cache.accept(Err(FetchError::Network("offline".into())), 90.0 * MINUTE);
        assert_eq!(fallback.len(), 2);
    }

    #[test]
    fn snapshot_round_trips_through_session() {
        let mut cache = DirectoryCache::default();
        cache.accept(Ok(body(&[group(7, Some("FISH"))])), 10.0);
        let saved = cache.snapshot_json().unwrap();

        let mut next_page = DirectoryCache::default();
        next_page.restore(&saved, 10.0 + MINUTE);
        let groups = next_page.fresh(10.0 + MINUTE).unwrap();
        assert_eq!(groups[0].group_id, "g7");
    }

    #[test]
    fn stale_snapshot_is_fallback_only() {
        let mut cache = DirectoryCache::default();
        cache.accept(Ok(body(&[group(1, None)])), 0.0);
        let saved = cache.snapshot_json().unwrap();

        let mut later = DirectoryCache::default();
        later.restore(&saved, 45.0 * MINUTE);
        assert!(later.fresh(45.0 * MINUTE).is_none());
        assert_eq!(later.accept(Err(FetchError::Status(500)), 45.0 * MINUTE).len(), 1);
    }

    #[test]
    fn corrupt_snapshot_is_ignored() {
        let mut cache = DirectoryCache::default();
        cache.restore("{\"nope\":", 0.0);
        assert!(cache.snapshot_json().is_none());
    }
}
