//! Image preloading plan for the fish background.
//!
//! The plan orders images by priority tier and decides, from a single
//! cache probe of the first image, whether to throttle the whole batch.
//! The probe is a heuristic: one cached image says little about the rest,
//! it only guards against a burst of cold requests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::FishConfig;
use crate::directory::CommunityGroup;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadItem {
    pub url: String,
    pub name: String,
    pub status: Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Fixed-size batches with a pause in between.
    RateLimited { batch_size: usize, delay_ms: u32 },
    /// Everything at once.
    Immediate,
}

impl LoadStrategy {
    pub fn choose(first_image_cached: bool, cfg: &FishConfig) -> Self {
        if first_image_cached {
            LoadStrategy::Immediate
        } else {
            LoadStrategy::RateLimited {
                batch_size: cfg.batch_size.max(1),
                delay_ms: cfg.batch_delay_ms,
            }
        }
    }

    /// Pause to take after batch `index` of `batch_count`. The last batch
    /// and immediate loading never pause.
    pub fn pause_after(&self, index: usize, batch_count: usize) -> Option<u32> {
        match self {
            LoadStrategy::RateLimited { delay_ms, .. } if *delay_ms > 0 && index + 1 < batch_count => {
                Some(*delay_ms)
            }
            _ => None,
        }
    }
}

/// Ordered list of images to load. Slot `i` of the plan feeds fish slot `i`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreloadPlan {
    items: Vec<PreloadItem>,
}

impl PreloadPlan {
    /// Groups without an icon url are left out. Order is by tier, then
    /// directory order.
    pub fn from_groups(groups: &[CommunityGroup]) -> Self {
        let mut items: Vec<PreloadItem> = groups
            .iter()
            .filter(|g| !g.icon_url.trim().is_empty())
            .map(|g| PreloadItem {
                url: g.icon_url.trim().to_string(),
                name: g.group_name.clone(),
                status: g.status(),
            })
            .collect();
        items.sort_by_key(|item| std::cmp::Reverse(item.status.tier()));
        Self { items }
    }

    pub fn items(&self) -> &[PreloadItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&PreloadItem> {
        self.items.first()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Slot indices grouped into load batches for `strategy`.
    pub fn batches(&self, strategy: LoadStrategy) -> Vec<Vec<usize>> {
        let slots: Vec<usize> = (0..self.items.len()).collect();
        if slots.is_empty() {
            return Vec::new();
        }
        match strategy {
            LoadStrategy::Immediate => vec![slots],
            LoadStrategy::RateLimited { batch_size, .. } => {
                slots.chunks(batch_size.max(1)).map(<[usize]>::to_vec).collect()
            }
        }
    }
}

/// Per-url load outcomes for this browser session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageOutcomeCache {
    outcomes: HashMap<String, bool>,
}

impl ImageOutcomeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from session storage; corrupt data yields an empty cache.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_else(|err| {
            log::debug!("preload: ignoring corrupt image cache: {err}");
            Self::default()
        })
    }

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    pub fn record(&mut self, url: &str, loaded: bool) {
        self.outcomes.insert(url.to_string(), loaded);
    }

    pub fn outcome(&self, url: &str) -> Option<bool> {
        self.outcomes.get(url).copied()
    }

    /// Already loaded earlier in the session; no network load needed.
    pub fn is_loaded(&self, url: &str) -> bool {
        self.outcome(url) == Some(true)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: usize, tag: &str, url: &str) -> CommunityGroup {
        CommunityGroup {
            group_id: format!("g{id}"),
            group_name: format!("G{id}"),
            icon_url: url.to_string(),
            tags: if tag.is_empty() { vec![] } else { vec![tag.to_string()] },
        }
    }

    #[test]
    fn plan_orders_by_tier_and_skips_missing_urls() {
        let groups = vec![
            group(0, "", "k.png"),
            group(1, "FISH", "f.png"),
            group(2, "FISH_VERIFIED", "v.png"),
            group(3, "FISH_VERIFIED", " "),
        ];
        let plan = PreloadPlan::from_groups(&groups);
        let urls: Vec<_> = plan.items().iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["v.png", "f.png", "k.png"]);
        assert_eq!(plan.first().unwrap().status, Status::Verified);
    }

    #[test]
    fn strategy_follows_probe() {
        let cfg = FishConfig::default();
        assert_eq!(LoadStrategy::choose(true, &cfg), LoadStrategy::Immediate);
        assert_eq!(
            LoadStrategy::choose(false, &cfg),
            LoadStrategy::RateLimited { batch_size: 5, delay_ms: 1000 }
        );
    }

    #[test]
    fn rate_limited_batches_of_five() {
        let groups: Vec<_> = (0..12).map(|i| group(i, "", "x.png")).collect();
        let plan = PreloadPlan::from_groups(&groups);
        let strategy = LoadStrategy::choose(false, &FishConfig::default());
        let batches = plan.batches(strategy);
        let sizes: Vec<_> = batches.iter().map(Vec::len).collect();
        assert_eq!(sizes, [5, 5, 2]);
        assert_eq!(batches[2], [10, 11]);
        assert_eq!(plan.batches(LoadStrategy::Immediate).len(), 1);
        assert!(PreloadPlan::default().batches(LoadStrategy::Immediate).is_empty());
    }

    #[test]
    fn pauses_only_between_rate_limited_batches() {
        let limited = LoadStrategy::choose(false, &FishConfig::default());
        let pauses: Vec<_> = (0..3).map(|i| limited.pause_after(i, 3)).collect();
        assert_eq!(pauses, [Some(1000), Some(1000), None]);
        assert_eq!(LoadStrategy::Immediate.pause_after(0, 2), None);
        let no_delay = LoadStrategy::RateLimited { batch_size: 5, delay_ms: 0 };
        assert_eq!(no_delay.pause_after(0, 2), None);
    }

    #[test]
    fn outcome_cache_persists() {
        let mut cache = ImageOutcomeCache::new();
        cache.record("a.png", true);
        cache.record("b.png", false);
        let restored = ImageOutcomeCache::from_json(&cache.to_json().unwrap());
        assert!(restored.is_loaded("a.png"));
        assert_eq!(restored.outcome("b.png"), Some(false));
        assert!(!restored.is_loaded("c.png"));
        assert!(ImageOutcomeCache::from_json("[1,2]").is_empty());
    }
}
