use crate::config::FishConfig;
use crate::directory::DirectoryCache;
use crate::fish::{School, SlotChange};
use crate::preload::{ImageOutcomeCache, PreloadPlan};
use crate::storage::{SessionStore, DIRECTORY_KEY, IMAGES_KEY};

/// The fish background's caches plus the store they are mirrored to.
/// Replaces page-global cache variables with one owned context.
pub struct PreloadSession<S: SessionStore> {
    pub directory: DirectoryCache,
    pub images: ImageOutcomeCache,
    store: S,
}

impl<S: SessionStore> PreloadSession<S> {
    /// Restore whatever this browser session saved earlier.
    pub fn restore(store: S, cfg: &FishConfig, now_ms: f64) -> Self {
        let mut directory = DirectoryCache::from_config(cfg);
        if let Some(raw) = store.load(DIRECTORY_KEY) {
            directory.restore(&raw, now_ms);
        }
        let images = store
            .load(IMAGES_KEY)
            .map(|raw| ImageOutcomeCache::from_json(&raw))
            .unwrap_or_default();
        Self { directory, images, store }
    }

    pub fn record_image(&mut self, url: &str, loaded: bool) {
        self.images.record(url, loaded);
    }

    /// Slots of `batch` whose image still has to come over the network.
    /// Urls already loaded this session are skipped.
    pub fn pending(&self, plan: &PreloadPlan, batch: &[usize]) -> Vec<usize> {
        batch
            .iter()
            .copied()
            .filter(|&slot| {
                plan.items()
                    .get(slot)
                    .is_some_and(|item| !self.images.is_loaded(&item.url))
            })
            .collect()
    }

    /// Record the outcomes of one batch, give every slot of it either its
    /// image or its removal, then persist. `loaded` holds `(slot, ok)` for
    /// the slots that went over the network.
    pub fn settle_batch(
        &mut self,
        school: &mut School,
        plan: &PreloadPlan,
        batch: &[usize],
        loaded: &[(usize, bool)],
    ) -> Vec<SlotChange> {
        for &(slot, ok) in loaded {
            if let Some(item) = plan.items().get(slot) {
                self.images.record(&item.url, ok);
            }
        }
        let changes = batch
            .iter()
            .map(|&slot| match plan.items().get(slot) {
                Some(item) if self.images.is_loaded(&item.url) => school.resolve_slot(slot, item),
                _ => school.fail_slot(slot),
            })
            .filter(|change| *change != SlotChange::Unchanged)
            .collect();
        self.persist();
        changes
    }

    /// Write both caches back. Failures are the store's business.
    pub fn persist(&mut self) {
        if let Some(json) = self.directory.snapshot_json() {
            self.store.save(DIRECTORY_KEY, &json);
        }
        if let Some(json) = self.images.to_json() {
            self.store.save(IMAGES_KEY, &json);
        }
    }
}

/// An image that was cached as loaded failed on this page view. Written
/// straight to the store so the next page loads it over the network again.
pub fn mark_image_failed<S: SessionStore>(store: &mut S, url: &str) {
    let mut images = store
        .load(IMAGES_KEY)
        .map(|raw| ImageOutcomeCache::from_json(&raw))
        .unwrap_or_default();
    images.record(url, false);
    if let Some(json) = images.to_json() {
        store.save(IMAGES_KEY, &json);
    }
}
