use glam::Vec2;

use super::entity::{Fish, FishId, FishState, Viewport};
use super::placement::grid_positions;
use super::rng::Rng;
use super::time::SwimClock;
use crate::config::FishConfig;
use crate::preload::PreloadItem;
use crate::status::Status;

/// What happened to a slot; the DOM layer mirrors each change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotChange {
    /// A placeholder took its real image in place.
    Converted(FishId),
    /// A new fish was added for a slot without a placeholder.
    Spawned(FishId),
    /// A fish left the school.
    Removed(FishId),
    Unchanged,
}

/// The owned collection of fish plus everything the per-frame update needs.
///
/// Slot `i` is image `i` of the preload plan. Placeholders occupy the first
/// slots until their images arrive.
pub struct School {
    fish: Vec<Fish>,
    slots: Vec<Option<FishId>>,
    /// Starting positions for slots that had no placeholder.
    layout: Vec<Vec2>,
    next_id: u32,
    clock: SwimClock,
    viewport: Viewport,
    rng: Rng,
    cfg: FishConfig,
}

impl School {
    pub fn new(viewport: Viewport, cfg: FishConfig, seed: u64) -> Self {
        Self {
            fish: Vec::with_capacity(cfg.directory_capacity),
            slots: Vec::new(),
            layout: Vec::new(),
            next_id: 1,
            clock: SwimClock::new(cfg.ticks_per_second, cfg.max_ticks_per_frame),
            viewport,
            rng: Rng::new(seed),
            cfg,
        }
    }

    fn next_id(&mut self) -> FishId {
        let id = FishId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn_at(&mut self, pos: Vec2, url: &str) -> FishId {
        let id = self.next_id();
        let fish = Fish::spawn(id, pos, url, &self.cfg, &mut self.rng);
        self.fish.push(fish);
        id
    }

    /// Fill the first slots with placeholder fish so there is motion before
    /// the directory arrives. Bounded by `max_placeholders`.
    pub fn spawn_placeholders(&mut self, url: &str) -> Vec<FishId> {
        let count = self.cfg.max_placeholders.saturating_sub(self.slots.len());
        let positions = grid_positions(count, self.viewport, &mut self.rng);
        positions
            .into_iter()
            .map(|pos| {
                let id = self.spawn_at(pos, url);
                self.slots.push(Some(id));
                id
            })
            .collect()
    }

    /// Prepare for `total` real images: lay out the slots and drop
    /// placeholders that have no image coming. One slot is always kept so
    /// an empty directory still shows a fish.
    pub fn begin_resolve(&mut self, total: usize) -> Vec<SlotChange> {
        self.layout = grid_positions(total, self.viewport, &mut self.rng);
        let keep = total.max(1);
        let mut changes = Vec::new();
        while self.slots.len() > keep {
            if let Some(Some(id)) = self.slots.pop() {
                if self.despawn(id).is_some() {
                    changes.push(SlotChange::Removed(id));
                }
            }
        }
        changes
    }

    /// Give `slot` its real image: convert the placeholder there, or spawn.
    pub fn resolve_slot(&mut self, slot: usize, item: &PreloadItem) -> SlotChange {
        if slot >= self.slots.len() {
            self.slots.resize(slot + 1, None);
        }
        if let Some(id) = self.slots[slot] {
            if let Some(fish) = self.fish.iter_mut().find(|f| f.id == id) {
                fish.resolve(&item.url, &item.name, item.status, &self.cfg);
                return SlotChange::Converted(id);
            }
        }
        let pos = self.layout.get(slot).copied().unwrap_or_else(|| {
            Vec2::new(
                self.rng.range(0.0, self.viewport.width),
                self.rng.range(0.0, self.viewport.height),
            )
        });
        let id = self.spawn_at(pos, &item.url);
        if let Some(fish) = self.fish.iter_mut().find(|f| f.id == id) {
            fish.resolve(&item.url, &item.name, item.status, &self.cfg);
        }
        self.slots[slot] = Some(id);
        SlotChange::Spawned(id)
    }

    /// The image for `slot` failed to load; its placeholder leaves.
    pub fn fail_slot(&mut self, slot: usize) -> SlotChange {
        let Some(Some(id)) = self.slots.get(slot).copied() else {
            return SlotChange::Unchanged;
        };
        match self.fish.iter().find(|f| f.id == id) {
            Some(fish) if fish.is_placeholder() => {
                self.slots[slot] = None;
                self.despawn(id);
                SlotChange::Removed(id)
            }
            _ => SlotChange::Unchanged,
        }
    }

    /// Settle the school once loading is done. Unresolved placeholders are
    /// removed; if nothing resolved, exactly one fish keeps `fallback_url`.
    pub fn finish(&mut self, fallback_url: &str) -> Vec<SlotChange> {
        let mut changes = Vec::new();
        let any_resolved = self.fish.iter().any(|f| f.state == FishState::Resolved);

        if !any_resolved {
            let keep = self.fish.first().map(|f| f.id);
            let stale: Vec<FishId> = self.fish.iter().map(|f| f.id).filter(|id| Some(*id) != keep).collect();
            for id in stale {
                self.despawn(id);
                changes.push(SlotChange::Removed(id));
            }
            let cfg = self.cfg;
            match self.fish.first_mut() {
                Some(fish) => {
                    fish.resolve(fallback_url, "", Status::Known, &cfg);
                    changes.push(SlotChange::Converted(fish.id));
                }
                None => {
                    let pos = Vec2::new(self.viewport.width * 0.5, self.viewport.height * 0.5);
                    let id = self.spawn_at(pos, fallback_url);
                    if let Some(fish) = self.fish.iter_mut().find(|f| f.id == id) {
                        fish.resolve(fallback_url, "", Status::Known, &cfg);
                    }
                    changes.push(SlotChange::Spawned(id));
                }
            }
            self.slots = self.fish.iter().map(|f| Some(f.id)).collect();
            return changes;
        }

        let stale: Vec<FishId> = self.fish.iter().filter(|f| f.is_placeholder()).map(|f| f.id).collect();
        for id in stale {
            self.despawn(id);
            changes.push(SlotChange::Removed(id));
        }
        changes
    }

    /// Feed one animation frame's delta (seconds); returns fixed steps run.
    pub fn frame(&mut self, frame_dt: f32) -> u32 {
        let ticks = self.clock.advance(frame_dt);
        let steps = ticks.len() as u32;
        for swim_time in ticks {
            for fish in self.fish.iter_mut() {
                fish.step(swim_time, self.viewport, &self.cfg, &mut self.rng);
            }
        }
        steps
    }

    /// New viewport; fish outside it are pulled back in.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for fish in self.fish.iter_mut() {
            fish.pos.x = fish.pos.x.clamp(-fish.size, viewport.width);
            fish.pos.y = fish.pos.y.clamp(0.0, (viewport.height - fish.size).max(0.0));
        }
    }

    pub fn despawn(&mut self, id: FishId) -> Option<Fish> {
        let idx = self.fish.iter().position(|f| f.id == id)?;
        for slot in self.slots.iter_mut().filter(|s| **s == Some(id)) {
            *slot = None;
        }
        Some(self.fish.swap_remove(idx))
    }

    pub fn get(&self, id: FishId) -> Option<&Fish> {
        self.fish.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fish> {
        self.fish.iter()
    }

    pub fn len(&self) -> usize {
        self.fish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fish.is_empty()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.swim_time()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &FishConfig {
        &self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn school() -> School {
        School::new(Viewport::new(1200.0, 800.0), FishConfig::default(), 11)
    }

    fn item(i: usize, status: Status) -> PreloadItem {
        PreloadItem {
            url: format!("img{i}.png"),
            name: format!("G{i}"),
            status,
        }
    }

    #[test]
    fn placeholders_are_bounded() {
        let mut s = school();
        assert_eq!(s.spawn_placeholders("p.png").len(), 10);
        assert!(s.spawn_placeholders("p.png").is_empty());
        assert_eq!(s.len(), 10);
        assert!(s.iter().all(Fish::is_placeholder));
    }

    #[test]
    fn converts_in_place_then_spawns() {
        let mut s = school();
        let ids = s.spawn_placeholders("p.png");
        s.begin_resolve(12);
        assert_eq!(s.resolve_slot(0, &item(0, Status::Verified)), SlotChange::Converted(ids[0]));
        let fish = s.get(ids[0]).unwrap();
        assert_eq!(fish.image_url, "img0.png");
        assert_eq!(fish.state, FishState::Resolved);
        assert!(matches!(s.resolve_slot(11, &item(11, Status::Fish)), SlotChange::Spawned(_)));
        assert_eq!(s.len(), 11);
    }

    #[test]
    fn fewer_images_drop_extra_placeholders() {
        let mut s = school();
        s.spawn_placeholders("p.png");
        let removed = s.begin_resolve(3);
        assert_eq!(removed.len(), 7);
        for i in 0..3 {
            s.resolve_slot(i, &item(i, Status::Known));
        }
        assert!(s.finish("fallback.png").is_empty());
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn empty_directory_leaves_exactly_one_fallback_fish() {
        let mut s = school();
        s.spawn_placeholders("p.png");
        s.begin_resolve(0);
        s.finish("fallback.png");
        assert_eq!(s.len(), 1);
        let only = s.iter().next().unwrap();
        assert_eq!(only.image_url, "fallback.png");
        assert_eq!(only.state, FishState::Resolved);
    }

    #[test]
    fn fallback_fish_spawns_without_placeholders() {
        let mut s = School::new(Viewport::new(100.0, 100.0), FishConfig { max_placeholders: 0, ..FishConfig::default() }, 3);
        assert!(s.spawn_placeholders("p.png").is_empty());
        s.begin_resolve(0);
        let changes = s.finish("fallback.png");
        assert!(matches!(changes[..], [SlotChange::Spawned(_)]));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn failed_slot_removes_its_placeholder() {
        let mut s = school();
        let ids = s.spawn_placeholders("p.png");
        s.begin_resolve(10);
        assert_eq!(s.fail_slot(2), SlotChange::Removed(ids[2]));
        assert_eq!(s.fail_slot(2), SlotChange::Unchanged);
        s.resolve_slot(0, &item(0, Status::Fish));
        let changes = s.finish("fallback.png");
        assert_eq!(changes.len(), 8);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn frame_advances_clock_and_keeps_fish_inside() {
        let mut s = school();
        s.spawn_placeholders("p.png");
        let steps: u32 = (0..120).map(|_| s.frame(1.0 / 60.0)).sum();
        assert!(steps >= 118);
        assert!(s.elapsed() > 1.9);
        let vp = s.viewport();
        assert!(s.iter().all(|f| f.pos.y >= 0.0 && f.pos.y <= vp.height - f.size));
    }

    #[test]
    fn long_frame_runs_at_most_the_configured_ticks() {
        let cfg = FishConfig { max_ticks_per_frame: 4, ..FishConfig::default() };
        let mut s = School::new(Viewport::new(400.0, 300.0), cfg, 2);
        s.spawn_placeholders("p.png");
        assert_eq!(s.frame(2.0), 4);
        assert!((s.elapsed() - 4.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn resize_clamps_positions() {
        let mut s = school();
        s.spawn_placeholders("p.png");
        s.resize(Viewport::new(200.0, 150.0));
        assert!(s.iter().all(|f| f.pos.x <= 200.0 && f.pos.y <= 150.0 - f.size));
    }
}
