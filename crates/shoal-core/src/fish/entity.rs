use std::f32::consts::TAU;

use glam::Vec2;

use super::rng::Rng;
use crate::config::FishConfig;
use crate::status::{SizeClass, Status};

/// Stable handle for a fish. The DOM layer keys its elements by this,
/// never by document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FishId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishState {
    /// Swimming with the placeholder image while the real one loads.
    Placeholder,
    /// Carries its group's image (or the final fallback image).
    Resolved,
}

/// Visible area the school swims in, in CSS px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Decorative transform applied to the fish element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FishTransform {
    pub translate: Vec2,
    /// 1.0 when facing right, -1.0 when mirrored.
    pub flip: f32,
    pub tilt_deg: f32,
}

impl FishTransform {
    pub fn css(&self) -> String {
        format!(
            "translate({:.1}px, {:.1}px) scaleX({}) rotate({:.2}deg)",
            self.translate.x, self.translate.y, self.flip, self.tilt_deg
        )
    }
}

#[derive(Debug, Clone)]
pub struct Fish {
    pub id: FishId,
    pub state: FishState,
    pub image_url: String,
    pub name: String,
    pub status: Status,
    /// Top-left corner in viewport px.
    pub pos: Vec2,
    /// Per-step distance along each axis.
    pub speed: Vec2,
    /// Each component is -1.0 or 1.0.
    pub dir: Vec2,
    /// Phase added to the shared clock so fish never wave in sync.
    pub wave_offset: f32,
    /// Rendered width/height in px.
    pub size: f32,
}

pub fn size_for(class: SizeClass, cfg: &FishConfig) -> f32 {
    match class {
        SizeClass::Large => cfg.size_large,
        SizeClass::Medium => cfg.size_medium,
        SizeClass::Small => cfg.size_small,
    }
}

impl Fish {
    /// A placeholder fish with randomized velocity and phase.
    pub fn spawn(id: FishId, pos: Vec2, image_url: &str, cfg: &FishConfig, rng: &mut Rng) -> Self {
        let speed_x = rng.range(cfg.min_speed, cfg.max_speed);
        let speed_y = speed_x * cfg.vertical_speed_ratio * rng.range(0.5, 1.0);
        Self {
            id,
            state: FishState::Placeholder,
            image_url: image_url.to_string(),
            name: String::new(),
            status: Status::Known,
            pos,
            speed: Vec2::new(speed_x, speed_y),
            dir: Vec2::new(rng.sign(), rng.sign()),
            wave_offset: rng.range(0.0, TAU),
            size: size_for(Status::Known.size_class(), cfg),
        }
    }

    /// Placeholder -> Resolved. Position and velocity are kept.
    pub fn resolve(&mut self, image_url: &str, name: &str, status: Status, cfg: &FishConfig) {
        self.state = FishState::Resolved;
        self.image_url = image_url.to_string();
        self.name = name.to_string();
        self.status = status;
        self.size = size_for(status.size_class(), cfg);
    }

    pub fn is_placeholder(&self) -> bool {
        self.state == FishState::Placeholder
    }

    /// Advance one fixed step. `time_s` is the shared school clock.
    pub fn step(&mut self, time_s: f32, viewport: Viewport, cfg: &FishConfig, rng: &mut Rng) {
        // Rare course changes, independent of position.
        if rng.chance(cfg.flip_chance_x) {
            self.dir.x = -self.dir.x;
        }
        if rng.chance(cfg.flip_chance_y) {
            self.dir.y = -self.dir.y;
        }

        let wave = (time_s * cfg.wave_frequency + self.wave_offset).sin() * cfg.wave_amplitude;
        self.pos.x += self.dir.x * self.speed.x;
        self.pos.y += self.dir.y * self.speed.y + wave;

        // Horizontal: wrap to the opposite edge with a little vertical jitter.
        if self.pos.x > viewport.width {
            self.pos.x = -self.size;
            self.pos.y += rng.range(-cfg.wrap_jitter, cfg.wrap_jitter);
        } else if self.pos.x < -self.size {
            self.pos.x = viewport.width;
            self.pos.y += rng.range(-cfg.wrap_jitter, cfg.wrap_jitter);
        }

        // Vertical: bounce and clamp.
        let max_y = (viewport.height - self.size).max(0.0);
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.dir.y = 1.0;
        } else if self.pos.y > max_y {
            self.pos.y = max_y;
            self.dir.y = -1.0;
        }
    }

    pub fn transform(&self, time_s: f32, cfg: &FishConfig) -> FishTransform {
        let tilt = (time_s * cfg.wave_frequency * 0.5 + self.wave_offset).sin() * cfg.tilt_degrees;
        FishTransform {
            translate: self.pos,
            flip: if self.dir.x < 0.0 { -1.0 } else { 1.0 },
            tilt_deg: tilt,
        }
    }
}
