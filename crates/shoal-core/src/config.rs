use serde::{Deserialize, Serialize};

/// Page-level configuration. Every field has a default, so a JSON override
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub leaderboard_url: String,
    pub icons_url: String,
    pub directory_url: String,
    pub elements: ElementIds,
    pub images: ImagePaths,
    pub layout: LayoutConfig,
    pub fish: FishConfig,
}

/// DOM ids the page is expected to provide (or that we create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub podium: String,
    pub list: String,
    pub podium_toggle: String,
    pub list_toggle: String,
    pub social: String,
    pub fish_background: String,
    pub fish_style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePaths {
    /// Last-resort icon when nothing else resolves.
    pub default_icon: String,
    /// Directory holding the bundled per-group icons.
    pub local_icon_dir: String,
    pub verified_placeholder: String,
    pub certified_placeholder: String,
    pub known_placeholder: String,
}

/// Podium bar heights (px) and list row widths (percent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub podium_min_height: f32,
    pub podium_max_height: f32,
    pub list_min_width: f32,
    pub list_max_width: f32,
}

/// Tunables for the directory cache, preloader and fish motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub max_placeholders: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u32,
    pub directory_ttl_ms: f64,
    pub directory_capacity: usize,
    /// Per-step chance of reversing horizontal direction.
    pub flip_chance_x: f32,
    /// Per-step chance of reversing vertical direction.
    pub flip_chance_y: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub vertical_speed_ratio: f32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    /// Max vertical displacement applied when a fish wraps horizontally.
    pub wrap_jitter: f32,
    pub tilt_degrees: f32,
    pub size_large: f32,
    pub size_medium: f32,
    pub size_small: f32,
    /// Motion ticks per second of wall time.
    pub ticks_per_second: f32,
    /// Most ticks one animation frame may run.
    pub max_ticks_per_frame: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            leaderboard_url: "data/leaderboard.json".into(),
            icons_url: "data/icons.json".into(),
            directory_url: "data/community-groups.json".into(),
            elements: ElementIds::default(),
            images: ImagePaths::default(),
            layout: LayoutConfig::default(),
            fish: FishConfig::default(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            podium: "podium".into(),
            list: "leaderboard-list".into(),
            podium_toggle: "show-podium".into(),
            list_toggle: "show-list".into(),
            social: "social-embeds".into(),
            fish_background: "fish-background".into(),
            fish_style: "fish-background-style".into(),
        }
    }
}

impl Default for ImagePaths {
    fn default() -> Self {
        Self {
            default_icon: "images/icons/default.png".into(),
            local_icon_dir: "images/icons/".into(),
            verified_placeholder: "images/fish/verified.png".into(),
            certified_placeholder: "images/fish/certified.png".into(),
            known_placeholder: "images/fish/known.png".into(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            podium_min_height: 60.0,
            podium_max_height: 200.0,
            list_min_width: 75.0,
            list_max_width: 100.0,
        }
    }
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            max_placeholders: 10,
            batch_size: 5,
            batch_delay_ms: 1000,
            directory_ttl_ms: 30.0 * 60.0 * 1000.0,
            directory_capacity: 100,
            flip_chance_x: 0.001,
            flip_chance_y: 0.002,
            min_speed: 0.3,
            max_speed: 1.0,
            vertical_speed_ratio: 0.3,
            wave_amplitude: 0.5,
            wave_frequency: 2.0,
            wrap_jitter: 20.0,
            tilt_degrees: 5.0,
            size_large: 64.0,
            size_medium: 48.0,
            size_small: 36.0,
            ticks_per_second: 60.0,
            max_ticks_per_frame: 10,
        }
    }
}

impl SiteConfig {
    /// Parse a (possibly partial) config override from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Config from an optional override; invalid JSON falls back to defaults.
    pub fn from_override(json: Option<&str>) -> Self {
        match json {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(raw).unwrap_or_else(|err| {
                log::warn!("config: ignoring invalid override: {err}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}
