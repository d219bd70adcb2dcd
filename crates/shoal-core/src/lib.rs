//! Headless core of the community site's page behaviors.
//!
//! Two independent pipelines share this crate: the leaderboard (normalize,
//! merge, rank, size) and the swimming-fish background (directory cache,
//! preload plan, school motion). Everything here runs natively; the browser
//! glue lives in `shoal-web`.

pub mod config;
mod decode;
pub mod directory;
pub mod error;
pub mod fish;
pub mod leaderboard;
pub mod preload;
pub mod session;
#[cfg(feature = "social")]
pub mod social;
pub mod status;
pub mod storage;

pub use config::{ElementIds, FishConfig, ImagePaths, LayoutConfig, SiteConfig};
pub use directory::{parse_directory, CommunityGroup, DirectoryCache};
pub use error::{DataFormatError, FetchError};
pub use fish::{Fish, FishId, LoopGate, School, SlotChange, Viewport};
pub use leaderboard::{
    resolve_icon, GlobalSettings, IconMap, LeaderboardDocument, LeaderboardEntry, LeaderboardView,
};
pub use preload::{ImageOutcomeCache, LoadStrategy, PreloadItem, PreloadPlan};
pub use session::{mark_image_failed, PreloadSession};
#[cfg(feature = "social")]
pub use social::{plan_embeds, SocialEmbed};
pub use status::{SizeClass, Status};
pub use storage::{MemoryStore, SessionStore};
