use serde::{Deserialize, Serialize};

pub const TAG_VERIFIED: &str = "FISH_VERIFIED";
pub const TAG_CERTIFIED: &str = "FISH_CERTIFIED";
pub const TAG_FISH: &str = "FISH";
pub const TAG_KNOWN: &str = "FISH_KNOWN";
pub const TAG_SYSTEM: &str = "SYSTEM";

/// Community standing of a group, derived purely from its tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Status {
    Verified,
    System,
    Certified,
    Fish,
    #[default]
    Known,
}

/// Display size of a fish on the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    Large,
    Medium,
    Small,
}

impl Status {
    /// Tags are checked in the order verified, system, certified, fish.
    /// Anything else (including no tags) is `Known`.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let has = |needle: &str| tags.iter().any(|t| t.as_ref() == needle);
        if has(TAG_VERIFIED) {
            Status::Verified
        } else if has(TAG_SYSTEM) {
            Status::System
        } else if has(TAG_CERTIFIED) {
            Status::Certified
        } else if has(TAG_FISH) {
            Status::Fish
        } else {
            Status::Known
        }
    }

    /// Priority tier used for cache eviction and preload ordering.
    /// Higher is kept/loaded first. System shares verified's tier.
    pub fn tier(self) -> u8 {
        match self {
            Status::Verified | Status::System => 2,
            Status::Certified | Status::Fish => 1,
            Status::Known => 0,
        }
    }

    pub fn size_class(self) -> SizeClass {
        match self {
            Status::Verified | Status::System => SizeClass::Large,
            Status::Certified | Status::Fish => SizeClass::Medium,
            Status::Known => SizeClass::Small,
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Status::Verified => TAG_VERIFIED,
            Status::System => TAG_SYSTEM,
            Status::Certified => TAG_CERTIFIED,
            Status::Fish => TAG_FISH,
            Status::Known => TAG_KNOWN,
        }
    }
}
