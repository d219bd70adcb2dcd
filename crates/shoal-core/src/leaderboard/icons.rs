use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::config::ImagePaths;
use crate::decode::null_as_default;
use crate::directory::GroupRecord;
use crate::error::DataFormatError;
use crate::status::{Status, TAG_CERTIFIED, TAG_VERIFIED};

/// Bundled icons for groups that are not in the icon document.
/// Keys are folded group names (see [`fallback_key`]).
const LOCAL_ICONS: &[(&str, &str)] = &[
    ("discord", "discord.png"),
    ("reddit", "reddit.png"),
    ("twitch", "twitch.png"),
    ("youtube", "youtube.png"),
    ("fishcommunity", "fish-community.png"),
    ("shoalofficial", "shoal.png"),
];

/// Substrings that collapse a whole family of names onto one bundled icon.
const KNOWN_SUBSTRINGS: &[&str] = &["discord", "reddit", "twitch", "youtube"];

/// An icon as listed in the icon document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IconEntry {
    /// Legacy map value: just the url.
    Url(String),
    Detailed {
        #[serde(alias = "url", alias = "iconUrl")]
        icon_url: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    },
}

impl IconEntry {
    pub fn url(&self) -> &str {
        match self {
            IconEntry::Url(url) => url,
            IconEntry::Detailed { icon_url, .. } => icon_url,
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            IconEntry::Url(_) => &[],
            IconEntry::Detailed { tags, .. } => tags,
        }
    }
}

/// Normalized `group_id -> icon` mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconMap {
    icons: HashMap<String, IconEntry>,
}

/// Final icon chosen for a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIcon {
    pub url: String,
    pub tags: Vec<String>,
}

impl IconMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group_id: impl Into<String>, entry: IconEntry) {
        self.icons.insert(group_id.into(), entry);
    }

    pub fn get(&self, group_id: &str) -> Option<&IconEntry> {
        self.icons.get(group_id)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Accepts `{"community_groups": [...]}`, a bare array of groups, or an
    /// object keyed by group id. Unreadable elements are skipped.
    pub fn from_json(json: &str) -> Result<Self, DataFormatError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DataFormatError> {
        let mut map = IconMap::new();
        match value {
            Value::Object(mut obj) => match obj.remove("community_groups") {
                Some(Value::Array(groups)) => map.extend_records(groups),
                Some(_) => {
                    return Err(DataFormatError::UnrecognizedShape {
                        document: "icons",
                        expected: "`community_groups` to be an array",
                    })
                }
                None => {
                    for (id, raw) in obj {
                        match serde_json::from_value::<IconEntry>(raw) {
                            Ok(entry) => map.insert(id, entry),
                            Err(err) => log::warn!("icons: skipping entry {id}: {err}"),
                        }
                    }
                }
            },
            Value::Array(groups) => map.extend_records(groups),
            _ => {
                return Err(DataFormatError::UnrecognizedShape {
                    document: "icons",
                    expected: "an object or an array",
                })
            }
        }
        Ok(map)
    }

    fn extend_records(&mut self, groups: Vec<Value>) {
        for (i, raw) in groups.into_iter().enumerate() {
            match serde_json::from_value::<GroupRecord>(raw) {
                Ok(rec) => self.insert(
                    rec.group_id,
                    IconEntry::Detailed {
                        icon_url: rec.icon_url,
                        tags: rec.tags,
                    },
                ),
                Err(err) => log::warn!("icons: skipping group at {i}: {err}"),
            }
        }
    }
}

/// Case-folds a group name and drops everything that is not alphanumeric.
/// Names containing a well-known platform collapse onto that platform's key.
pub fn fallback_key(group_name: &str) -> String {
    let folded: String = group_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    KNOWN_SUBSTRINGS
        .iter()
        .find(|s| folded.contains(*s))
        .map(|s| s.to_string())
        .unwrap_or(folded)
}

/// Three-tier lookup: the icon document, then the bundled icon table, then
/// the default image. Never returns an empty url.
pub fn resolve_icon(
    group_id: &str,
    group_name: &str,
    icons: &IconMap,
    images: &ImagePaths,
) -> ResolvedIcon {
    if let Some(entry) = icons.get(group_id) {
        let url = entry.url().trim();
        if !url.is_empty() {
            return ResolvedIcon {
                url: url.to_string(),
                tags: entry.tags().to_vec(),
            };
        }
    }

    let key = fallback_key(group_name);
    if let Some((_, file)) = LOCAL_ICONS.iter().find(|(name, _)| *name == key) {
        return ResolvedIcon {
            url: format!("{}{}", images.local_icon_dir, file),
            tags: Vec::new(),
        };
    }

    let url = if images.default_icon.is_empty() {
        ImagePaths::default().default_icon
    } else {
        images.default_icon.clone()
    };
    ResolvedIcon { url, tags: Vec::new() }
}

/// Image substituted when an icon fails to load.
pub fn placeholder_for_tags<'a>(tags: &[String], images: &'a ImagePaths) -> &'a str {
    if tags.iter().any(|t| t == TAG_VERIFIED) {
        &images.verified_placeholder
    } else if tags.iter().any(|t| t == TAG_CERTIFIED) {
        &images.certified_placeholder
    } else {
        &images.known_placeholder
    }
}

/// Image a fish falls back to when its own icon fails.
pub fn placeholder_for_status(status: Status, images: &ImagePaths) -> &str {
    match status {
        Status::Verified | Status::System => &images.verified_placeholder,
        Status::Certified => &images.certified_placeholder,
        Status::Fish | Status::Known => &images.known_placeholder,
    }
}
