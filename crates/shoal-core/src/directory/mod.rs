// directory/mod.rs
//
// Community directory: the list of groups that become fish.

pub mod cache;

pub use cache::{DirectoryCache, DirectorySnapshot};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::null_as_default;
use crate::error::DataFormatError;
use crate::status::Status;

/// A group as written in the `community_groups` documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    #[serde(alias = "groupId")]
    pub group_id: String,
    #[serde(default, alias = "groupName", deserialize_with = "null_as_default")]
    pub group_name: String,
    #[serde(default, alias = "iconUrl", alias = "url", deserialize_with = "null_as_default")]
    pub icon_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// A directory group with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityGroup {
    pub group_id: String,
    pub group_name: String,
    pub icon_url: String,
    pub tags: Vec<String>,
}

impl CommunityGroup {
    pub fn status(&self) -> Status {
        Status::from_tags(&self.tags)
    }
}

impl From<GroupRecord> for CommunityGroup {
    fn from(rec: GroupRecord) -> Self {
        Self {
            group_id: rec.group_id,
            group_name: rec.group_name,
            icon_url: rec.icon_url,
            tags: rec.tags,
        }
    }
}

/// Normalize `{"community_groups": [...]}` or a bare array into groups.
/// Elements that cannot be read are skipped.
pub fn parse_directory(json: &str) -> Result<Vec<CommunityGroup>, DataFormatError> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Object(mut obj) => match obj.remove("community_groups") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DataFormatError::UnrecognizedShape {
                    document: "community directory",
                    expected: "an object with a `community_groups` array or a bare array",
                })
            }
        },
        Value::Array(items) => items,
        _ => {
            return Err(DataFormatError::UnrecognizedShape {
                document: "community directory",
                expected: "an object with a `community_groups` array or a bare array",
            })
        }
    };

    let mut groups = Vec::with_capacity(items.len());
    for (i, raw) in items.into_iter().enumerate() {
        match serde_json::from_value::<GroupRecord>(raw) {
            Ok(rec) => groups.push(CommunityGroup::from(rec)),
            Err(err) => log::debug!("directory: skipping group at {i}: {err}"),
        }
    }
    Ok(groups)
}

/// Keep the `capacity` highest-tier groups. Within a tier, document order wins.
pub fn retain_highest_priority(mut groups: Vec<CommunityGroup>, capacity: usize) -> Vec<CommunityGroup> {
    if groups.len() <= capacity {
        return groups;
    }
    groups.sort_by_key(|g| std::cmp::Reverse(g.status().tier()));
    groups.truncate(capacity);
    groups
}
