use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::win_count;
use crate::error::DataFormatError;

const DOCUMENT: &str = "leaderboard";

/// One ranked group as published in the leaderboard document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(alias = "group_id")]
    pub group_id: String,
    #[serde(alias = "group_name")]
    pub group_name: String,
    #[serde(default, deserialize_with = "win_count")]
    pub wins: u32,
    #[serde(default, alias = "twitter_link", skip_serializing_if = "Option::is_none")]
    pub twitter_link: Option<String>,
    #[serde(default, alias = "youtube_link", skip_serializing_if = "Option::is_none")]
    pub youtube_link: Option<String>,
}

/// Site-wide social links shown next to the leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default, alias = "twitter_link")]
    pub twitter_link: Option<String>,
    #[serde(default, alias = "youtube_link")]
    pub youtube_link: Option<String>,
}

impl GlobalSettings {
    pub fn twitter(&self) -> Option<&str> {
        non_blank(self.twitter_link.as_deref())
    }

    pub fn youtube(&self) -> Option<&str> {
        non_blank(self.youtube_link.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.twitter().is_none() && self.youtube().is_none()
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Canonical form of the leaderboard document, whatever shape it arrived in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardDocument {
    pub settings: Option<GlobalSettings>,
    pub entries: Vec<LeaderboardEntry>,
}

/// The two published shapes, before their elements are decoded.
enum Shape {
    /// `{ "global_settings": {...}, "leaderboard": [...] }`
    Current {
        settings: Option<Value>,
        entries: Vec<Value>,
    },
    /// `[ {...entry}, {"global_settings": {...}}, ... ]`
    Legacy(Vec<Value>),
}

impl Shape {
    fn sniff(value: Value) -> Result<Self, DataFormatError> {
        match value {
            Value::Array(items) => Ok(Shape::Legacy(items)),
            Value::Object(mut map) => match map.remove("leaderboard") {
                Some(Value::Array(entries)) => Ok(Shape::Current {
                    settings: map.remove("global_settings"),
                    entries,
                }),
                _ => Err(unrecognized()),
            },
            _ => Err(unrecognized()),
        }
    }
}

fn unrecognized() -> DataFormatError {
    DataFormatError::UnrecognizedShape {
        document: DOCUMENT,
        expected: "an object with a `leaderboard` array or a bare array",
    }
}

fn decode_entry(index: usize, value: Value) -> Result<LeaderboardEntry, DataFormatError> {
    serde_json::from_value(value).map_err(|err| DataFormatError::MalformedEntry {
        document: DOCUMENT,
        index,
        reason: err.to_string(),
    })
}

fn decode_settings(value: Value) -> Option<GlobalSettings> {
    match serde_json::from_value::<GlobalSettings>(value) {
        Ok(settings) => Some(settings),
        Err(err) => {
            log::warn!("leaderboard: ignoring unreadable global_settings: {err}");
            None
        }
    }
}

impl LeaderboardDocument {
    pub fn from_json(json: &str) -> Result<Self, DataFormatError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DataFormatError> {
        match Shape::sniff(value)? {
            Shape::Current { settings, entries } => {
                let entries = entries
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| decode_entry(i, v))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self {
                    settings: settings.filter(|v| !v.is_null()).and_then(decode_settings),
                    entries,
                })
            }
            Shape::Legacy(items) => {
                let mut doc = Self::default();
                for (i, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(mut map) if map.contains_key("global_settings") => {
                            if let Some(v) = map.remove("global_settings") {
                                doc.settings = decode_settings(v);
                            }
                        }
                        other => doc.entries.push(decode_entry(i, other)?),
                    }
                }
                Ok(doc)
            }
        }
    }
}
