//! Field decoders shared by the document types. The published documents are
//! hand-edited, so `null` shows up where a key was meant to be left out.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// `null` decodes like a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Win counts: `null` is 0, whole floats like `12.0` are accepted.
pub(crate) fn win_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(0);
    };
    let wins = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u64)
    });
    match wins {
        Some(w) => Ok(w.min(u32::MAX as u64) as u32),
        None => Err(D::Error::custom(format!("invalid win count {number}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "win_count")]
        wins: u32,
    }

    fn row(json: &str) -> Result<Row, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn null_and_missing_agree() {
        assert!(row(r#"{"tags": null}"#).unwrap().tags.is_empty());
        assert!(row("{}").unwrap().tags.is_empty());
        assert_eq!(row(r#"{"tags": ["FISH"]}"#).unwrap().tags, ["FISH"]);
    }

    #[test]
    fn win_counts_tolerate_null_and_whole_floats() {
        assert_eq!(row(r#"{"wins": null}"#).unwrap().wins, 0);
        assert_eq!(row(r#"{"wins": 12.0}"#).unwrap().wins, 12);
        assert_eq!(row(r#"{"wins": 7}"#).unwrap().wins, 7);
        assert!(row(r#"{"wins": -3}"#).is_err());
        assert!(row(r#"{"wins": "7"}"#).is_err());
    }
}
