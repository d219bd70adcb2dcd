/// A document parsed as JSON but its shape is not one we understand.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataFormatError {
    /// The payload is not valid JSON.
    #[error("invalid json: {0}")]
    Json(String),
    /// The top-level value is neither of the accepted document shapes.
    #[error("unrecognized {document} document: expected {expected}")]
    UnrecognizedShape {
        document: &'static str,
        expected: &'static str,
    },
    /// An element inside an otherwise valid document could not be read.
    #[error("malformed {document} entry at index {index}: {reason}")]
    MalformedEntry {
        document: &'static str,
        index: usize,
        reason: String,
    },
}

impl From<serde_json::Error> for DataFormatError {
    fn from(err: serde_json::Error) -> Self {
        DataFormatError::Json(err.to_string())
    }
}

/// Failure to obtain a remote document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (offline, CORS, aborted).
    #[error("network: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("http status {0}")]
    Status(u16),
    /// The body arrived but could not be normalized.
    #[error("format: {0}")]
    Format(#[from] DataFormatError),
}

impl FetchError {
    /// Message shown to visitors when the leaderboard cannot be displayed.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Network(_) | FetchError::Status(_) => {
                "The leaderboard could not be loaded. Please check your connection and try again."
            }
            FetchError::Format(_) => {
                "The leaderboard data is in an unexpected format. Please try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_converts_into_format() {
        let err: DataFormatError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, DataFormatError::Json(_)));
        let fetch: FetchError = err.into();
        assert!(matches!(fetch, FetchError::Format(_)));
    }

    #[test]
    fn user_message_distinguishes_format_from_network() {
        let net = FetchError::Status(500).user_message();
        let fmt = FetchError::Format(DataFormatError::Json("x".into())).user_message();
        assert_ne!(net, fmt);
    }
}
