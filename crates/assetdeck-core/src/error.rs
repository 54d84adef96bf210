use thiserror::Error;

use crate::models::DatasetKind;

/// Failures talking to the durable key/value storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for key {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures acquiring a canonical dataset.
///
/// The loader collapses every variant into a single "failed to load" flag;
/// the distinction only shows up in logs.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Dataset {0} is unavailable: {1}")]
    Unavailable(DatasetKind, String),

    #[error("Malformed {kind} payload: {source}")]
    Malformed {
        kind: DatasetKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Maximum length for payload excerpts in error messages
const MAX_EXCERPT_LENGTH: usize = 200;

impl SourceError {
    /// Build an `Unavailable` error, trimming long upstream messages.
    pub fn unavailable(kind: DatasetKind, reason: &str) -> Self {
        if reason.len() <= MAX_EXCERPT_LENGTH {
            SourceError::Unavailable(kind, reason.to_string())
        } else {
            let cut: String = reason.chars().take(MAX_EXCERPT_LENGTH).collect();
            SourceError::Unavailable(
                kind,
                format!("{}... (truncated, {} total bytes)", cut, reason.len()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_truncates_long_reason() {
        let long = "x".repeat(500);
        let err = SourceError::unavailable(DatasetKind::AuditLogs, &long);
        let msg = err.to_string();
        assert!(msg.contains("truncated, 500 total bytes"));
        assert!(msg.len() < 300);
    }

    #[test]
    fn test_unavailable_keeps_short_reason() {
        let err = SourceError::unavailable(DatasetKind::Certificates, "offline");
        assert_eq!(err.to_string(), "Dataset certificates is unavailable: offline");
    }
}
