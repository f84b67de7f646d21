//! Error types for `remark_import`.

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by storage, configuration and the importers.
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite failure (constraint violation, I/O, locked database).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("configuration error: {0}")]
    Config(String),

    /// A record failed a storage-level check before insertion.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// None of the known export timestamp layouts matched.
    #[error("failed to parse time string: {value}")]
    TimeParse { value: String },

    /// Some comments were saved, some were rejected by the store.
    #[error("failed to save {failed} comments")]
    SaveFailed { failed: usize, imported: usize },

    /// Every comment offered to the store was rejected.
    #[error("import failed")]
    ImportFailed { failed: usize },

    #[error("unknown importer: {0}")]
    UnknownImporter(String),

    /// The decoding thread panicked before closing its channel.
    #[error("producer failed: {0}")]
    Producer(String),
}

impl Error {
    /// Build a validation error for the given field.
    #[must_use]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Number of comments persisted before this error was produced.
    ///
    /// Only the aggregate import errors carry a count; every other
    /// variant means nothing was written.
    #[must_use]
    pub const fn imported_count(&self) -> usize {
        match self {
            Self::SaveFailed { imported, .. } => *imported,
            _ => 0,
        }
    }

    /// Number of comments the store rejected, when known.
    #[must_use]
    pub const fn failed_count(&self) -> Option<usize> {
        match self {
            Self::SaveFailed { failed, .. } | Self::ImportFailed { failed } => Some(*failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_failed_display() {
        let err = Error::SaveFailed {
            failed: 1,
            imported: 2,
        };
        assert_eq!(err.to_string(), "failed to save 1 comments");
        assert_eq!(err.imported_count(), 2);
        assert_eq!(err.failed_count(), Some(1));
    }

    #[test]
    fn test_import_failed_display() {
        let err = Error::ImportFailed { failed: 3 };
        assert_eq!(err.to_string(), "import failed");
        assert_eq!(err.imported_count(), 0);
        assert_eq!(err.failed_count(), Some(3));
    }

    #[test]
    fn test_time_parse_display() {
        let err = Error::TimeParse {
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse time string: yesterday");
        assert_eq!(err.failed_count(), None);
    }

    #[test]
    fn test_validation_display() {
        let err = Error::validation("id", "comment id cannot be empty");
        assert_eq!(err.to_string(), "invalid id: comment id cannot be empty");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("not valid json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("JSON error"));
    }
}
