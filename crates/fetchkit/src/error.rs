//! Error types for release parsing and archive extraction.

use thiserror::Error;

/// Errors from fetchkit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The release API response could not be parsed.
    #[error("invalid release metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// The release metadata is missing a required field.
    #[error("release metadata missing field: {field}")]
    MissingField {
        /// Name of the absent field.
        field: &'static str,
    },

    /// No asset in the release matches the requested name.
    #[error("no release asset named {name}")]
    AssetNotFound {
        /// The asset name that was looked up.
        name: String,
    },

    /// The archive does not contain the requested member.
    #[error("archive member not found: {name}")]
    MemberNotFound {
        /// The member that was looked up.
        name: String,
    },

    /// The archive could not be read.
    #[error("invalid archive: {0}")]
    Archive(String),

    /// The current platform has no known release asset naming.
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform {
        /// Operating system name.
        os: String,
        /// CPU architecture.
        arch: String,
    },

    /// IO error while reading archive contents.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fetchkit operations.
pub type Result<T> = std::result::Result<T, Error>;
