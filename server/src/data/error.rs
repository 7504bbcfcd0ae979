//! Unified error type for data layer

use thiserror::Error;

/// Unified error type for data layer operations
///
/// Wraps driver and storage errors while preserving enough context for the
/// API layer to map them to user-facing responses.
#[derive(Error, Debug)]
pub enum DataError {
    /// MongoDB driver error
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// BSON serialization error
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),

    /// BSON deserialization error
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),

    /// Malformed document id supplied by a caller
    #[error("Invalid object id: {0}")]
    InvalidId(String),

    /// Referenced document does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object storage (photo bucket) error
    #[error("Storage error: {0}")]
    Storage(String),

    /// HTTP fetch error (scraped image download)
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),
}

impl DataError {
    /// Create an invalid-id error from the offending input
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a not-found error naming the missing document
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a storage error with preserved context
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id_display() {
        let err = DataError::invalid_id("not-a-hex-id");
        assert_eq!(err.to_string(), "Invalid object id: not-a-hex-id");
    }

    #[test]
    fn test_not_found_display() {
        let err = DataError::not_found("recipe 64f0");
        assert_eq!(err.to_string(), "Not found: recipe 64f0");
    }

    #[test]
    fn test_storage_display() {
        let err = DataError::storage("bucket gone");
        assert_eq!(err.to_string(), "Storage error: bucket gone");
    }
}
