//! Error types for memoscope operations

use thiserror::Error;

/// Backend storage errors.
///
/// A simple miss is never an error: `Backend::get` reports absence through
/// `Option`, and this type only covers genuine store failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("I/O failure on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("corrupt entry for key {key}: {reason}")]
    CorruptEntry { key: String, reason: String },
}

/// Key derivation errors.
///
/// Raised when a mapper cannot project call arguments into an [`ArgKey`].
/// This is a caller configuration problem (an unsuitable argument type for
/// the chosen mapper), not a caching-layer fault.
///
/// [`ArgKey`]: crate::key::ArgKey
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("argument projection failed: {reason}")]
    Projection { reason: String },
}

/// Master error type for all memoscope errors.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("key derivation error: {0}")]
    Key(#[from] KeyError),

    #[error("value codec error for '{name}': {reason}")]
    Codec { name: String, reason: String },
}

/// Result type alias for memoscope operations.
pub type CacheResult<T> = Result<T, CacheError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display_io() {
        let err = BackendError::Io {
            path: "/tmp/cache/abc.entry".to_string(),
            reason: "permission denied".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("I/O failure"));
        assert!(msg.contains("/tmp/cache/abc.entry"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_key_error_display_projection() {
        let err = KeyError::Projection {
            reason: "map key must be a string".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("argument projection failed"));
        assert!(msg.contains("map key must be a string"));
    }

    #[test]
    fn test_cache_error_from_variants() {
        let backend = CacheError::from(BackendError::Unavailable {
            reason: "store offline".to_string(),
        });
        assert!(matches!(backend, CacheError::Backend(_)));

        let key = CacheError::from(KeyError::Projection {
            reason: "unsupported".to_string(),
        });
        assert!(matches!(key, CacheError::Key(_)));
    }

    #[test]
    fn test_cache_error_display_codec() {
        let err = CacheError::Codec {
            name: "square".to_string(),
            reason: "invalid type".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("square"));
        assert!(msg.contains("invalid type"));
    }
}
