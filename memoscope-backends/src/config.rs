//! Environment-driven backend selection.
//!
//! Lets deployments pick a backend without code changes:
//!
//! - `MEMOSCOPE_BACKEND`: `memory` or `fs` (defaults to `fs`)
//! - `MEMOSCOPE_PATH`: cache directory for the `fs` backend (defaults to
//!   `$HOME/.memoscope`)

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use memoscope_core::{Backend, BackendError};

use crate::fs::FsBackend;
use crate::memory::MemoryBackend;

/// Environment variable naming the backend to use.
pub const BACKEND_ENV: &str = "MEMOSCOPE_BACKEND";

/// Environment variable overriding the `fs` backend's cache directory.
pub const PATH_ENV: &str = "MEMOSCOPE_PATH";

/// Backend configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported cache backend '{name}' (expected 'memory' or 'fs')")]
    UnsupportedBackend { name: String },

    #[error("no cache directory: {reason}")]
    NoCacheDir { reason: String },

    #[error("failed to initialize '{backend}' backend: {source}")]
    Init {
        backend: String,
        source: BackendError,
    },
}

/// Construct the backend selected by the environment.
///
/// The returned backend is not bound anywhere; pass it to
/// `memoscope_core::context` to activate it for a scope of work.
pub fn backend_from_env() -> Result<Arc<dyn Backend>, ConfigError> {
    let name = env::var(BACKEND_ENV).unwrap_or_else(|_| "fs".to_string());
    match name.as_str() {
        "memory" => {
            debug!("selected in-memory cache backend");
            Ok(Arc::new(MemoryBackend::new()))
        }
        "fs" => {
            let dir = cache_dir()?;
            debug!(dir = %dir.display(), "selected filesystem cache backend");
            let backend = FsBackend::new(dir).map_err(|source| ConfigError::Init {
                backend: "fs".to_string(),
                source,
            })?;
            Ok(Arc::new(backend))
        }
        other => Err(ConfigError::UnsupportedBackend {
            name: other.to_string(),
        }),
    }
}

/// The cache directory for the `fs` backend.
fn cache_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(path) = env::var(PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(".memoscope"))
        .ok_or_else(|| ConfigError::NoCacheDir {
            reason: format!("home directory unknown and {PATH_ENV} unset"),
        })
}
