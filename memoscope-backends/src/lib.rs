//! Memoscope Backends - Concrete Cache Stores
//!
//! Ready-made implementations of the `memoscope_core::Backend` contract:
//!
//! - [`MemoryBackend`]: process-local map, useful for tests and per-run
//!   caching
//! - [`FsBackend`]: one file per entry under a cache directory, persistent
//!   across processes
//!
//! [`config::backend_from_env`] selects between them from the environment.

pub mod config;
pub mod fs;
pub mod memory;

pub use config::{backend_from_env, ConfigError};
pub use fs::FsBackend;
pub use memory::{CacheStats, MemoryBackend};
