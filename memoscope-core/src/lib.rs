//! Memoscope Core - Context-Scoped Memoization
//!
//! Transparent, swappable-backend memoization for function results, scoped
//! per execution context (thread) rather than globally. A thread binds a
//! [`Backend`] for a scope of work; memoized computations inside that scope
//! consult the backend through stable composite keys, and computations on
//! threads with no binding run uncached.
//!
//! Concrete backends live in `memoscope-backends`; anything satisfying the
//! [`Backend`] get/set contract plugs in.
//!
//! Diagnostics are emitted through `tracing` at debug level; consumers wire
//! up their own subscriber and control verbosity through its level filter.

pub mod backend;
pub mod context;
pub mod error;
pub mod key;
pub mod memo;

pub use backend::Backend;
pub use context::{bind, current, scoped, unbind, with_backend, BindGuard};
pub use error::{BackendError, CacheError, CacheResult, KeyError};
pub use key::{ArgKey, ArgKeyBuilder, CacheKey};
pub use memo::{memoized, memoized_with, Memoized};
