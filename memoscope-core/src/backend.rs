//! The pluggable backend contract.
//!
//! This module defines the minimal trait a storage engine must satisfy to be
//! usable as a cache backend. The core never asks a backend for ordering,
//! iteration, deletion, size, or expiry - those are backend-specific
//! extensions outside this contract.

use crate::error::BackendError;
use crate::key::CacheKey;

/// A pluggable key/value store for memoized results.
///
/// # Contract
///
/// - `get` must report a plain miss as `Ok(None)`, never as an error.
/// - `set` is an unconditional upsert, overwriting any existing entry.
/// - Values are opaque bytes; the memoizing wrapper owns their encoding.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: a backend bound in one context may
/// be shared with another by binding the same instance there. Whatever
/// synchronization that sharing requires is the backend's own contract, as is
/// any blocking behavior (e.g. disk or network round-trips) - the core passes
/// both through untouched.
pub trait Backend: Send + Sync {
    /// Look up the stored value for a key.
    ///
    /// Returns `Ok(None)` when no entry exists for the key.
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BackendError>;

    /// Store a value for a key, overwriting any previous entry.
    fn set(&self, key: &CacheKey, value: &[u8]) -> Result<(), BackendError>;
}
