//! The memoizing wrapper.
//!
//! [`Memoized`] wraps a computation with a caching identity (a unique name
//! plus an argument mapper) and orchestrates the lookup flow on every call:
//! resolve the context's active backend, derive the composite key, and run
//! get -> miss -> compute -> set. With no backend bound the call passes
//! straight through to the computation and never touches any store.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use memoscope_core::{context, memoized, CacheResult};
//! # use std::collections::HashMap;
//! # use std::sync::RwLock;
//! # use memoscope_core::{Backend, BackendError, CacheKey};
//! # #[derive(Default)]
//! # struct MapBackend(RwLock<HashMap<CacheKey, Vec<u8>>>);
//! # impl Backend for MapBackend {
//! #     fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>, BackendError> {
//! #         Ok(self.0.read().unwrap().get(key).cloned())
//! #     }
//! #     fn set(&self, key: &CacheKey, value: &[u8]) -> Result<(), BackendError> {
//! #         self.0.write().unwrap().insert(key.clone(), value.to_vec());
//! #         Ok(())
//! #     }
//! # }
//!
//! let square = memoized("square", |x: u64| CacheResult::Ok(x * x));
//!
//! let backend = Arc::new(MapBackend::default());
//! let value = context::with_backend(backend, || square.call(4))?;
//! assert_eq!(value, 16);
//! # Ok::<(), memoscope_core::CacheError>(())
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::context;
use crate::error::{CacheError, CacheResult};
use crate::key::{ArgKey, CacheKey};

/// A computation wrapped with a caching identity.
///
/// # Type Parameters
///
/// - `A`: the argument value (use a tuple for multi-argument computations)
/// - `T`: the result value, crossing the backend as JSON bytes
/// - `E`: the computation's error type; `E: From<CacheError>` so backend and
///   key-derivation failures surface through it unchanged
/// - `F`: the computation
/// - `M`: the argument mapper
pub struct Memoized<A, T, E, F, M> {
    name: String,
    f: F,
    mapper: M,
    _marker: PhantomData<fn(A) -> (T, E)>,
}

/// Wrap a computation with the default argument mapper.
///
/// The default mapper projects the whole argument value via its JSON
/// encoding, so `A` must be `Serialize`. For argument types that are not
/// serializable, or whose serialization is not deterministic, use
/// [`memoized_with`] and supply a custom mapper.
///
/// `name` must be unique among memoized operations sharing a backend;
/// two operations with the same name and equal argument keys will collide.
pub fn memoized<A, T, E, F>(
    name: impl Into<String>,
    f: F,
) -> Memoized<A, T, E, F, fn(&A) -> CacheResult<ArgKey>>
where
    A: Serialize,
    F: Fn(A) -> Result<T, E>,
{
    Memoized {
        name: name.into(),
        f,
        mapper: default_mapper::<A>,
        _marker: PhantomData,
    }
}

/// Wrap a computation with a caller-supplied argument mapper.
///
/// The mapper must be a pure, deterministic projection of the arguments:
/// equal logical identities must map to equal [`ArgKey`]s. This is the
/// extension point for normalizing non-serializable arguments, or for
/// collapsing structurally different but semantically equal arguments onto
/// one key.
pub fn memoized_with<A, T, E, F, M>(name: impl Into<String>, mapper: M, f: F) -> Memoized<A, T, E, F, M>
where
    F: Fn(A) -> Result<T, E>,
    M: Fn(&A) -> CacheResult<ArgKey>,
{
    Memoized {
        name: name.into(),
        f,
        mapper,
        _marker: PhantomData,
    }
}

/// Default projection: JSON encoding of the whole argument value.
fn default_mapper<A: Serialize>(args: &A) -> CacheResult<ArgKey> {
    Ok(ArgKey::of(args)?)
}

impl<A, T, E, F, M> Memoized<A, T, E, F, M>
where
    T: Serialize + DeserializeOwned,
    E: From<CacheError>,
    F: Fn(A) -> Result<T, E>,
    M: Fn(&A) -> CacheResult<ArgKey>,
{
    /// The unique name identifying this memoized operation.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the computation through the cache.
    ///
    /// With no backend bound to the current thread, this is exactly a call to
    /// the wrapped computation: no lookup, no store, and no failure can be
    /// introduced by the caching layer. Otherwise the stored value for the
    /// derived key is returned on a hit, and on a miss the computation runs
    /// and its result is stored before being returned.
    ///
    /// Failures propagate unchanged: a failing computation stores nothing,
    /// and backend or key-derivation failures surface as-is with no retry
    /// and no fallback to uncached execution.
    pub fn call(&self, args: A) -> Result<T, E> {
        let Some(backend) = context::current() else {
            debug!(name = %self.name, "no backend bound, caching disabled for this call");
            return (self.f)(args);
        };

        let arg_key = (self.mapper)(&args).map_err(E::from)?;
        let key = CacheKey::derive(&self.name, &arg_key);

        if let Some(bytes) = backend.get(&key).map_err(|e| E::from(CacheError::from(e)))? {
            let value = serde_json::from_slice(&bytes).map_err(|e| {
                E::from(CacheError::Codec {
                    name: self.name.clone(),
                    reason: e.to_string(),
                })
            })?;
            debug!(name = %self.name, %key, "cache hit");
            return Ok(value);
        }

        debug!(name = %self.name, %key, "cache miss, computing");
        let value = (self.f)(args)?;
        let bytes = serde_json::to_vec(&value).map_err(|e| {
            E::from(CacheError::Codec {
                name: self.name.clone(),
                reason: e.to_string(),
            })
        })?;
        backend.set(&key, &bytes).map_err(|e| E::from(CacheError::from(e)))?;
        Ok(value)
    }
}
