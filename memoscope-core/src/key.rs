//! Cache identity: argument keys and composite cache keys.
//!
//! A memoized call is identified by a pair: the operation's `name` and an
//! [`ArgKey`] derived from its arguments. [`CacheKey::derive`] folds the pair
//! into a single stable key suitable for any backend.
//!
//! # Determinism
//!
//! The default projection ([`ArgKey::of`]) serializes the argument value as
//! JSON. Tuples and structs serialize in declaration order, so equal-by-value
//! arguments always yield equal keys. Types with unordered serialization
//! (e.g. `HashMap`) or no `Serialize` impl at all should use a custom mapper
//! built with [`ArgKey::builder`] or any caller-supplied projection - that is
//! the intended extension point.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::KeyError;

/// Separator byte between the operation name and the argument key in the
/// composite key preimage.
const SEPARATOR: u8 = 0xFF;

/// Tag byte prefixing a positional part in a built [`ArgKey`].
const POSITIONAL_TAG: u8 = 0x00;

/// Tag byte prefixing a named part in a built [`ArgKey`].
const NAMED_TAG: u8 = 0x01;

/// A deterministic byte projection of a call's arguments.
///
/// Two calls with equal logical identity must produce equal `ArgKey`s; calls
/// with different identity must produce different ones. The projection is
/// caller-controlled: use [`ArgKey::of`] for a whole serializable argument
/// value, [`ArgKey::builder`] for ordered positional/named parts, or
/// [`ArgKey::from_bytes`] for a fully custom encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArgKey(Vec<u8>);

impl ArgKey {
    /// Project a single serializable value (typically the whole argument
    /// tuple) into an `ArgKey` via its JSON encoding.
    pub fn of<V>(value: &V) -> Result<Self, KeyError>
    where
        V: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value).map_err(|e| KeyError::Projection {
            reason: e.to_string(),
        })?;
        Ok(Self(bytes))
    }

    /// Build an `ArgKey` from ordered positional and named parts.
    pub fn builder() -> ArgKeyBuilder {
        ArgKeyBuilder { buf: Vec::new() }
    }

    /// Wrap pre-encoded bytes as an `ArgKey`.
    ///
    /// The caller is responsible for determinism of the encoding.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// The raw projection bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Builder for an [`ArgKey`] made of positional values in call order followed
/// by name/value pairs, matching the default identity shape for functions
/// with mixed positional and named arguments.
///
/// Every part is length-framed and tagged, so distinct part sequences can
/// never encode to the same bytes.
#[derive(Debug, Clone)]
pub struct ArgKeyBuilder {
    buf: Vec<u8>,
}

impl ArgKeyBuilder {
    /// Append a positional argument.
    pub fn positional<V>(mut self, value: &V) -> Result<Self, KeyError>
    where
        V: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value).map_err(|e| KeyError::Projection {
            reason: e.to_string(),
        })?;
        self.buf.push(POSITIONAL_TAG);
        push_frame(&mut self.buf, &bytes);
        Ok(self)
    }

    /// Append a named argument.
    pub fn named<V>(mut self, name: &str, value: &V) -> Result<Self, KeyError>
    where
        V: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(value).map_err(|e| KeyError::Projection {
            reason: e.to_string(),
        })?;
        self.buf.push(NAMED_TAG);
        push_frame(&mut self.buf, name.as_bytes());
        push_frame(&mut self.buf, &bytes);
        Ok(self)
    }

    /// Finish the projection.
    pub fn finish(self) -> ArgKey {
        ArgKey(self.buf)
    }
}

/// Append a length-prefixed frame.
fn push_frame(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}

/// The composite key addressing a stored result.
///
/// Derived deterministically from (name, argument-key) as the lowercase hex
/// of a SHA-256 digest. The preimage length-prefixes the name and inserts a
/// separator byte before the argument key, so no two distinct (name, arg-key)
/// pairs share a preimage; collisions are only those of SHA-256 itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive the composite key for an operation name and argument key.
    pub fn derive(name: &str, arg_key: &ArgKey) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name.as_bytes());
        hasher.update([SEPARATOR]);
        hasher.update(arg_key.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// The key as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
