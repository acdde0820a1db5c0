//! Per-thread binding of the active cache backend.
//!
//! Each execution context (OS thread) holds at most one active [`Backend`].
//! The binding lives in a thread-local cell that only this module touches;
//! everything else goes through [`bind`], [`current`], [`unbind`], and the
//! scoped constructs.
//!
//! # Scope semantics
//!
//! Scope exit clears the binding to absent - it does NOT restore a previous
//! binding. Nested scopes therefore overwrite the outer binding, and when the
//! inner scope ends the thread has no binding at all. This matches the
//! set-then-clear discipline of the original design rather than a stack.
//!
//! # Isolation
//!
//! The binding is a property of the calling thread. Binding a backend on one
//! thread is never visible to any other thread.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::backend::Backend;

thread_local! {
    static ACTIVE_BACKEND: RefCell<Option<Arc<dyn Backend>>> = const { RefCell::new(None) };
}

/// Set the active backend for the current thread.
pub fn bind(backend: Arc<dyn Backend>) {
    ACTIVE_BACKEND.with(|cell| *cell.borrow_mut() = Some(backend));
}

/// Clear the current thread's binding.
pub fn unbind() {
    ACTIVE_BACKEND.with(|cell| *cell.borrow_mut() = None);
}

/// Get the active backend for the current thread, if any.
pub fn current() -> Option<Arc<dyn Backend>> {
    ACTIVE_BACKEND.with(|cell| cell.borrow().clone())
}

/// Guard that clears the current thread's binding when dropped.
///
/// Returned by [`scoped`]. Dropping the guard unbinds unconditionally,
/// including during unwinding, so a binding can never leak past its scope.
/// The guard is `!Send`: it must be dropped on the thread that created it.
#[must_use = "dropping the guard immediately clears the binding"]
pub struct BindGuard {
    // Thread-locals are per thread; keep the guard on the thread it bound.
    _not_send: PhantomData<*const ()>,
}

impl Drop for BindGuard {
    fn drop(&mut self) {
        unbind();
    }
}

/// Bind a backend for the lifetime of the returned guard.
///
/// See the module docs for the non-restoring exit semantics.
pub fn scoped(backend: Arc<dyn Backend>) -> BindGuard {
    bind(backend);
    BindGuard {
        _not_send: PhantomData,
    }
}

/// Run a block of work with a backend bound, clearing the binding afterwards.
///
/// The binding is cleared on every exit path, including a panic propagating
/// out of `work`. See the module docs for the non-restoring exit semantics.
pub fn with_backend<R>(backend: Arc<dyn Backend>, work: impl FnOnce() -> R) -> R {
    let _guard = scoped(backend);
    work()
}
