//! End-to-end coverage of the memoizing wrapper over the concrete backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use memoscope_backends::{FsBackend, MemoryBackend};
use memoscope_core::{context, memoized, CacheResult};

#[test]
fn square_scenario_over_memory_backend() {
    let calls = AtomicUsize::new(0);
    let square = memoized("square", |x: u64| {
        calls.fetch_add(1, Ordering::SeqCst);
        CacheResult::Ok(x * x)
    });

    let backend = Arc::new(MemoryBackend::new());
    context::with_backend(backend.clone(), || {
        assert_eq!(square.call(4).unwrap(), 16);
        assert_eq!(square.call(4).unwrap(), 16);
        assert_eq!(square.call(5).unwrap(), 25);
    });

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let stats = backend.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.stores, 2);
    assert_eq!(backend.len(), 2);
}

#[test]
fn binding_is_released_after_panic_and_calls_run_uncached() {
    let calls = AtomicUsize::new(0);
    let square = memoized("square", |x: u64| {
        calls.fetch_add(1, Ordering::SeqCst);
        CacheResult::Ok(x * x)
    });

    let backend = Arc::new(MemoryBackend::new());
    let panicked = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        context::with_backend(backend.clone(), || {
            square.call(4).unwrap();
            panic!("abrupt exit");
        })
    }));
    assert!(panicked.is_err());
    assert!(context::current().is_none());

    // With the binding gone, every call recomputes and the store is idle.
    square.call(4).unwrap();
    square.call(4).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(backend.stats().stores, 1);
}

#[test]
fn one_backend_shared_by_two_bound_threads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::new());

    let run = |backend: Arc<MemoryBackend>, calls: Arc<AtomicUsize>| {
        std::thread::spawn(move || {
            let square = memoized("square", move |x: u64| {
                calls.fetch_add(1, Ordering::SeqCst);
                CacheResult::Ok(x * x)
            });
            context::with_backend(backend, || square.call(4).unwrap())
        })
        .join()
        .unwrap()
    };

    assert_eq!(run(backend.clone(), calls.clone()), 16);
    // The second thread binds the same instance and hits the warm entry.
    assert_eq!(run(backend.clone(), calls.clone()), 16);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn fs_backend_persists_results_across_scopes() {
    let root = tempfile::tempdir().unwrap();
    let calls = AtomicUsize::new(0);
    let square = memoized("square", |x: u64| {
        calls.fetch_add(1, Ordering::SeqCst);
        CacheResult::Ok(x * x)
    });

    {
        let backend = Arc::new(FsBackend::new(root.path()).unwrap());
        context::with_backend(backend, || {
            assert_eq!(square.call(4).unwrap(), 16);
        });
    }

    // A fresh backend instance over the same directory serves the hit.
    {
        let backend = Arc::new(FsBackend::new(root.path()).unwrap());
        context::with_backend(backend, || {
            assert_eq!(square.call(4).unwrap(), 16);
        });
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn structured_values_roundtrip_through_the_cache() {
    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Summary {
        total: i64,
        labels: Vec<String>,
    }

    let calls = AtomicUsize::new(0);
    let summarize = memoized("summarize", |inputs: Vec<i64>| {
        calls.fetch_add(1, Ordering::SeqCst);
        CacheResult::Ok(Summary {
            total: inputs.iter().sum(),
            labels: inputs.iter().map(|v| format!("item-{v}")).collect(),
        })
    });

    let backend = Arc::new(MemoryBackend::new());
    context::with_backend(backend, || {
        let first = summarize.call(vec![1, 2, 3]).unwrap();
        let second = summarize.call(vec![1, 2, 3]).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total, 6);
    });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
