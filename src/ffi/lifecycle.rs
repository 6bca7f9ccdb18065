//! Liveness bookkeeping for adapter handles handed to the engine.
//!
//! Only compiled in with `debug_assertions`. Release builds trust the engine's
//! contract and every check here becomes a no-op.

use std::ffi::c_void;

#[cfg(debug_assertions)]
use std::collections::BTreeSet;

#[cfg(debug_assertions)]
use parking_lot::{RwLock, const_rwlock};

#[cfg(debug_assertions)]
static LIVE: RwLock<BTreeSet<usize>> = const_rwlock(BTreeSet::new());

pub(crate) fn track(state: *const c_void) {
    #[cfg(debug_assertions)]
    {
        let inserted = LIVE.write().insert(state as usize);
        debug_assert!(inserted, "handle {state:p} tracked twice");
    }
    #[cfg(not(debug_assertions))]
    let _ = state;
}

/// Returns `false` if the handle was not live.
pub(crate) fn untrack(state: *const c_void) -> bool {
    #[cfg(debug_assertions)]
    {
        LIVE.write().remove(&(state as usize))
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = state;
        true
    }
}

/// Whether `state` belongs to an adapter that has been handed out and not yet
/// destroyed. Always `true` in release builds.
pub fn is_live(state: *const c_void) -> bool {
    #[cfg(debug_assertions)]
    {
        LIVE.read().contains(&(state as usize))
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = state;
        true
    }
}

pub(crate) fn ensure_live(state: *const c_void, op: &'static str) {
    if !is_live(state) {
        violation(state, op);
    }
}

/// Unwinding out of an `extern "C"` callback is not an option, so a broken
/// engine contract ends the process here.
pub(crate) fn violation(state: *const c_void, op: &'static str) -> ! {
    tracing::error!(?state, op, "comparator handle used while not live");
    std::process::abort();
}
