use std::{
    cmp,
    ffi::{CStr, CString, c_char, c_int, c_void},
    fmt, slice,
};

use libc::size_t;

use crate::{
    comparator::prelude::*,
    error::{Error, Result},
};

use super::{
    lifecycle, ordering_to_c,
    registry::{ComparatorRegistry, RawComparator},
};

/// Owns everything the engine needs to call back into a Rust comparator:
/// the NUL-terminated name and the comparator itself. Both are released by the
/// same drop.
pub struct ComparatorAdapter<C>
where
    C: Comparator,
{
    name: CString,
    c: C,
    track_lifecycle: bool,
}

pub(crate) fn make_name(name: &str) -> Result<CString> {
    if name.is_empty() {
        return Err(Error::InvalidName("name is empty".to_string()));
    }
    CString::new(name).map_err(|e| {
        Error::InvalidName(format!(
            "{name:?} has a nul byte at position {}",
            e.nul_position()
        ))
    })
}

impl<C> ComparatorAdapter<C>
where
    C: Comparator,
{
    /// Copies `c.name()` into adapter-owned storage.
    ///
    /// Fails if the name is empty or contains a nul byte.
    pub fn new(c: C) -> Result<Self> {
        let name = make_name(c.name())?;
        Ok(Self::from_parts(name, c, cfg!(debug_assertions)))
    }

    pub(crate) fn from_parts(name: CString, c: C, track_lifecycle: bool) -> Self {
        tracing::debug!(name = ?name, "comparator adapter created");
        Self {
            name,
            c,
            track_lifecycle,
        }
    }

    pub fn name(&self) -> &CStr {
        &self.name
    }

    pub fn tracks_lifecycle(&self) -> bool {
        self.track_lifecycle
    }

    pub fn comparator(&self) -> &C {
        &self.c
    }

    pub fn compare(&self, a: &[u8], b: &[u8]) -> cmp::Ordering {
        self.c.compare(a, b)
    }

    /// Moves the adapter to the heap and hands out the raw parts. The caller
    /// now owns the allocation and must release it through the destructor.
    pub fn into_raw(self) -> RawComparator {
        let track = self.track_lifecycle;
        let state = Box::into_raw(Box::new(self)).cast::<c_void>();

        if track {
            lifecycle::track(state);
            unsafe {
                RawComparator::from_parts(
                    state,
                    destroy_trampoline::<C, true>,
                    compare_trampoline::<C, true>,
                    name_trampoline::<C, true>,
                )
            }
            .with_tracking(true)
        } else {
            unsafe {
                RawComparator::from_parts(
                    state,
                    destroy_trampoline::<C, false>,
                    compare_trampoline::<C, false>,
                    name_trampoline::<C, false>,
                )
            }
        }
    }

    pub fn register<R>(self, registry: &R) -> R::Comparator
    where
        R: ComparatorRegistry,
    {
        let raw = self.into_raw();
        tracing::trace!(state = ?raw.state(), "registering comparator");
        registry.create_comparator(raw)
    }
}

impl<F> ComparatorAdapter<FnComparator<F>>
where
    F: Fn(&[u8], &[u8]) -> cmp::Ordering + Send + Sync + 'static,
{
    pub fn from_fn(name: impl Into<String>, f: F) -> Result<Self> {
        Self::new(FnComparator::new(name, f))
    }
}

impl<C> fmt::Debug for ComparatorAdapter<C>
where
    C: Comparator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorAdapter")
            .field("name", &self.name)
            .field("track_lifecycle", &self.track_lifecycle)
            .finish_non_exhaustive()
    }
}

impl<C> Drop for ComparatorAdapter<C>
where
    C: Comparator,
{
    fn drop(&mut self) {
        tracing::debug!(name = ?self.name, "comparator adapter dropped");
    }
}

/// Builds an adapter around `f` and registers it in one go.
pub fn create_comparator<R, F>(
    registry: &R,
    name: impl Into<String>,
    f: F,
) -> Result<R::Comparator>
where
    R: ComparatorRegistry,
    F: Fn(&[u8], &[u8]) -> cmp::Ordering + Send + Sync + 'static,
{
    Ok(ComparatorAdapter::from_fn(name, f)?.register(registry))
}

unsafe fn adapter_ref<'a, C, const CHECKED: bool>(
    state: *mut c_void,
    op: &'static str,
) -> &'a ComparatorAdapter<C>
where
    C: Comparator,
{
    if CHECKED {
        lifecycle::ensure_live(state, op);
    }
    unsafe { &*state.cast::<ComparatorAdapter<C>>() }
}

/// The engine may pass a null pointer for an empty key.
unsafe fn key<'a>(ptr: *const c_char, len: size_t) -> &'a [u8] {
    if len == 0 {
        &[]
    } else {
        unsafe { slice::from_raw_parts(ptr.cast::<u8>(), len) }
    }
}

unsafe extern "C" fn compare_trampoline<C, const CHECKED: bool>(
    state: *mut c_void,
    a: *const c_char,
    a_len: size_t,
    b: *const c_char,
    b_len: size_t,
) -> c_int
where
    C: Comparator,
{
    let adapter = unsafe { adapter_ref::<C, CHECKED>(state, "compare") };
    let (a, b) = unsafe { (key(a, a_len), key(b, b_len)) };
    ordering_to_c(adapter.c.compare(a, b))
}

unsafe extern "C" fn name_trampoline<C, const CHECKED: bool>(
    state: *mut c_void,
) -> *const c_char
where
    C: Comparator,
{
    let adapter = unsafe { adapter_ref::<C, CHECKED>(state, "name") };
    adapter.name.as_ptr()
}

unsafe extern "C" fn destroy_trampoline<C, const CHECKED: bool>(state: *mut c_void)
where
    C: Comparator,
{
    if CHECKED && !lifecycle::untrack(state) {
        lifecycle::violation(state, "destroy");
    }
    drop(unsafe { Box::from_raw(state.cast::<ComparatorAdapter<C>>()) });
}
