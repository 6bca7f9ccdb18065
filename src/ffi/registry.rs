use std::{
    cmp::Ordering,
    ffi::{CStr, c_char, c_int, c_void},
};

use libc::size_t;

use crate::error::{Error, Result};

use super::{lifecycle, ordering_from_c};

pub type DestructorFn = unsafe extern "C" fn(state: *mut c_void);

pub type CompareFn = unsafe extern "C" fn(
    state: *mut c_void,
    a: *const c_char,
    a_len: size_t,
    b: *const c_char,
    b_len: size_t,
) -> c_int;

pub type NameFn = unsafe extern "C" fn(state: *mut c_void) -> *const c_char;

/// The four arguments of the engine's comparator constructor.
///
/// Owning one of these means owning the state behind it: exactly one call to
/// the destructor must eventually happen, and nothing may be called after it.
#[derive(Clone, Copy, Debug)]
pub struct RawComparator {
    state: *mut c_void,
    destructor: DestructorFn,
    compare: CompareFn,
    name: NameFn,
    tracked: bool,
}

// The state is only ever read through `compare` and `name`, and every state we
// build wraps a `Send + Sync` comparator.
unsafe impl Send for RawComparator {}
unsafe impl Sync for RawComparator {}

impl RawComparator {
    /// # Safety
    ///
    /// The callbacks must accept `state` from any thread until `destructor`
    /// runs, and `destructor` must release everything behind it.
    pub unsafe fn from_parts(
        state: *mut c_void,
        destructor: DestructorFn,
        compare: CompareFn,
        name: NameFn,
    ) -> Self {
        Self {
            state,
            destructor,
            compare,
            name,
            tracked: false,
        }
    }

    pub(crate) fn with_tracking(mut self, tracked: bool) -> Self {
        self.tracked = tracked;
        self
    }

    /// Whether the state sits in the live handle set.
    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub fn state(&self) -> *mut c_void {
        self.state
    }

    pub fn destructor_fn(&self) -> DestructorFn {
        self.destructor
    }

    pub fn compare_fn(&self) -> CompareFn {
        self.compare
    }

    pub fn name_fn(&self) -> NameFn {
        self.name
    }

    /// # Safety
    ///
    /// `self` must not have been destroyed.
    pub unsafe fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        let res = unsafe {
            (self.compare)(
                self.state,
                a.as_ptr().cast(),
                a.len(),
                b.as_ptr().cast(),
                b.len(),
            )
        };
        ordering_from_c(res)
    }

    /// # Safety
    ///
    /// `self` must not have been destroyed, and the returned name must not be
    /// used after it is.
    pub unsafe fn name(&self) -> &CStr {
        unsafe { CStr::from_ptr((self.name)(self.state)) }
    }

    /// # Safety
    ///
    /// Must be called exactly once, with no other call in flight or following.
    pub unsafe fn destroy(self) {
        unsafe { (self.destructor)(self.state) }
    }

    /// Reports a handle that is not live as an error instead of aborting.
    /// Untracked handles and release builds cannot tell and always return `Ok`.
    pub fn check_live(&self) -> Result<()> {
        if !self.tracked || lifecycle::is_live(self.state) {
            Ok(())
        } else {
            Err(Error::ContractViolation(format!(
                "comparator state {:p} is not live",
                self.state
            )))
        }
    }
}

/// The engine side of the boundary: whatever accepts a [`RawComparator`] and
/// wraps it into the engine's own comparator object.
///
/// # Safety
///
/// Implementors take ownership of the raw comparator. They must call its
/// destructor exactly once and must not call `compare` or `name` afterwards.
pub unsafe trait ComparatorRegistry {
    type Comparator;

    fn create_comparator(&self, raw: RawComparator) -> Self::Comparator;
}
