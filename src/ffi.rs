use std::{cmp::Ordering, ffi::c_int};

pub(crate) mod adapter;
mod lifecycle;
mod registry;

pub mod prelude {
    #![allow(unused)]

    pub use super::{
        adapter::{ComparatorAdapter, create_comparator},
        lifecycle::is_live,
        ordering_from_c, ordering_to_c,
        registry::{ComparatorRegistry, CompareFn, DestructorFn, NameFn, RawComparator},
    };
}

/// `Less` -> -1, `Equal` -> 0, `Greater` -> 1.
pub fn ordering_to_c(ord: Ordering) -> c_int {
    ord as c_int
}

/// Any negative value is `Less`, any positive value is `Greater`.
pub fn ordering_from_c(res: c_int) -> Ordering {
    res.cmp(&0)
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering::*;

    use super::{ordering_from_c, ordering_to_c};

    #[test]
    fn sign_convention() {
        assert_eq!(ordering_to_c(Less), -1);
        assert_eq!(ordering_to_c(Equal), 0);
        assert_eq!(ordering_to_c(Greater), 1);

        assert_eq!(ordering_from_c(i32::MIN), Less);
        assert_eq!(ordering_from_c(-7), Less);
        assert_eq!(ordering_from_c(0), Equal);
        assert_eq!(ordering_from_c(42), Greater);
        assert_eq!(ordering_from_c(i32::MAX), Greater);

        for ord in [Less, Equal, Greater] {
            assert_eq!(ordering_from_c(ordering_to_c(ord)), ord);
        }
    }
}
