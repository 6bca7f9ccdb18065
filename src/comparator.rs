use std::cmp;

mod bytewise_comparator;
mod fn_comparator;

pub mod prelude {
    #![allow(unused)]

    pub use super::{
        Comparator,
        bytewise_comparator::{BYTEWISE_COMPARATOR_NAME, BytewiseComparator},
        fn_comparator::FnComparator,
    };
}

/// A total order over byte keys.
///
/// The store persists keys in the order this defines, so `compare` must be
/// deterministic, antisymmetric and transitive for the whole life of a
/// database, and `name` must change whenever the order does.
pub trait Comparator: Send + Sync {
    fn name(&self) -> &str;

    fn compare(&self, a: &[u8], b: &[u8]) -> cmp::Ordering;
}
