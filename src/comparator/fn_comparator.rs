use std::{cmp, fmt};

use super::Comparator;

/// A named closure acting as a [`Comparator`].
///
/// The closure is moved in, so whatever it captures lives as long as the
/// comparator does.
pub struct FnComparator<F> {
    name: String,
    f: F,
}

impl<F> FnComparator<F>
where
    F: Fn(&[u8], &[u8]) -> cmp::Ordering + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Clone for FnComparator<F>
where
    F: Clone,
{
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            f: self.f.clone(),
        }
    }
}

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComparator")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F> Comparator for FnComparator<F>
where
    F: Fn(&[u8], &[u8]) -> cmp::Ordering + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> cmp::Ordering {
        (self.f)(a, b)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cmp::Ordering::*,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use crate::comparator::prelude::*;

    #[test]
    fn forwards_to_closure() {
        let cmp = FnComparator::new("reverse-lex", |a: &[u8], b: &[u8]| b.cmp(a));

        assert_eq!(cmp.name(), "reverse-lex");
        assert_eq!(cmp.compare(b"apple", b"banana"), Greater);
        assert_eq!(cmp.compare(b"banana", b"apple"), Less);
        assert_eq!(cmp.compare(b"apple", b"apple"), Equal);
    }

    #[test]
    fn captured_state_outlives_caller() {
        let calls = Arc::new(AtomicUsize::new(0));

        let cmp = {
            let calls = calls.clone();
            FnComparator::new("counting", move |a: &[u8], b: &[u8]| {
                calls.fetch_add(1, Ordering::Relaxed);
                a.cmp(b)
            })
        };

        for _ in 0..10 {
            cmp.compare(b"a", b"b");
        }
        assert_eq!(calls.load(Ordering::Relaxed), 10);

        drop(cmp);
        assert_eq!(Arc::strong_count(&calls), 1);
    }
}
