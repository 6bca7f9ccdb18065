use super::Comparator;

pub const BYTEWISE_COMPARATOR_NAME: &str = "leveldb.BytewiseComparator";

/// Lexicographic byte order, same as the engine's built-in comparator.
#[derive(Clone, Copy, Debug, Default)]
pub struct BytewiseComparator;

impl Comparator for BytewiseComparator {
    fn name(&self) -> &str {
        BYTEWISE_COMPARATOR_NAME
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> std::cmp::Ordering {
        a.cmp(b)
    }
}
