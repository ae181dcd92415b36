//! Ordering key shared by every catalog level

/// An element of a catalog sequence, identified by a string key
///
/// Keys are compared byte-wise, so canonical order matches the order produced
/// by sorting the raw key strings.
pub trait Keyed {
    /// Key identifying this element within its parent sequence
    fn key(&self) -> &str;
}

/// Stable-sort a sequence ascending by key
#[inline]
pub fn sort_by_key<T: Keyed>(items: &mut [T]) {
    items.sort_by(|a, b| a.key().cmp(b.key()));
}

/// Check that a sequence is strictly ascending by key (sorted, no duplicates)
#[inline]
#[must_use]
pub fn is_canonical<T: Keyed>(items: &[T]) -> bool {
    items.windows(2).all(|pair| pair[0].key() < pair[1].key())
}
