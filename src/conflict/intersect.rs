//! Sorted-container intersection used to decide whether two interlocking
//! routes share a resource.

use std::cmp::Ordering;

/// Whether `items` is sorted ascending (duplicates allowed)
#[inline]
pub fn is_sorted<T: Ord>(items: &[T]) -> bool {
    items.windows(2).all(|w| w[0] <= w[1])
}

/// Multiset intersection of two sorted slices
///
/// An element present `k1` times in `a` and `k2` times in `b` appears
/// `min(k1, k2)` times in the sorted result. Runs in O(|a| + |b|).
///
/// # Panics
///
/// Panics if either input is not sorted. Passing unsorted input is a
/// contract violation by the caller.
#[must_use]
pub fn intersect<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    assert!(is_sorted(a), "first input is not sorted before intersecting");
    assert!(is_sorted(b), "second input is not sorted before intersecting");

    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                result.push(a[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    result
}

/// Whether two sorted slices share at least one element, without allocating
///
/// # Panics
///
/// Panics if either input is not sorted.
#[must_use]
pub fn intersects<T: Ord>(a: &[T], b: &[T]) -> bool {
    assert!(is_sorted(a), "first input is not sorted before intersecting");
    assert!(is_sorted(b), "second input is not sorted before intersecting");

    // Disjoint value ranges cannot share anything
    match (a.first(), a.last(), b.first(), b.last()) {
        (Some(a_min), Some(a_max), Some(b_min), Some(b_max)) => {
            if a_max < b_min || b_max < a_min {
                return false;
            }
        }
        _ => return false,
    }

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => return true,
        }
    }
    false
}

/// Sort both containers in place, then intersect them
///
/// Opt-in convenience for callers holding unsorted data. Both inputs are
/// reordered; callers must not rely on their original order afterwards.
#[must_use]
pub fn sort_and_intersect<T: Ord + Clone>(a: &mut [T], b: &mut [T]) -> Vec<T> {
    a.sort_unstable();
    b.sort_unstable();
    intersect(a, b)
}
