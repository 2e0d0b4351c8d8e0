//! Binary min-heap primitives over slices.
//!
//! `heap[..size]` is a heap when no element compares less than its parent. The
//! direct functions move elements; the indirect ones move indices into a reference
//! array and keep the inverse array `inv` (reference index -> heap position) in sync.

use core::cmp::Ordering;

use crate::comparator::Comparator;

/// Moves `heap[i]` down until the heap property holds below it. Returns its new position.
pub fn down_heap<T, C>(heap: &mut [T], size: usize, mut i: usize, c: &C) -> usize
where
    C: Comparator<T> + ?Sized,
{
    debug_assert!(i < size);
    loop {
        let left = 2 * i + 1;
        if left >= size {
            return i;
        }
        let right = left + 1;
        let child = if right < size && c.less(&heap[right], &heap[left]) {
            right
        } else {
            left
        };
        if c.compare(&heap[i], &heap[child]) != Ordering::Greater {
            return i;
        }
        heap.swap(i, child);
        i = child;
    }
}

/// Moves `heap[i]` up until its parent is not greater. Returns its new position.
pub fn up_heap<T, C>(heap: &mut [T], size: usize, mut i: usize, c: &C) -> usize
where
    C: Comparator<T> + ?Sized,
{
    debug_assert!(i < size);
    while i != 0 {
        let parent = (i - 1) / 2;
        if c.compare(&heap[parent], &heap[i]) != Ordering::Greater {
            break;
        }
        heap.swap(i, parent);
        i = parent;
    }
    i
}

/// Turns `heap[..size]` into a heap in linear time.
pub fn make_heap<T, C>(heap: &mut [T], size: usize, c: &C)
where
    C: Comparator<T> + ?Sized,
{
    for i in (0..size / 2).rev() {
        down_heap(heap, size, i, c);
    }
}

#[inline]
fn swap_indirect(heap: &mut [usize], inv: &mut [usize], a: usize, b: usize) {
    heap.swap(a, b);
    inv[heap[a]] = a;
    inv[heap[b]] = b;
}

/// [`down_heap`] over indices into `refs`.
pub fn down_heap_indirect<T, C>(
    refs: &[T],
    heap: &mut [usize],
    inv: &mut [usize],
    size: usize,
    mut i: usize,
    c: &C,
) -> usize
where
    C: Comparator<T> + ?Sized,
{
    debug_assert!(i < size);
    loop {
        let left = 2 * i + 1;
        if left >= size {
            return i;
        }
        let right = left + 1;
        let child = if right < size && c.less(&refs[heap[right]], &refs[heap[left]]) {
            right
        } else {
            left
        };
        if c.compare(&refs[heap[i]], &refs[heap[child]]) != Ordering::Greater {
            return i;
        }
        swap_indirect(heap, inv, i, child);
        i = child;
    }
}

/// [`up_heap`] over indices into `refs`.
pub fn up_heap_indirect<T, C>(
    refs: &[T],
    heap: &mut [usize],
    inv: &mut [usize],
    size: usize,
    mut i: usize,
    c: &C,
) -> usize
where
    C: Comparator<T> + ?Sized,
{
    debug_assert!(i < size);
    while i != 0 {
        let parent = (i - 1) / 2;
        if c.compare(&refs[heap[parent]], &refs[heap[i]]) != Ordering::Greater {
            break;
        }
        swap_indirect(heap, inv, i, parent);
        i = parent;
    }
    i
}

/// [`make_heap`] over indices into `refs`. `inv` must already map every queued index.
pub fn make_heap_indirect<T, C>(refs: &[T], heap: &mut [usize], inv: &mut [usize], size: usize, c: &C)
where
    C: Comparator<T> + ?Sized,
{
    for i in (0..size / 2).rev() {
        down_heap_indirect(refs, heap, inv, size, i, c);
    }
}

/// Collects into `out` the queued indices whose values compare equal to the top.
///
/// Only subtrees whose root equals the top can contain such indices, so the walk
/// stops at the first greater node on every path.
pub fn front_indirect<T, C>(refs: &[T], heap: &[usize], size: usize, out: &mut Vec<usize>, c: &C) -> usize
where
    C: Comparator<T> + ?Sized,
{
    out.clear();
    if size == 0 {
        return 0;
    }
    let top = &refs[heap[0]];
    let mut stack = vec![0usize];
    while let Some(i) = stack.pop() {
        if c.compare(&refs[heap[i]], top) != Ordering::Equal {
            continue;
        }
        out.push(heap[i]);
        for child in [2 * i + 1, 2 * i + 2] {
            if child < size {
                stack.push(child);
            }
        }
    }
    out.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::{NaturalOrder, ReverseOrder};
    use rand::Rng;

    fn is_heap<T, C: Comparator<T>>(heap: &[T], c: &C) -> bool {
        (1..heap.len()).all(|i| c.compare(&heap[(i - 1) / 2], &heap[i]) != Ordering::Greater)
    }

    #[test]
    fn test_heaps_make_heap_random() {
        let mut rng = rand::thread_rng();
        for len in [0usize, 1, 2, 7, 64, 301] {
            let mut v: Vec<i32> = (0..len).map(|_| rng.gen_range(-50..50)).collect();
            make_heap(&mut v, len, &NaturalOrder);
            assert!(is_heap(&v, &NaturalOrder));
            make_heap(&mut v, len, &ReverseOrder(NaturalOrder));
            assert!(is_heap(&v, &ReverseOrder(NaturalOrder)));
        }
    }

    #[test]
    fn test_heaps_up_and_down_positions() {
        let mut heap = vec![1, 3, 2, 7, 4];
        heap.push(0);
        let pos = up_heap(&mut heap, 6, 5, &NaturalOrder);
        assert_eq!(pos, 0);
        assert!(is_heap(&heap, &NaturalOrder));

        heap[0] = 9;
        let pos = down_heap(&mut heap, 6, 0, &NaturalOrder);
        assert_ne!(pos, 0);
        assert_eq!(heap[0], 1);
        assert!(is_heap(&heap, &NaturalOrder));
    }

    #[test]
    fn test_heaps_indirect_keeps_inverse() {
        let refs = [50, 10, 40, 20, 30];
        let mut heap: Vec<usize> = (0..refs.len()).collect();
        let mut inv: Vec<usize> = (0..refs.len()).collect();
        make_heap_indirect(&refs, &mut heap, &mut inv, refs.len(), &NaturalOrder);
        assert_eq!(heap[0], 1);
        for (pos, &r) in heap.iter().enumerate() {
            assert_eq!(inv[r], pos);
        }
        let values: Vec<i32> = heap.iter().map(|&r| refs[r]).collect();
        assert!(is_heap(&values, &NaturalOrder));
    }

    #[test]
    fn test_heaps_front_collects_ties() {
        let refs = [3, 1, 1, 2, 1];
        let mut heap: Vec<usize> = (0..refs.len()).collect();
        let mut inv: Vec<usize> = (0..refs.len()).collect();
        make_heap_indirect(&refs, &mut heap, &mut inv, refs.len(), &NaturalOrder);
        let mut out = Vec::new();
        assert_eq!(front_indirect(&refs, &heap, refs.len(), &mut out, &NaturalOrder), 3);
        out.sort_unstable();
        assert_eq!(out, vec![1, 2, 4]);
    }
}
