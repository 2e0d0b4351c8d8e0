use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};

use crate::queues::PriorityQueue;

/// Capacity of a queue built with [`ArrayFifoQueue::new`].
pub const INITIAL_CAPACITY: usize = 4;

/// A FIFO queue with access at both ends, stored in a circular buffer.
///
/// The buffer always has one slot more than the capacity, so `start == end`
/// unambiguously means empty. It doubles when it fills up. A buffer of more than
/// [`INITIAL_CAPACITY`] slots halves when the length drops to a quarter of it, so
/// a buffer just above that size can end up with fewer slots.
///
/// As a [`PriorityQueue`] it dequeues in insertion order.
pub struct ArrayFifoQueue<T> {
    buf: Vec<Option<T>>,
    start: usize,
    end: usize,
}

fn empty_buf<T>(length: usize) -> Vec<Option<T>> {
    let mut buf = Vec::with_capacity(length);
    buf.resize_with(length, || None);
    buf
}

impl<T> ArrayFifoQueue<T> {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// A queue holding `capacity` elements before its first resize.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: empty_buf(capacity + 1),
            start: 0,
            end: 0,
        }
    }

    #[inline]
    fn length(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        if self.end >= self.start {
            self.end - self.start
        } else {
            self.length() - self.start + self.end
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Elements the buffer holds before it must grow.
    pub fn capacity(&self) -> usize {
        self.length() - 1
    }

    /// Moves the elements, in order, to the front of a buffer of `new_length` slots.
    fn resize(&mut self, new_length: usize) {
        let size = self.len();
        log::trace!(
            "ArrayFifoQueue resize: {} -> {} slots ({} elements)",
            self.length(),
            new_length,
            size
        );
        let mut old = std::mem::replace(&mut self.buf, empty_buf(new_length));
        let length = old.len();
        for (k, slot) in self.buf.iter_mut().take(size).enumerate() {
            *slot = old[(self.start + k) % length].take();
        }
        self.start = 0;
        self.end = size;
    }

    // The buffer is full when advancing `end` lands on `start`; grow right away.
    fn expand(&mut self) {
        let length = self.length();
        // `len()` reads 0 in this state, so lay out the full buffer by hand.
        let mut old = std::mem::replace(&mut self.buf, empty_buf(2 * length));
        for k in 0..length {
            self.buf[k] = old[(self.start + k) % length].take();
        }
        log::trace!("ArrayFifoQueue expand: {} -> {} slots", length, 2 * length);
        self.start = 0;
        self.end = length;
    }

    fn reduce(&mut self) {
        let length = self.length();
        if length > INITIAL_CAPACITY && self.len() <= length / 4 {
            self.resize(length / 2);
        }
    }

    /// Appends `item` at the back.
    pub fn enqueue(&mut self, item: T) {
        self.buf[self.end] = Some(item);
        self.end += 1;
        if self.end == self.length() {
            self.end = 0;
        }
        if self.end == self.start {
            self.expand();
        }
    }

    /// Inserts `item` at the front, so it is dequeued next.
    pub fn enqueue_first(&mut self, item: T) {
        if self.start == 0 {
            self.start = self.length();
        }
        self.start -= 1;
        self.buf[self.start] = Some(item);
        if self.end == self.start {
            self.expand();
        }
    }

    /// Removes the front element.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.buf[self.start].take();
        self.start += 1;
        if self.start == self.length() {
            self.start = 0;
        }
        self.reduce();
        item
    }

    /// Removes the back element.
    pub fn dequeue_last(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.end == 0 {
            self.end = self.length();
        }
        self.end -= 1;
        let item = self.buf[self.end].take();
        self.reduce();
        item
    }

    pub fn first(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.buf[self.start].as_ref()
    }

    pub fn first_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        self.buf[self.start].as_mut()
    }

    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let i = if self.end == 0 { self.length() } else { self.end } - 1;
        self.buf[i].as_ref()
    }

    pub fn clear(&mut self) {
        for slot in self.buf.iter_mut() {
            *slot = None;
        }
        self.start = 0;
        self.end = 0;
    }

    /// Shrinks the buffer to exactly the current length plus one slot.
    pub fn trim(&mut self) {
        let size = self.len();
        self.resize(size + 1);
    }

    /// Iterates from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            buf: &self.buf,
            front: self.start,
            remaining: self.len(),
        }
    }
}

impl<T> PriorityQueue<T> for ArrayFifoQueue<T> {
    fn enqueue(&mut self, item: T) {
        ArrayFifoQueue::enqueue(self, item);
    }
    fn dequeue(&mut self) -> Option<T> {
        ArrayFifoQueue::dequeue(self)
    }
    fn first(&self) -> Option<&T> {
        ArrayFifoQueue::first(self)
    }
    fn len(&self) -> usize {
        ArrayFifoQueue::len(self)
    }
    fn clear(&mut self) {
        ArrayFifoQueue::clear(self);
    }
}

// --- Iteration ---

/// Iterator over an [`ArrayFifoQueue`] from front to back.
pub struct Iter<'a, T> {
    buf: &'a [Option<T>],
    front: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let buf = self.buf;
        let item = buf[self.front].as_ref();
        self.front = (self.front + 1) % buf.len();
        self.remaining -= 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let buf = self.buf;
        buf[(self.front + self.remaining) % buf.len()].as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a ArrayFifoQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- Trait Implementations ---

impl<T: Clone> Clone for ArrayFifoQueue<T> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            start: self.start,
            end: self.end,
        }
    }
}

impl<T> Default for ArrayFifoQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug> Debug for ArrayFifoQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArrayFifoQueue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> Extend<T> for ArrayFifoQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.enqueue(item);
        }
    }
}

impl<T> FromIterator<T> for ArrayFifoQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Self::new();
        q.extend(iter);
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::VecDeque;

    #[test]
    fn test_fifo_queue_order() {
        let mut q = ArrayFifoQueue::new();
        assert_eq!(q.capacity(), INITIAL_CAPACITY);
        q.extend(1..=3);
        assert_eq!(q.first(), Some(&1));
        assert_eq!(q.last(), Some(&3));
        assert_eq!(q.dequeue(), Some(1));
        q.enqueue(4);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(q.dequeue_last(), Some(4));
        assert_eq!(q.len(), 2);
        q.clear();
        assert_eq!(q.dequeue(), None);
        assert_eq!(q.dequeue_last(), None);
        assert_eq!(q.first(), None);
        assert_eq!(q.last(), None);
    }

    #[test]
    fn test_fifo_queue_enqueue_first_wraps() {
        let mut q = ArrayFifoQueue::with_capacity(3);
        q.enqueue('b');
        q.enqueue_first('a');
        q.enqueue('c');
        assert_eq!(q.capacity(), 3);
        // Full: the next insertion doubles the buffer.
        q.enqueue_first('z');
        assert_eq!(q.capacity(), 7);
        assert_eq!(q.iter().collect::<String>(), "zabc");
        assert_eq!(q.iter().rev().collect::<String>(), "cbaz");
        if let Some(c) = q.first_mut() {
            *c = 'y';
        }
        assert_eq!(format!("{:?}", q), "['y', 'a', 'b', 'c']");
    }

    #[test]
    fn test_fifo_queue_grows_and_shrinks() {
        let mut q = ArrayFifoQueue::new();
        for i in 0..100 {
            q.enqueue(i);
        }
        assert_eq!(q.capacity(), 159);
        for i in 0..96 {
            assert_eq!(q.dequeue(), Some(i));
        }
        assert!(q.capacity() < 20);
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![96, 97, 98, 99]);
        q.trim();
        assert_eq!(q.capacity(), 4);
        assert_eq!(q.dequeue_last(), Some(99));
    }

    #[test]
    fn test_fifo_queue_random_against_vecdeque() {
        let mut rng = rand::thread_rng();
        let mut q = ArrayFifoQueue::new();
        let mut model = VecDeque::new();
        for step in 0..20_000u32 {
            match rng.gen_range(0..4) {
                0 => {
                    q.enqueue(step);
                    model.push_back(step);
                }
                1 => {
                    q.enqueue_first(step);
                    model.push_front(step);
                }
                2 => assert_eq!(q.dequeue(), model.pop_front()),
                _ => assert_eq!(q.dequeue_last(), model.pop_back()),
            }
            assert_eq!(q.len(), model.len());
            assert_eq!(q.first(), model.front());
            assert_eq!(q.last(), model.back());
        }
        assert!(q.iter().eq(model.iter()));
        let copy = q.clone();
        assert_eq!(copy, q);
        let rebuilt: ArrayFifoQueue<u32> = model.into_iter().collect();
        assert_eq!(rebuilt, q);
    }
}
