use core::cmp::Ordering;
use core::mem;
use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::iter::{FromIterator, FusedIterator};
use std::ops::{Add, Bound, Index, IndexMut, RangeBounds};

use crate::comparator::{Comparator, NaturalOrder};
use crate::function::{self, Function};
use crate::utils::IndexType;

/// A sorted map implemented as a red-black tree.
///
/// # Overview
/// * **Arena:** nodes live in one `Vec` and link to each other by `u32` index
///   (`left`, `right`, `parent`). Removing a node moves the last node of the arena
///   into the hole, so the arena never has gaps.
/// * **Ordering:** any [`Comparator`], not just `Ord`. Use
///   [`FloatOrder`](crate::comparator::FloatOrder) for float keys or
///   [`ReverseOrder`](crate::comparator::ReverseOrder) for descending maps.
/// * **Navigation:** `floor`, `ceiling`, `lower`, `higher`, `range` and `iter_from`
///   run in O(log n) to position, O(1) amortized per step.
///
/// # Example
/// ```rust
/// use prim_collections::RBTreeMap;
///
/// let mut map = RBTreeMap::new();
/// for (k, v) in [(30, "c"), (10, "a"), (20, "b")] {
///     map.insert(k, v);
/// }
/// assert_eq!(map.first_key(), Some(&10));
/// assert_eq!(map.floor(&25), Some((&20, &"b")));
/// let tail: Vec<_> = map.range(15..).map(|(k, _)| *k).collect();
/// assert_eq!(tail, [20, 30]);
/// ```
pub struct RBTreeMap<K, V, C = NaturalOrder> {
    nodes: Vec<Node<K, V>>,
    root: u32,
    comparator: C,
    default_value: Option<V>,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: u32,
    right: u32,
    parent: u32,
    red: bool,
}

// --- Arena navigation shared by the map and its iterators ---

#[inline]
fn leftmost<K, V>(nodes: &[Node<K, V>], mut i: u32) -> u32 {
    while let Some(ix) = i.get() {
        let left = nodes[ix].left;
        if left.is_none() {
            break;
        }
        i = left;
    }
    i
}

#[inline]
fn rightmost<K, V>(nodes: &[Node<K, V>], mut i: u32) -> u32 {
    while let Some(ix) = i.get() {
        let right = nodes[ix].right;
        if right.is_none() {
            break;
        }
        i = right;
    }
    i
}

/// In-order successor of `i`, or `NONE`.
fn successor<K, V>(nodes: &[Node<K, V>], i: u32) -> u32 {
    let right = nodes[i.as_usize()].right;
    if right.is_some() {
        return leftmost(nodes, right);
    }
    let mut child = i;
    let mut parent = nodes[i.as_usize()].parent;
    while parent.is_some() && nodes[parent.as_usize()].right == child {
        child = parent;
        parent = nodes[parent.as_usize()].parent;
    }
    parent
}

/// In-order predecessor of `i`, or `NONE`.
fn predecessor<K, V>(nodes: &[Node<K, V>], i: u32) -> u32 {
    let left = nodes[i.as_usize()].left;
    if left.is_some() {
        return rightmost(nodes, left);
    }
    let mut child = i;
    let mut parent = nodes[i.as_usize()].parent;
    while parent.is_some() && nodes[parent.as_usize()].left == child {
        child = parent;
        parent = nodes[parent.as_usize()].parent;
    }
    parent
}

// --- 1. Construction & Accessors ---

impl<K, V> RBTreeMap<K, V, NaturalOrder> {
    /// Creates an empty map ordered by `K: Ord`.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, V> RBTreeMap<K, V, NaturalOrder> {
    /// Creates a map holding only `key -> value`.
    pub fn singleton(key: K, value: V) -> Self {
        let mut map = Self::new();
        map.insert(key, value);
        map
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: Vec::new(),
            root: u32::NONE,
            comparator,
            default_value: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = u32::NONE;
    }

    #[inline]
    fn node(&self, i: u32) -> &Node<K, V> {
        &self.nodes[i.as_usize()]
    }

    #[inline]
    fn node_mut(&mut self, i: u32) -> &mut Node<K, V> {
        &mut self.nodes[i.as_usize()]
    }

    #[inline]
    fn entry(&self, i: u32) -> Option<(&K, &V)> {
        i.get().map(|ix| {
            let node = &self.nodes[ix];
            (&node.key, &node.value)
        })
    }

    fn first_node(&self) -> u32 {
        leftmost(&self.nodes, self.root)
    }

    fn last_node(&self) -> u32 {
        rightmost(&self.nodes, self.root)
    }

    pub fn first_key(&self) -> Option<&K> {
        self.entry(self.first_node()).map(|(k, _)| k)
    }

    pub fn last_key(&self) -> Option<&K> {
        self.entry(self.last_node()).map(|(k, _)| k)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.entry(self.first_node())
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.entry(self.last_node())
    }

    /// Iterates in comparator order. Double-ended.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            front: self.first_node(),
            back: self.last_node(),
            remaining: self.len(),
        }
    }

    /// Mutable iteration in comparator order.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let order = self.in_order();
        let mut slots: Vec<Option<&mut Node<K, V>>> = self.nodes.iter_mut().map(Some).collect();
        let entries: Vec<(&K, &mut V)> = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .map(|node| (&node.key, &mut node.value))
            .collect();
        IterMut {
            inner: entries.into_iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut V> + ExactSizeIterator {
        self.iter_mut().map(|(_, v)| v)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.nodes.iter().any(|n| n.value == *value)
    }

    /// Arena indices in key order.
    fn in_order(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.len());
        let mut cur = self.first_node();
        while let Some(ix) = cur.get() {
            out.push(ix);
            cur = successor(&self.nodes, cur);
        }
        out
    }

    // --- 2. Red-Black Maintenance ---

    #[inline]
    fn parent_of(&self, i: u32) -> u32 {
        if i.is_some() { self.node(i).parent } else { u32::NONE }
    }

    #[inline]
    fn left_of(&self, i: u32) -> u32 {
        if i.is_some() { self.node(i).left } else { u32::NONE }
    }

    #[inline]
    fn right_of(&self, i: u32) -> u32 {
        if i.is_some() { self.node(i).right } else { u32::NONE }
    }

    /// Missing children count as black.
    #[inline]
    fn is_red(&self, i: u32) -> bool {
        i.is_some() && self.node(i).red
    }

    #[inline]
    fn set_red(&mut self, i: u32, red: bool) {
        if i.is_some() {
            self.node_mut(i).red = red;
        }
    }

    /// Points `parent`'s link to `old` (or the root, if `parent` is `NONE`) at `new`.
    fn replace_child(&mut self, parent: u32, old: u32, new: u32) {
        if parent.is_none() {
            self.root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    fn rotate_left(&mut self, p: u32) {
        let r = self.node(p).right;
        let r_left = self.node(r).left;
        self.node_mut(p).right = r_left;
        if r_left.is_some() {
            self.node_mut(r_left).parent = p;
        }
        let pp = self.node(p).parent;
        self.node_mut(r).parent = pp;
        self.replace_child(pp, p, r);
        self.node_mut(r).left = p;
        self.node_mut(p).parent = r;
    }

    fn rotate_right(&mut self, p: u32) {
        let l = self.node(p).left;
        let l_right = self.node(l).right;
        self.node_mut(p).left = l_right;
        if l_right.is_some() {
            self.node_mut(l_right).parent = p;
        }
        let pp = self.node(p).parent;
        self.node_mut(l).parent = pp;
        self.replace_child(pp, p, l);
        self.node_mut(l).right = p;
        self.node_mut(p).parent = l;
    }

    fn fix_after_insertion(&mut self, mut x: u32) {
        self.set_red(x, true);
        while x.is_some() && x != self.root && self.is_red(self.parent_of(x)) {
            let p = self.parent_of(x);
            let g = self.parent_of(p);
            if p == self.left_of(g) {
                let uncle = self.right_of(g);
                if self.is_red(uncle) {
                    self.set_red(p, false);
                    self.set_red(uncle, false);
                    self.set_red(g, true);
                    x = g;
                } else {
                    if x == self.right_of(p) {
                        x = p;
                        self.rotate_left(x);
                    }
                    let p = self.parent_of(x);
                    let g = self.parent_of(p);
                    self.set_red(p, false);
                    self.set_red(g, true);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left_of(g);
                if self.is_red(uncle) {
                    self.set_red(p, false);
                    self.set_red(uncle, false);
                    self.set_red(g, true);
                    x = g;
                } else {
                    if x == self.left_of(p) {
                        x = p;
                        self.rotate_right(x);
                    }
                    let p = self.parent_of(x);
                    let g = self.parent_of(p);
                    self.set_red(p, false);
                    self.set_red(g, true);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_red(root, false);
    }

    fn fix_after_deletion(&mut self, mut x: u32) {
        while x != self.root && !self.is_red(x) {
            let p = self.parent_of(x);
            if x == self.left_of(p) {
                let mut sib = self.right_of(p);
                if self.is_red(sib) {
                    self.set_red(sib, false);
                    self.set_red(p, true);
                    self.rotate_left(p);
                    sib = self.right_of(self.parent_of(x));
                }
                if !self.is_red(self.left_of(sib)) && !self.is_red(self.right_of(sib)) {
                    self.set_red(sib, true);
                    x = self.parent_of(x);
                } else {
                    if !self.is_red(self.right_of(sib)) {
                        let sl = self.left_of(sib);
                        self.set_red(sl, false);
                        self.set_red(sib, true);
                        self.rotate_right(sib);
                        sib = self.right_of(self.parent_of(x));
                    }
                    let p = self.parent_of(x);
                    let p_red = self.is_red(p);
                    self.set_red(sib, p_red);
                    self.set_red(p, false);
                    let sr = self.right_of(sib);
                    self.set_red(sr, false);
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut sib = self.left_of(p);
                if self.is_red(sib) {
                    self.set_red(sib, false);
                    self.set_red(p, true);
                    self.rotate_right(p);
                    sib = self.left_of(self.parent_of(x));
                }
                if !self.is_red(self.right_of(sib)) && !self.is_red(self.left_of(sib)) {
                    self.set_red(sib, true);
                    x = self.parent_of(x);
                } else {
                    if !self.is_red(self.left_of(sib)) {
                        let sr = self.right_of(sib);
                        self.set_red(sr, false);
                        self.set_red(sib, true);
                        self.rotate_left(sib);
                        sib = self.left_of(self.parent_of(x));
                    }
                    let p = self.parent_of(x);
                    let p_red = self.is_red(p);
                    self.set_red(sib, p_red);
                    self.set_red(p, false);
                    let sl = self.left_of(sib);
                    self.set_red(sl, false);
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.set_red(x, false);
    }

    /// Swaps the key/value payloads of two distinct nodes, leaving links and colours.
    fn swap_entries(&mut self, a: u32, b: u32) {
        let (a, b) = (a.as_usize(), b.as_usize());
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.nodes.split_at_mut(hi);
        let (x, y) = (&mut head[lo], &mut tail[0]);
        mem::swap(&mut x.key, &mut y.key);
        mem::swap(&mut x.value, &mut y.value);
    }

    /// Unlinks node `p` from the tree, rebalances, and frees its arena slot.
    fn remove_node(&mut self, mut p: u32) -> (K, V) {
        if self.left_of(p).is_some() && self.right_of(p).is_some() {
            // The successor has at most one child; it takes over the payload of `p`
            // and is removed in its place.
            let s = successor(&self.nodes, p);
            self.swap_entries(p, s);
            p = s;
        }

        let replacement = if self.left_of(p).is_some() { self.left_of(p) } else { self.right_of(p) };
        let black = !self.node(p).red;
        if replacement.is_some() {
            let parent = self.node(p).parent;
            self.node_mut(replacement).parent = parent;
            self.replace_child(parent, p, replacement);
            if black {
                self.fix_after_deletion(replacement);
            }
        } else if self.node(p).parent.is_none() {
            self.root = u32::NONE;
        } else {
            // No children: use `p` itself as the phantom during fix-up, then detach it.
            if black {
                self.fix_after_deletion(p);
            }
            let parent = self.node(p).parent;
            if parent.is_some() {
                if self.node(parent).left == p {
                    self.node_mut(parent).left = u32::NONE;
                } else if self.node(parent).right == p {
                    self.node_mut(parent).right = u32::NONE;
                }
            }
        }
        self.release(p)
    }

    /// Removes the unlinked node `p` from the arena, moving the last node into its slot.
    fn release(&mut self, p: u32) -> (K, V) {
        let removed = self.nodes.swap_remove(p.as_usize());
        let moved_from = u32::from_usize(self.nodes.len());
        if p != moved_from {
            let (parent, left, right) = {
                let node = self.node(p);
                (node.parent, node.left, node.right)
            };
            self.replace_child(parent, moved_from, p);
            if left.is_some() {
                self.node_mut(left).parent = p;
            }
            if right.is_some() {
                self.node_mut(right).parent = p;
            }
        }
        (removed.key, removed.value)
    }

    /// Removes and returns the smallest entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first_node();
        first.get().map(|_| self.remove_node(first))
    }

    /// Removes and returns the greatest entry.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last_node();
        last.get().map(|_| self.remove_node(last))
    }
}

// --- 3. Keyed Operations ---

impl<K, V, C> RBTreeMap<K, V, C>
where
    C: Comparator<K>,
{
    fn search<Q>(&self, key: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut cur = self.root;
        while cur.is_some() {
            let node = self.node(cur);
            cur = match <C as Comparator<Q>>::compare(&self.comparator, key, node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return cur,
            };
        }
        u32::NONE
    }

    /// Closest node to `key` strictly `above` (or below) it, or equal if `inclusive`.
    fn bound_node<Q>(&self, key: &Q, above: bool, inclusive: bool) -> u32
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut cur = self.root;
        let mut best = u32::NONE;
        while cur.is_some() {
            let node = self.node(cur);
            let ord = <C as Comparator<Q>>::compare(&self.comparator, key, node.key.borrow());
            let go_left = match ord {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal if inclusive => return cur,
                Ordering::Equal => !above,
            };
            if (above && ord == Ordering::Less) || (!above && ord == Ordering::Greater) {
                best = cur;
            }
            cur = if go_left { node.left } else { node.right };
        }
        best
    }

    /// Inserts a pair, returning the previous value of the key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.root.is_none() {
            self.nodes.push(Node {
                key,
                value,
                left: u32::NONE,
                right: u32::NONE,
                parent: u32::NONE,
                red: false,
            });
            self.root = u32::ZERO;
            return None;
        }

        let mut cur = self.root;
        let go_left = loop {
            let node = self.node(cur);
            let ord = <C as Comparator<K>>::compare(&self.comparator, &key, &node.key);
            let next = match ord {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(mem::replace(&mut self.node_mut(cur).value, value)),
            };
            if next.is_none() {
                break ord == Ordering::Less;
            }
            cur = next;
        };

        let idx = u32::from_usize(self.nodes.len());
        self.nodes.push(Node {
            key,
            value,
            left: u32::NONE,
            right: u32::NONE,
            parent: cur,
            red: true,
        });
        if go_left {
            self.node_mut(cur).left = idx;
        } else {
            self.node_mut(cur).right = idx;
        }
        self.fix_after_insertion(idx);
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.entry(self.search(key)).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.entry(self.search(key))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let i = self.search(key);
        i.get().map(move |ix| &mut self.nodes[ix].value)
    }

    pub fn get_or_default<Q>(&self, key: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        V: Clone + Default,
    {
        match self.get(key).or(self.default_value.as_ref()) {
            Some(v) => v.clone(),
            None => V::default(),
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.search(key).is_some()
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let i = self.search(key);
        i.get().map(|_| self.remove_node(i))
    }

    /// Adds `increment` to the value of `key`, inserting
    /// `default_return_value + increment` if missing. Returns the previous value.
    pub fn add_to(&mut self, key: K, increment: V) -> V
    where
        V: Copy + Default + Add<Output = V>,
    {
        let i = self.search(&key);
        if let Some(ix) = i.get() {
            let slot = &mut self.nodes[ix].value;
            let old = *slot;
            *slot = old + increment;
            return old;
        }
        let seed = function::seed(&self.default_value);
        self.insert(key, seed + increment);
        seed
    }

    /// Keeps only the entries for which `f` returns `true`.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut entries = Vec::with_capacity(self.len());
        while let Some(entry) = self.pop_first() {
            entries.push(entry);
        }
        for (k, mut v) in entries {
            if f(&k, &mut v) {
                self.insert(k, v);
            }
        }
    }

    /// Greatest entry with key `<= key`.
    pub fn floor<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.entry(self.bound_node(key, false, true))
    }

    /// Least entry with key `>= key`.
    pub fn ceiling<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.entry(self.bound_node(key, true, true))
    }

    /// Greatest entry with key `< key`.
    pub fn lower<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.entry(self.bound_node(key, false, false))
    }

    /// Least entry with key `> key`.
    pub fn higher<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.entry(self.bound_node(key, true, false))
    }

    /// Iterates over the entries whose keys fall in `range`, in comparator order.
    ///
    /// `..to` is the head map, `from..` the tail map, `from..to` the sub map. An
    /// inverted range is empty.
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        let front = match range.start_bound() {
            Bound::Included(k) => self.bound_node(k, true, true),
            Bound::Excluded(k) => self.bound_node(k, true, false),
            Bound::Unbounded => self.first_node(),
        };
        let back = match range.end_bound() {
            Bound::Included(k) => self.bound_node(k, false, true),
            Bound::Excluded(k) => self.bound_node(k, false, false),
            Bound::Unbounded => self.last_node(),
        };
        self.range_between(front, back)
    }

    fn range_between(&self, front: u32, back: u32) -> Range<'_, K, V> {
        let empty = front.is_none()
            || back.is_none()
            || <C as Comparator<K>>::less(&self.comparator, &self.node(back).key, &self.node(front).key);
        if empty {
            Range {
                nodes: &self.nodes,
                front: u32::NONE,
                back: u32::NONE,
            }
        } else {
            Range {
                nodes: &self.nodes,
                front,
                back,
            }
        }
    }

    /// Iterates over the entries strictly after `key`; `key` need not be present.
    pub fn iter_from<Q>(&self, key: &Q) -> Range<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let front = self.bound_node(key, true, false);
        self.range_between(front, self.last_node())
    }
}

// --- 4. Iterator Support ---

/// Iterator over an [`RBTreeMap`] in comparator order.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    front: u32,
    back: u32,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.front.as_usize()];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.front = successor(self.nodes, self.front);
        }
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.back.as_usize()];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.back = predecessor(self.nodes, self.back);
        }
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

/// Iterator over a key range of an [`RBTreeMap`].
pub struct Range<'a, K, V> {
    nodes: &'a [Node<K, V>],
    /// Both ends are `NONE` once the range is exhausted.
    front: u32,
    back: u32,
}

impl<'a, K, V> Range<'a, K, V> {
    #[inline]
    fn take(&mut self, from_back: bool) -> Option<(&'a K, &'a V)> {
        let cur = if from_back { self.back } else { self.front };
        let nodes = self.nodes;
        let node = &nodes[cur.get()?];
        if self.front == self.back {
            self.front = u32::NONE;
            self.back = u32::NONE;
        } else if from_back {
            self.back = predecessor(self.nodes, cur);
        } else {
            self.front = successor(self.nodes, cur);
        }
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.take(false)
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.take(true)
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

/// Mutable iterator over an [`RBTreeMap`] in comparator order.
pub struct IterMut<'a, K, V> {
    inner: std::vec::IntoIter<(&'a K, &'a mut V)>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

/// Owning iterator over an [`RBTreeMap`] in comparator order.
pub struct IntoIter<K, V> {
    inner: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        let order = self.in_order();
        let mut slots: Vec<Option<Node<K, V>>> = self.nodes.into_iter().map(Some).collect();
        let entries: Vec<(K, V)> = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .map(|node| (node.key, node.value))
            .collect();
        IntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// --- 5. Trait Implementations ---

impl<K, V, C: Comparator<K>> Function<K, V> for RBTreeMap<K, V, C> {
    fn get_value(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn default_return_value(&self) -> Option<&V> {
        self.default_value.as_ref()
    }

    fn set_default_return_value(&mut self, value: V) {
        self.default_value = Some(value);
    }
}

impl<K, V, Q, C> Index<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<K> + Comparator<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K, V, Q, C> IndexMut<&Q> for RBTreeMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<K> + Comparator<Q>,
{
    fn index_mut(&mut self, key: &Q) -> &mut V {
        self.get_mut(key).expect("no entry found for key")
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            comparator: self.comparator.clone(),
            default_value: self.default_value.clone(),
        }
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Debug, V: Debug, C> Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V: PartialEq, C: Comparator<K>> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

// --- 6. Test Suite ---
