use bitvec::prelude::*;
use fxhash::FxHashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

/// Fixed size set of vertex indices, used as `visited` marker during traversals.
#[derive(Clone, Default)]
pub struct BitSet {
    bit_vec: BitVec,
}

impl Debug for BitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let values: Vec<usize> = self.iter().collect();
        write!(f, "{:?}", values)
    }
}

impl BitSet {
    #[inline]
    pub fn new(size: usize) -> Self {
        Self {
            bit_vec: bitvec![0; size],
        }
    }

    /// Sets the bit at `idx` and returns whether it was already set.
    #[inline]
    pub fn set_bit(&mut self, idx: usize) -> bool {
        if !self.bit_vec[idx] {
            self.bit_vec.set(idx, true);
            false
        } else {
            true
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.bit_vec.len()).filter(move |i| self.bit_vec[*i])
    }
}

impl Index<usize> for BitSet {
    type Output = bool;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.bit_vec.index(index)
    }
}

/// Addressable min-queue over vertex ids. Re-inserting an element updates its priority.
pub struct BinaryQueue {
    heap: Vec<usize>,
    values: FxHashMap<usize, i64>,
    indices: FxHashMap<usize, usize>,
}

enum ChildType {
    First,
    Second,
}

impl Default for BinaryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryQueue {
    pub fn new() -> Self {
        Self {
            heap: Vec::default(),
            values: FxHashMap::default(),
            indices: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, element: usize, priority: i64) {
        match self.values.entry(element) {
            Entry::Occupied(_) => self.update(element, priority),
            Entry::Vacant(entry) => {
                entry.insert(priority);
                self.indices.insert(element, self.heap.len());
                self.heap.push(element);
                if self.heap.len() > 1 {
                    self.up(self.heap.len() - 1);
                }
            }
        }
    }

    fn update(&mut self, k: usize, v: i64) {
        self.values.insert(k, v);
        let idx = self.indices[&k];
        self.up(idx);
        let idx = self.indices[&k];
        self.down(idx);
    }

    pub fn pop_min(&mut self) -> Option<(usize, i64)> {
        let k = *self.heap.first()?;
        let v = self.values.remove(&k)?;
        self.indices.remove(&k);
        let last = self.heap.pop()?;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.indices.insert(last, 0);
            if self.heap.len() > 1 {
                self.down(0);
            }
        }
        Some((k, v))
    }

    fn up(&mut self, mut idx: usize) {
        let x = self.heap[idx];
        while let Some(p) = self.parent(idx) {
            if self.values[&x] < self.values[&self.heap[p]] {
                self.heap[idx] = self.heap[p];
                self.indices.insert(self.heap[p], idx);
                idx = p;
            } else {
                break;
            }
        }
        self.heap[idx] = x;
        self.indices.insert(x, idx);
    }

    fn down(&mut self, idx: usize) {
        let mut current = idx;
        let value = self.heap[current];

        while let Some(mut first) = self.child(current, ChildType::First) {
            if let Some(second) = self.child(current, ChildType::Second) {
                if self.values[&self.heap[second]] < self.values[&self.heap[first]] {
                    first = second;
                }
            }
            if self.values[&self.heap[first]] < self.values[&value] {
                self.heap[current] = self.heap[first];
                self.indices.insert(self.heap[current], current);
                current = first
            } else {
                break;
            }
        }
        self.heap[current] = value;
        self.indices.insert(value, current);
    }

    fn parent(&self, idx: usize) -> Option<usize> {
        if idx == 0 {
            None
        } else {
            Some((idx - 1) / 2)
        }
    }

    fn child(&self, idx: usize, child_type: ChildType) -> Option<usize> {
        let off = match child_type {
            ChildType::First => 1,
            ChildType::Second => 2,
        };
        let idx = idx * 2 + off;
        if idx >= self.heap.len() {
            None
        } else {
            Some(idx)
        }
    }
}
