//! Deferred work queue
//!
//! Items are held until [`PriorityQueue::drain`] is called and then handed to a
//! runner in ascending priority order. Items sharing a priority keep their
//! insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority used by [`PriorityQueue::add`]; runs after every explicit priority.
pub const DEFAULT_PRIORITY: i32 = i32::MAX;

struct Entry<T> {
    priority: i32,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Ord for Entry<T> {
    /// BinaryHeap is a max-heap, so the entry that must run first compares as Greater:
    /// lower priority value first, then lower sequence (older) first.
    fn cmp(&self, other: &Self) -> Ordering {
        match self.priority.cmp(&other.priority) {
            Ordering::Equal => self.sequence.cmp(&other.sequence).reverse(),
            ordering => ordering.reverse(),
        }
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-ordered list of deferred items
pub struct PriorityQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Append at [`DEFAULT_PRIORITY`]
    pub fn add(&mut self, item: T) -> &mut Self {
        self.add_priority(DEFAULT_PRIORITY, item)
    }

    /// Append at an explicit priority; lower values run earlier
    pub fn add_priority(&mut self, priority: i32, item: T) -> &mut Self {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Entry {
            priority,
            sequence,
            item,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Priorities of queued items in the order they would drain
    pub fn pending_priorities(&self) -> Vec<i32> {
        let mut entries: Vec<(i32, u64)> = self
            .heap
            .iter()
            .map(|entry| (entry.priority, entry.sequence))
            .collect();
        entries.sort_unstable();
        entries.into_iter().map(|(priority, _)| priority).collect()
    }

    /// Remove and run every queued item in order.
    ///
    /// Stops at the first failing item and returns its error; items after it
    /// stay queued and are not run.
    pub fn drain<E, F>(&mut self, mut runner: F) -> Result<usize, E>
    where
        F: FnMut(T) -> Result<(), E>,
    {
        let mut ran = 0;
        while let Some(entry) = self.heap.pop() {
            ran += 1;
            runner(entry.item)?;
        }
        Ok(ran)
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
