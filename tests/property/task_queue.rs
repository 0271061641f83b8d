//! Property-based tests for priority drain ordering

use bookgen::queue::{PriorityQueue, DEFAULT_PRIORITY};
use proptest::prelude::*;

proptest! {
    /// Drain order is ascending priority, insertion order within a priority
    #[test]
    fn drain_is_priority_then_insertion_stable(priorities in prop::collection::vec(-5i32..5, 0..40)) {
        let mut queue = PriorityQueue::new();
        for (index, priority) in priorities.iter().enumerate() {
            queue.add_priority(*priority, (*priority, index));
        }

        let mut drained = Vec::new();
        let ran = queue
            .drain(|item| {
                drained.push(item);
                Ok::<(), ()>(())
            })
            .unwrap();

        let mut expected: Vec<(i32, usize)> =
            priorities.iter().copied().zip(0..priorities.len()).collect();
        expected.sort();
        prop_assert_eq!(ran, priorities.len());
        prop_assert_eq!(drained, expected);
        prop_assert!(queue.is_empty());
    }

    /// A failing item stops the drain; everything after it stays queued
    #[test]
    fn failure_leaves_remaining_items_queued(len in 1usize..30, fail_at in 0usize..30) {
        let mut queue = PriorityQueue::new();
        for i in 0..len {
            queue.add(i);
        }

        let mut ran = Vec::new();
        let result = queue.drain(|item| {
            ran.push(item);
            if item == fail_at { Err(item) } else { Ok(()) }
        });

        if fail_at < len {
            prop_assert_eq!(result, Err(fail_at));
            prop_assert_eq!(ran.len(), fail_at + 1);
            prop_assert_eq!(queue.len(), len - fail_at - 1);
            prop_assert_eq!(queue.pending_priorities(), vec![DEFAULT_PRIORITY; len - fail_at - 1]);
        } else {
            prop_assert_eq!(result, Ok(len));
            prop_assert!(queue.is_empty());
        }
    }
}
