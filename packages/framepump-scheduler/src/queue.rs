use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::QueueError;

/// A min-ordered queue.
/// Not synchronized; `MainLoopScheduler` wraps it in its own mutex.
#[derive(Debug)]
pub struct PriorityQueue<T: Ord> {
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.heap.push(Reverse(item));
    }

    /// Smallest item, left in place.
    pub fn peek(&self) -> Result<&T, QueueError> {
        self.heap
            .peek()
            .map(|Reverse(item)| item)
            .ok_or(QueueError::Empty)
    }

    /// Removes and returns the item `peek` would have returned.
    pub fn dequeue(&mut self) -> Result<T, QueueError> {
        self.heap
            .pop()
            .map(|Reverse(item)| item)
            .ok_or(QueueError::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_queue_errors() {
        let mut queue: PriorityQueue<u32> = PriorityQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.peek(), Err(QueueError::Empty));
        assert_eq!(queue.dequeue(), Err(QueueError::Empty));
    }

    #[test]
    fn test_dequeue_in_ascending_order() {
        let mut queue = PriorityQueue::new();
        for value in [5, 1, 4, 2, 3] {
            queue.enqueue(value);
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek(), Ok(&1));

        let mut drained = Vec::new();
        while let Ok(value) = queue.dequeue() {
            drained.push(value);
        }
        assert_eq!(drained, vec![1, 2, 3, 4, 5]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_peek_matches_dequeue() {
        let mut queue = PriorityQueue::new();
        queue.enqueue((10, 1));
        queue.enqueue((10, 0));
        queue.enqueue((3, 7));

        let peeked = *queue.peek().unwrap();
        assert_eq!(queue.dequeue().unwrap(), peeked);
        assert_eq!(queue.dequeue().unwrap(), (10, 0));
        assert_eq!(queue.dequeue().unwrap(), (10, 1));
    }

    #[test]
    fn test_clear() {
        let mut queue = PriorityQueue::new();
        queue.enqueue(1);
        queue.enqueue(2);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }
}
