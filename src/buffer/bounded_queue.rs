/* An append-only FIFO window over the most recent `capacity` items.

`append` pushes to the back; when that takes the queue past its capacity the
single oldest item is popped from the front and handed back to the caller.
There is no way to remove or replace an item by index.
*/

use std::collections::vec_deque;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: NonZeroUsize,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Append `item`, returning the evicted oldest item if the window overflowed.
    pub fn append(&mut self, item: T) -> Option<T> {
        self.items.push_back(item);
        if self.items.len() > self.capacity.get() {
            self.items.pop_front()
        } else {
            None
        }
    }

    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    pub fn all_in_order(&self) -> vec_deque::Iter<'_, T> {
        self.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity.get()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue<T>(capacity: usize) -> BoundedQueue<T> {
        BoundedQueue::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn test_empty_queue() {
        let q: BoundedQueue<i32> = queue(3);
        assert!(q.is_empty());
        assert!(!q.is_full());
        assert_eq!(q.len(), 0);
        assert_eq!(q.capacity(), 3);
        assert_eq!(q.oldest(), None);
    }

    #[test]
    fn test_append_within_capacity_evicts_nothing() {
        let mut q = queue(3);
        assert_eq!(q.append(1), None);
        assert_eq!(q.append(2), None);
        assert_eq!(q.append(3), None);
        assert!(q.is_full());
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_append_over_capacity_evicts_oldest() {
        let mut q = queue(2);
        q.append("a");
        q.append("b");
        assert_eq!(q.append("c"), Some("a"));
        assert_eq!(q.append("d"), Some("b"));

        assert_eq!(q.len(), 2);
        assert_eq!(q.oldest(), Some(&"c"));
        assert!(q.is_full());
        assert_eq!(q.all_in_order().copied().collect::<Vec<_>>(), vec!["c", "d"]);
    }

    #[test]
    fn test_capacity_one_keeps_only_latest() {
        let mut q = queue(1);
        assert_eq!(q.append(5), None);
        assert_eq!(q.append(6), Some(5));
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![6]);
    }

    #[test]
    fn test_len_never_exceeds_capacity() {
        let mut q = queue(4);
        for i in 0..50 {
            q.append(i);
            assert!(q.len() <= q.capacity());
        }
        assert_eq!(q.iter().copied().collect::<Vec<_>>(), vec![46, 47, 48, 49]);
    }
}
