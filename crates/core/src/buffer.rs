use std::collections::VecDeque;

/// Fixed-capacity FIFO buffer: pushing at capacity evicts the oldest value.
///
/// Backs the spike log and the scrolling graph series.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items:    VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// A buffer that starts full of `value`.
    pub fn filled(capacity: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self {
            items: std::iter::repeat(value).take(capacity).collect(),
            capacity,
        }
    }

    /// Push a new value, returning the evicted one if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = if self.items.len() == self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest value first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.items.iter()
    }

    /// Most recently pushed value first.
    pub fn newest_first(&self) -> impl Iterator<Item = &T> {
        self.items.iter().rev()
    }
}
