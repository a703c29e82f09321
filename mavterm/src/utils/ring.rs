use std::mem;

/// Fixed-capacity circular buffer that pushes out the oldest elements.
pub struct RingBuffer<T> {
    buffer: Vec<Option<T>>,
    capacity: usize,
    len: usize,
    start: usize,
}

/// Iterator over [`RingBuffer`] from the oldest to the newest element.
pub struct RingBufferIterator<'a, T> {
    ring: &'a RingBuffer<T>,
    cursor: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new [`RingBuffer`].
    pub fn new(capacity: usize) -> RingBuffer<T> {
        RingBuffer {
            buffer: Vec::with_capacity(capacity),
            capacity,
            len: 0,
            start: 0,
        }
    }

    /// Returns `true` if buffer is full.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Returns `true` if buffer is empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns number of elements in a buffer.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns buffer's capacity.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pushes new element to a buffer.
    ///
    /// Returns the oldest element if it was pushed out. A buffer with zero capacity returns the
    /// same element.
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }

        let pos = (self.start + self.len) % self.capacity;
        if self.buffer.len() < self.capacity {
            self.buffer.push(None);
        }

        let mut pushed_out = Some(value);
        mem::swap(&mut pushed_out, &mut self.buffer[pos]);

        if self.is_full() {
            self.start = (self.start + 1) % self.capacity;
        } else {
            self.len += 1;
        }

        pushed_out
    }

    /// Returns a mutable reference to the newest element.
    pub fn last_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        let pos = (self.start + self.len - 1) % self.capacity;
        self.buffer[pos].as_mut()
    }

    /// Removes all elements keeping the capacity.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.len = 0;
        self.start = 0;
    }

    /// Returns an iterator over a buffer.
    #[inline]
    pub fn iter(&self) -> RingBufferIterator<'_, T> {
        RingBufferIterator { ring: self, cursor: 0 }
    }
}

impl<T> Default for RingBuffer<T> {
    /// Creates an empty [`RingBuffer`] with `0` capacity.
    fn default() -> Self {
        Self::new(0)
    }
}

impl<'a, T> Iterator for RingBufferIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.cursor == self.ring.len {
            return None;
        }

        let pos = (self.ring.start + self.cursor) % self.ring.capacity;
        self.cursor += 1;

        self.ring.buffer[pos].as_ref()
    }
}

///////////////////////////////////////////////////////////////////////////////
//                                  Tests                                    //
///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_basics() {
        let mut ring = RingBuffer::new(2);

        assert!(ring.push(1).is_none());
        assert!(ring.push(2).is_none());
        assert_eq!(ring.push(3), Some(1));

        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert!(ring.is_full());
    }

    #[test]
    fn ring_zero_elements() {
        let mut ring = RingBuffer::new(0);

        assert!(matches!(ring.push(1), Some(1)));
        assert!(matches!(ring.push(2), Some(2)));
        assert!(ring.is_empty());
        assert_eq!(ring.iter().count(), 0);
    }

    #[test]
    fn storage_is_bounded() {
        let mut ring = RingBuffer::new(3);
        for i in 0..100 {
            ring.push(i);
        }

        assert_eq!(ring.buffer.len(), 3);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![97, 98, 99]);
    }

    #[test]
    fn last_mut_and_clear() {
        let mut ring = RingBuffer::new(2);
        assert!(ring.last_mut().is_none());

        ring.push(String::from("a"));
        ring.push(String::from("b"));
        ring.push(String::from("c"));
        ring.last_mut().unwrap().push('!');

        assert_eq!(
            ring.iter().cloned().collect::<Vec<_>>(),
            vec!["b".to_string(), "c!".to_string()]
        );

        ring.clear();
        assert!(ring.is_empty());
        ring.push(String::from("d"));
        assert_eq!(ring.iter().count(), 1);
    }
}
