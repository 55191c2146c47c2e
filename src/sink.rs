//! Bounded byte queue fed by the caller.

use alloc::vec;
use alloc::vec::Vec;

/// A fixed capacity ring buffer of bytes.
///
/// `write_data` stores as many bytes as fit into the free space and reports
/// the accepted count, which gives the caller explicit backpressure: a return
/// value smaller than the pushed slice means the reader has to drain the
/// buffer (through `parse()`) before the rest can be offered again.
#[derive(Clone, Debug)]
pub(crate) struct ByteSink {
    data: Vec<u8>,
    head: usize,
    used: usize,
}

impl ByteSink {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            head: 0,
            used: 0,
        }
    }

    /// Appends as many bytes as fit and returns the accepted count.
    pub(crate) fn write_data(&mut self, bytes: &[u8]) -> usize {
        let accepted = usize::min(bytes.len(), self.free());
        let capacity = self.capacity();
        let mut tail = (self.head + self.used) % capacity;
        for &byte in &bytes[..accepted] {
            self.data[tail] = byte;
            tail = (tail + 1) % capacity;
        }
        self.used += accepted;
        accepted
    }

    /// Returns the byte at the front of the queue without removing it.
    ///
    /// Must be paired with [`consume`][Self::consume] once the byte has been
    /// acted on.
    pub(crate) fn read_byte(&self) -> Option<u8> {
        if self.used == 0 {
            None
        } else {
            Some(self.data[self.head])
        }
    }

    /// Removes `count` bytes from the front of the queue.
    pub(crate) fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.used);
        let count = usize::min(count, self.used);
        self.head = (self.head + count) % self.capacity();
        self.used -= count;
    }

    pub(crate) fn used(&self) -> usize {
        self.used
    }

    pub(crate) fn free(&self) -> usize {
        self.capacity() - self.used
    }

    pub(crate) fn capacity(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn clear(&mut self) {
        self.head = 0;
        self.used = 0;
    }
}
