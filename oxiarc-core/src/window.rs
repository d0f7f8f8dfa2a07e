//! Sliding window (dictionary) buffer for LZ-family decoders.
//!
//! Decoders write decompressed bytes into a [`Window`] and may copy earlier
//! bytes back out of it. The window keeps the most recent `capacity` bytes as
//! history and holds freshly written bytes until the caller drains them into
//! its own output buffer.
//!
//! [`SlidingWindow`] is the ring-buffer implementation used by the stream
//! adapters. Writes are bounded by a limit the caller sets from the amount of
//! output space it has, so the window never holds more undrained bytes than
//! the caller can accept.

use crate::error::{OxiArcError, Result};

/// Operations a chunk decoder and an entropy decoder need from a window.
pub trait Window {
    /// Forget all history.
    ///
    /// Bytes that were written but not yet handed to the caller are kept;
    /// only back-references into them become invalid.
    fn reset(&mut self);

    /// Number of bytes that can be written before the window is full.
    fn available(&self) -> usize;

    /// Copy as much of `data` as fits. Returns the number of bytes copied.
    fn write_raw(&mut self, data: &[u8]) -> usize;

    /// Write a single byte. Returns `false` if the window is full.
    fn put_byte(&mut self, byte: u8) -> bool;

    /// Repeat `len` bytes starting `distance` bytes back (1 = last byte).
    ///
    /// Copies at most [`Window::available`] bytes and returns how many were
    /// copied; the caller resumes the remainder later.
    fn repeat(&mut self, distance: usize, len: usize) -> Result<usize>;

    /// Number of history bytes reachable by back-references.
    fn history_len(&self) -> usize;
}

/// A ring buffer window with an output limit.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Current write position (next byte will be written here).
    position: usize,
    /// Bytes before this position have been drained by the caller.
    drained: usize,
    /// Writes stop at this position.
    limit: usize,
    /// Number of valid history bytes (up to capacity).
    size: usize,
}

impl SlidingWindow {
    /// Create a new window holding `capacity` bytes of history.
    ///
    /// Fails with [`OxiArcError::Allocation`] if the memory cannot be reserved.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(OxiArcError::invalid_options(
                "window capacity must be greater than 0",
            ));
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|_| OxiArcError::allocation(capacity))?;
        buffer.resize(capacity, 0);

        Ok(Self {
            buffer,
            position: 0,
            drained: 0,
            limit: capacity,
            size: 0,
        })
    }

    /// Get the capacity of the window.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of written bytes not yet drained.
    pub fn pending(&self) -> usize {
        self.position - self.drained
    }

    /// Discard history and pending bytes.
    pub fn clear(&mut self) {
        self.position = 0;
        self.drained = 0;
        self.limit = self.capacity();
        self.size = 0;
    }

    /// Allow at most `out_space` more bytes to be written before the next drain.
    pub fn set_limit(&mut self, out_space: usize) {
        self.wrap_if_drained();
        self.limit = self.position + out_space.min(self.capacity() - self.position);
    }

    /// Move pending bytes into `out`. Returns the number of bytes moved.
    pub fn drain_into(&mut self, out: &mut [u8]) -> usize {
        let count = out.len().min(self.pending());
        out[..count].copy_from_slice(&self.buffer[self.drained..self.drained + count]);
        self.drained += count;
        self.wrap_if_drained();
        count
    }

    /// Move all pending bytes onto the end of `out`.
    pub fn drain_to_vec(&mut self, out: &mut Vec<u8>) -> usize {
        let count = self.pending();
        out.extend_from_slice(&self.buffer[self.drained..self.position]);
        self.drained = self.position;
        self.wrap_if_drained();
        count
    }

    fn wrap_if_drained(&mut self) {
        if self.position == self.capacity() && self.drained == self.position {
            self.position = 0;
            self.drained = 0;
            self.limit = self.capacity();
        }
    }

    fn record_written(&mut self, count: usize) {
        self.position += count;
        self.size = (self.size + count).min(self.capacity());
    }
}

impl Window for SlidingWindow {
    fn reset(&mut self) {
        self.size = 0;
    }

    fn available(&self) -> usize {
        self.limit - self.position
    }

    fn write_raw(&mut self, data: &[u8]) -> usize {
        let count = data.len().min(self.available());
        self.buffer[self.position..self.position + count].copy_from_slice(&data[..count]);
        self.record_written(count);
        count
    }

    fn put_byte(&mut self, byte: u8) -> bool {
        if self.position == self.limit {
            return false;
        }
        self.buffer[self.position] = byte;
        self.record_written(1);
        true
    }

    fn repeat(&mut self, distance: usize, len: usize) -> Result<usize> {
        if distance == 0 || distance > self.size {
            return Err(OxiArcError::invalid_distance(distance, self.size));
        }

        let capacity = self.capacity();
        let count = len.min(self.available());
        let mut src_pos = (self.position + capacity - distance) % capacity;

        // Byte by byte: the source may overlap the bytes being written.
        for _ in 0..count {
            self.buffer[self.position] = self.buffer[src_pos];
            self.record_written(1);
            src_pos += 1;
            if src_pos == capacity {
                src_pos = 0;
            }
        }

        Ok(count)
    }

    fn history_len(&self) -> usize {
        self.size
    }
}
