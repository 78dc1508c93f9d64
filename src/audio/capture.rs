// src/audio/capture.rs
//! Fixed-capacity circular store of captured samples.
//!
//! Samples arrive from the playback thread through a lock-free ring. Once per
//! tick the ring is drained into a [`CaptureBuffer`], whose storage and write
//! index are handed to the analysis chain as a read-only [`CaptureView`].

use ringbuf::traits::Consumer;

/// Samples moved per `pop_slice` call while draining.
const DRAIN_CHUNK: usize = 512;

/// Read-only window onto a circular sample store.
///
/// `write_index` is the slot the next sample will land in, so the most recent
/// sample sits at `write_index - 1` (modulo capacity).
#[derive(Debug, Clone, Copy)]
pub struct CaptureView<'a> {
    pub samples: &'a [f32],
    pub write_index: usize,
}

impl<'a> CaptureView<'a> {
    pub fn new(samples: &'a [f32], write_index: usize) -> Self {
        Self {
            samples,
            write_index,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }
}

/// Circular sample store with a wrapping write cursor.
pub struct CaptureBuffer {
    /// Backing storage, allocated once
    samples: Vec<f32>,
    /// Next slot to write
    write_index: usize,
    /// Samples written since creation
    total_written: u64,
}

impl CaptureBuffer {
    /// Create a silent buffer holding `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: vec![0.0; capacity],
            write_index: 0,
            total_written: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Append one sample, overwriting the oldest once full.
    pub fn push(&mut self, sample: f32) {
        if self.samples.is_empty() {
            return;
        }
        self.samples[self.write_index] = sample;
        self.write_index += 1;
        if self.write_index >= self.samples.len() {
            self.write_index = 0;
        }
        self.total_written += 1;
    }

    pub fn push_slice(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Move everything currently queued in `consumer` into the buffer.
    /// Returns the number of samples moved.
    pub fn drain_from<C>(&mut self, consumer: &mut C) -> usize
    where
        C: Consumer<Item = f32>,
    {
        let mut chunk = [0.0f32; DRAIN_CHUNK];
        let mut moved = 0;
        loop {
            let n = consumer.pop_slice(&mut chunk);
            if n == 0 {
                break;
            }
            self.push_slice(&chunk[..n]);
            moved += n;
        }
        moved
    }

    pub fn view(&self) -> CaptureView<'_> {
        CaptureView::new(&self.samples, self.write_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::{HeapRb, traits::*};

    #[test]
    fn test_push_wraps_write_index() {
        let mut buffer = CaptureBuffer::new(4);
        buffer.push_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(buffer.write_index(), 3);

        buffer.push_slice(&[4.0, 5.0]);
        assert_eq!(buffer.write_index(), 1);
        assert_eq!(buffer.view().samples, &[5.0, 2.0, 3.0, 4.0]);
        assert_eq!(buffer.total_written(), 5);
    }

    #[test]
    fn test_zero_capacity_ignores_samples() {
        let mut buffer = CaptureBuffer::new(0);
        buffer.push_slice(&[1.0, 2.0]);
        assert_eq!(buffer.capacity(), 0);
        assert_eq!(buffer.write_index(), 0);
        assert_eq!(buffer.total_written(), 0);
    }

    #[test]
    fn test_drain_moves_all_queued_samples() {
        let (mut producer, mut consumer) = HeapRb::<f32>::new(2048).split();
        for i in 0..1500 {
            let _ = producer.try_push(i as f32);
        }

        let mut buffer = CaptureBuffer::new(1024);
        assert_eq!(buffer.drain_from(&mut consumer), 1500);
        assert_eq!(buffer.total_written(), 1500);
        assert_eq!(buffer.write_index(), 1500 % 1024);

        let view = buffer.view();
        let newest = (view.write_index + view.capacity() - 1) % view.capacity();
        assert_eq!(view.samples[newest], 1499.0);
        assert_eq!(consumer.occupied_len(), 0);
    }
}
