// src/audio/sample_capture.rs
//! A wrapper source that taps played samples into a lock-free ring for analysis.

use std::time::Duration;

use ringbuf::{HeapProd, traits::*};
use rodio::Source;
use tracing::debug;

/// A wrapper source that pushes a mono downmix of every frame into a ring
/// producer while passing the original samples through untouched.
pub struct SampleCapture<S> {
    source: S,
    producer: HeapProd<f32>,
    /// Channel count of the frame being accumulated
    channels: u16,
    /// Running sum of the current frame
    frame_sum: f32,
    /// Samples seen in the current frame
    frame_pos: u16,
    /// Frames dropped because the ring was full
    dropped: u64,
}

impl<S> SampleCapture<S>
where
    S: Source<Item = f32>,
{
    /// Create a new sample capture wrapper around an existing source.
    pub fn new(source: S, producer: HeapProd<f32>) -> Self {
        let channels = source.channels().max(1);
        Self {
            source,
            producer,
            channels,
            frame_sum: 0.0,
            frame_pos: 0,
            dropped: 0,
        }
    }

    /// Frames that could not be queued because the consumer fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl<S> Iterator for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frame_pos == 0 {
            // Channel count may change between spans
            self.channels = self.source.channels().max(1);
        }

        let sample = self.source.next()?;
        self.frame_sum += sample;
        self.frame_pos += 1;

        if self.frame_pos >= self.channels {
            let mono = self.frame_sum / self.channels as f32;
            if self.producer.try_push(mono).is_err() {
                self.dropped += 1;
                if self.dropped == 1 || self.dropped % 48_000 == 0 {
                    debug!(dropped = self.dropped, "capture ring full, frames dropped");
                }
            }
            self.frame_sum = 0.0;
            self.frame_pos = 0;
        }
        Some(sample)
    }
}

impl<S> Source for SampleCapture<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }
}
