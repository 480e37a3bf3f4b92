//! Bounded ring of recent raw headings with a seam-aware mean

use crate::math::normalize_degrees;
use crate::types::SMOOTHING_WINDOW;

/// Fixed-capacity ring of raw headings, oldest evicted first
///
/// Values are kept in arrival order so the seam check can compare
/// neighbouring samples.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingBuffer<const N: usize = SMOOTHING_WINDOW> {
    /// Backing storage, valid from `start` for `len` entries
    values: [f64; N],
    /// Index of the oldest entry
    start: usize,
    /// Number of valid entries
    len: usize,
}

impl<const N: usize> SmoothingBuffer<N> {
    pub fn new() -> Self {
        Self {
            values: [0.0; N],
            start: 0,
            len: 0,
        }
    }

    /// Append a heading, dropping the oldest when full
    pub fn push(&mut self, heading: f64) {
        if N == 0 {
            return;
        }
        if self.len < N {
            self.values[(self.start + self.len) % N] = heading;
            self.len += 1;
        } else {
            self.values[self.start] = heading;
            self.start = (self.start + 1) % N;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.len = 0;
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.values[(self.start + i) % N])
    }

    /// Whether neighbouring entries straddle the 0°/360° seam
    pub fn crosses_seam(&self) -> bool {
        self.iter()
            .zip(self.iter().skip(1))
            .any(|(a, b)| (a - b).abs() > 180.0)
    }

    /// Mean heading with wraparound correction
    ///
    /// When the buffer straddles north, every value below 180° is lifted by
    /// 360° before the arithmetic mean, and the result is wrapped back into
    /// `[0, 360)`. Returns `None` for an empty buffer.
    pub fn circular_mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        if self.len == 1 {
            return self.iter().next();
        }

        let lift = self.crosses_seam();
        let sum: f64 = self
            .iter()
            .map(|v| if lift && v < 180.0 { v + 360.0 } else { v })
            .sum();

        Some(normalize_degrees(sum / self.len as f64))
    }
}

impl<const N: usize> Default for SmoothingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
