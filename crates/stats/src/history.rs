use chrono::{DateTime, Local};
use std::collections::VecDeque;

/// One short running average, stamped with the time it was computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortSample {
    pub timestamp: DateTime<Local>,
    pub rate:      f64,
}

/// Time-windowed history of short averages, the input of the long average.
///
/// Samples are kept in timestamp order and pruned from the oldest end only.
#[derive(Debug, Clone, Default)]
pub struct ShortHistory {
    samples: VecDeque<ShortSample>,
}

impl ShortHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample.  Timestamps are expected to be non-decreasing.
    pub fn push(&mut self, timestamp: DateTime<Local>, rate: f64) {
        self.samples.push_back(ShortSample { timestamp, rate });
    }

    /// Drop the oldest samples until newest − oldest ≤ `window_secs`.
    ///
    /// Returns how many samples were removed.
    pub fn prune(&mut self, window_secs: f64) -> usize {
        let mut removed = 0;
        while let (Some(oldest), Some(newest)) = (self.samples.front(), self.samples.back()) {
            if !exceeds(oldest.timestamp, newest.timestamp, window_secs) {
                break;
            }
            self.samples.pop_front();
            removed += 1;
        }
        removed
    }

    /// Arithmetic mean of the retained rates, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().map(|s| s.rate).sum();
        Some(sum / self.samples.len() as f64)
    }

    /// Seconds between the oldest and newest sample (0 with fewer than two).
    pub fn span_secs(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(oldest), Some(newest)) => newest
                .timestamp
                .signed_duration_since(oldest.timestamp)
                .num_nanoseconds()
                .map_or(f64::INFINITY, |ns| ns as f64 / 1e9),
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Oldest sample first.
    pub fn iter(&self) -> impl Iterator<Item = &ShortSample> {
        self.samples.iter()
    }
}

// An unrepresentable span is treated as too old.
fn exceeds(oldest: DateTime<Local>, newest: DateTime<Local>, window_secs: f64) -> bool {
    newest
        .signed_duration_since(oldest)
        .num_nanoseconds()
        .map_or(true, |ns| ns as f64 / 1e9 > window_secs)
}
