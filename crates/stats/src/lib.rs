//! Frame-rate statistics engine.
//!
//! Turns a stream of per-frame elapsed times into an instant rate, a short
//! running average (flushed every [`SHORT_AVERAGE_PERIOD`] seconds), a long
//! running average over the last [`LONG_AVERAGE_PERIOD`] seconds of short
//! averages, and a log of recent spikes.

pub mod engine;
pub mod history;

pub use engine::{
    deviation, instant_rate, is_spike, FrameOutcome, FramerateStats, LONG_AVERAGE_PERIOD,
    SHORT_AVERAGE_PERIOD, SPIKE_CAPACITY, SPIKE_THRESHOLD_PERCENT,
};
pub use history::{ShortHistory, ShortSample};
