use crate::history::{ShortHistory, ShortSample};
use chrono::{DateTime, Local};
use fw_core::{BoundedBuffer, GraphScale, Readings, Result, Spike, WatchError};
use tracing::{debug, warn};

/// Seconds of frames folded into one short running average.
pub const SHORT_AVERAGE_PERIOD: f64 = 0.25;
/// Seconds of short averages folded into the long running average.
pub const LONG_AVERAGE_PERIOD: f64 = 5.0;
/// Minimum drop below the long average, in percent, that counts as a spike.
pub const SPIKE_THRESHOLD_PERCENT: f64 = 10.0;
/// Number of spikes kept for display.
pub const SPIKE_CAPACITY: usize = 7;

/// Frame rate implied by a single frame: `1 / min(1.0, elapsed)`.
///
/// Frames longer than a second all read as 1 FPS.  Zero gives `+inf` and
/// negative input gives a negative rate; nothing else is corrected.
#[inline]
pub fn instant_rate(elapsed_secs: f64) -> f64 {
    1.0 / elapsed_secs.min(1.0)
}

/// Fraction by which `short_average` sits below `long_average`.
///
/// Positive for drops, negative for rises.
#[inline]
pub fn deviation(long_average: f64, short_average: f64) -> f64 {
    (long_average - short_average) / long_average
}

/// `true` when `deviation` is strictly above the spike threshold.
#[inline]
pub fn is_spike(deviation: f64) -> bool {
    deviation > SPIKE_THRESHOLD_PERCENT / 100.0
}

/// What a single [`FramerateStats::on_frame`] call did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    /// Instant rate of this frame.
    pub instant: f64,
    /// Whether the short window was flushed (averages, spikes and scale updated).
    pub flushed: bool,
    /// Spike recorded on this frame, if any.
    pub spike: Option<Spike>,
}

/// Running frame-rate statistics.
///
/// Every frame bumps the short-window counter and recomputes the instant
/// rate.  Once more than [`SHORT_AVERAGE_PERIOD`] seconds have passed since
/// the last flush, the window is flushed: a new short average is appended to
/// the history, the long average is recomputed, the spike condition is
/// checked and the graph scale follows the new long average.
#[derive(Debug, Clone)]
pub struct FramerateStats {
    short_period:  f64,
    long_period:   f64,
    // ── Short window ─────────────────────────────────────────────────────────
    frame_count:   u64,
    window_start:  DateTime<Local>,
    // ── Readings ─────────────────────────────────────────────────────────────
    instant:       f64,
    short_average: f64,
    long_average:  f64,
    history:       ShortHistory,
    spikes:        BoundedBuffer<Spike>,
    scale:         GraphScale,
}

impl FramerateStats {
    /// Engine whose first short window starts at `started`.
    pub fn new(started: DateTime<Local>) -> Self {
        Self::with_periods(started, SHORT_AVERAGE_PERIOD, LONG_AVERAGE_PERIOD)
    }

    /// Engine with non-standard window lengths (seconds).
    pub fn with_periods(started: DateTime<Local>, short_period: f64, long_period: f64) -> Self {
        Self {
            short_period,
            long_period,
            frame_count:   0,
            window_start:  started,
            instant:       0.0,
            short_average: 0.0,
            long_average:  0.0,
            history:       ShortHistory::new(),
            spikes:        BoundedBuffer::new(SPIKE_CAPACITY),
            scale:         GraphScale::default(),
        }
    }

    /// Process one rendered frame.
    ///
    /// On error the state changes made before the failure are kept; the next
    /// call starts from there.
    pub fn on_frame(&mut self, elapsed_secs: f64, now: DateTime<Local>) -> Result<FrameOutcome> {
        self.frame_count += 1;
        self.instant = instant_rate(elapsed_secs);

        let window_secs = seconds_between(self.window_start, now)?;
        if window_secs <= self.short_period {
            return Ok(FrameOutcome {
                instant: self.instant,
                flushed: false,
                spike:   None,
            });
        }

        self.flush_short_window(now, window_secs);
        self.recompute_long_average()?;
        let spike = self.check_for_spike(now)?;
        self.scale = GraphScale::for_long_average(self.long_average);

        Ok(FrameOutcome {
            instant: self.instant,
            flushed: true,
            spike,
        })
    }

    fn flush_short_window(&mut self, now: DateTime<Local>, window_secs: f64) {
        self.short_average = self.frame_count as f64 / window_secs;
        self.history.push(now, self.short_average);
        self.history.prune(self.long_period);
        self.window_start = now;
        self.frame_count = 0;
    }

    fn recompute_long_average(&mut self) -> Result<()> {
        let mean = self.history.mean().ok_or(WatchError::EmptyHistory)?;
        if !mean.is_finite() {
            return Err(WatchError::NonFinite("long average"));
        }
        self.long_average = mean;
        debug!(
            "short window flushed: short {:.1} FPS, long {:.1} FPS over {} samples ({:.2}s)",
            self.short_average,
            self.long_average,
            self.history.len(),
            self.history.span_secs()
        );
        Ok(())
    }

    fn check_for_spike(&mut self, now: DateTime<Local>) -> Result<Option<Spike>> {
        let deviation = deviation(self.long_average, self.short_average);
        if deviation.is_nan() {
            return Err(WatchError::NonFinite("spike deviation"));
        }
        if !is_spike(deviation) {
            return Ok(None);
        }

        let spike = Spike {
            timestamp: now,
            framerate: self.short_average,
            deviation,
        };
        warn!(
            "frame-rate spike: {:.1} FPS, {:.1}% below the long average",
            spike.framerate,
            spike.deviation * 100.0
        );
        self.spikes.push(spike.clone());
        Ok(Some(spike))
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn instant_rate(&self) -> f64 {
        self.instant
    }

    /// Last computed short average; unchanged between flushes.
    pub fn short_average(&self) -> f64 {
        self.short_average
    }

    /// Last computed long average; unchanged between flushes.
    pub fn long_average(&self) -> f64 {
        self.long_average
    }

    /// Recorded spikes, most recent first (at most [`SPIKE_CAPACITY`]).
    pub fn recent_spikes(&self) -> impl Iterator<Item = &Spike> {
        self.spikes.newest_first()
    }

    /// Graph range, recomputed on flush frames only.
    pub fn graph_scale(&self) -> GraphScale {
        self.scale
    }

    /// Short averages currently feeding the long average, oldest first.
    pub fn short_history(&self) -> impl Iterator<Item = &ShortSample> {
        self.history.iter()
    }

    /// Snapshot for the display surface.
    pub fn readings(&self) -> Readings {
        Readings {
            instant:       self.instant,
            short_average: self.short_average,
            long_average:  self.long_average,
            spikes:        self.recent_spikes().cloned().collect(),
        }
    }
}

fn seconds_between(since: DateTime<Local>, now: DateTime<Local>) -> Result<f64> {
    now.signed_duration_since(since)
        .num_nanoseconds()
        .map(|ns| ns as f64 / 1e9)
        .ok_or(WatchError::ClockOverflow { since, now })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use proptest::prelude::*;

    fn frame_60() -> TimeDelta {
        TimeDelta::nanoseconds(16_666_666)
    }

    fn frame_65() -> TimeDelta {
        TimeDelta::nanoseconds(15_384_615)
    }

    fn frame_40() -> TimeDelta {
        TimeDelta::milliseconds(25)
    }

    struct Rig {
        engine: FramerateStats,
        now:    DateTime<Local>,
    }

    impl Rig {
        fn new() -> Self {
            let now = Local::now();
            Self {
                engine: FramerateStats::new(now),
                now,
            }
        }

        fn frames(&mut self, frame: TimeDelta, count: usize) -> Vec<FrameOutcome> {
            let elapsed = frame.num_nanoseconds().unwrap() as f64 / 1e9;
            (0..count)
                .map(|_| {
                    self.now = self.now + frame;
                    self.engine.on_frame(elapsed, self.now).unwrap()
                })
                .collect()
        }

        /// Feed frames until `n` short windows have flushed; stops on the flush frame.
        fn flushes(&mut self, frame: TimeDelta, n: usize) -> Vec<FrameOutcome> {
            let mut outcomes = Vec::new();
            let mut seen = 0;
            while seen < n {
                let outcome = self.frames(frame, 1).remove(0);
                seen += usize::from(outcome.flushed);
                outcomes.push(outcome);
            }
            outcomes
        }
    }

    fn flush_indices(outcomes: &[FrameOutcome]) -> Vec<usize> {
        outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.flushed)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn instant_rate_follows_clamped_formula() {
        assert_eq!(instant_rate(0.5), 2.0);
        assert_eq!(instant_rate(1.0 / 60.0), 60.0);
        assert_eq!(instant_rate(3.0), 1.0);
        assert_eq!(instant_rate(0.0), f64::INFINITY);
        assert_eq!(instant_rate(-0.5), -2.0);
    }

    #[test]
    fn averages_are_zero_before_first_flush() {
        let mut rig = Rig::new();
        let outcomes = rig.frames(frame_60(), 15);

        assert!(outcomes.iter().all(|o| !o.flushed));
        assert_eq!(rig.engine.short_average(), 0.0);
        assert_eq!(rig.engine.long_average(), 0.0);
        assert!(rig.engine.graph_scale().is_empty());
        assert_eq!(rig.engine.short_history().count(), 0);
        assert!((rig.engine.instant_rate() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn steady_sixty_fps_flushes_twice_in_half_a_second() {
        let mut rig = Rig::new();
        let outcomes = rig.frames(frame_60(), 32);

        assert_eq!(flush_indices(&outcomes), vec![15, 31]);
        let rates: Vec<f64> = rig.engine.short_history().map(|s| s.rate).collect();
        assert_eq!(rates.len(), 2);
        for rate in rates {
            assert!((rate - 60.0).abs() < 1e-3, "short average {rate}");
        }
        assert!((rig.engine.long_average() - 60.0).abs() < 1e-3);
    }

    #[test]
    fn thirty_frames_rounded_up_flush_on_frames_fifteen_and_thirty() {
        // 1/60 s rounded up to the next nanosecond: 15 frames already exceed 0.25 s.
        let mut rig = Rig::new();
        let outcomes = rig.frames(TimeDelta::nanoseconds(16_666_667), 30);

        assert_eq!(flush_indices(&outcomes), vec![14, 29]);
        assert!((rig.engine.short_average() - 60.0).abs() < 1e-3);
        assert!((rig.engine.long_average() - 60.0).abs() < 1e-3);
        assert_eq!(rig.engine.recent_spikes().count(), 0);
    }

    #[test]
    fn short_average_is_stale_between_flushes() {
        let mut rig = Rig::new();
        rig.frames(frame_60(), 16);
        let flushed = rig.engine.short_average();

        for outcome in rig.frames(frame_40(), 10) {
            assert!(!outcome.flushed);
            assert_eq!(rig.engine.short_average(), flushed);
            assert!((outcome.instant - 40.0).abs() < 1e-9);
        }

        let last = rig.frames(frame_40(), 1);
        assert!(last[0].flushed);
        assert!((rig.engine.short_average() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn history_never_spans_more_than_long_period() {
        let mut rig = Rig::new();
        rig.flushes(frame_60(), 40);

        let samples: Vec<ShortSample> = rig.engine.short_history().copied().collect();
        let oldest = samples.first().unwrap().timestamp;
        let newest = samples.last().unwrap().timestamp;
        let span = newest.signed_duration_since(oldest).num_nanoseconds().unwrap() as f64 / 1e9;

        assert!(span <= LONG_AVERAGE_PERIOD, "span {span}");
        assert!(span > LONG_AVERAGE_PERIOD - 0.5, "history pruned too far: {span}");
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn long_average_is_mean_of_retained_history() {
        let mut rig = Rig::new();
        rig.flushes(frame_60(), 12);
        rig.flushes(frame_40(), 8);
        rig.flushes(frame_65(), 6);

        let rates: Vec<f64> = rig.engine.short_history().map(|s| s.rate).collect();
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        assert!((rig.engine.long_average() - mean).abs() < 1e-9);
    }

    #[test]
    fn drop_below_long_average_records_spike() {
        let mut rig = Rig::new();
        rig.flushes(frame_60(), 24);
        assert_eq!(rig.engine.recent_spikes().count(), 0);

        let outcomes = rig.flushes(frame_40(), 1);
        assert_eq!(outcomes.len(), 11);
        let spike = outcomes.last().unwrap().spike.clone().expect("spike recorded");
        let long = rig.engine.long_average();

        assert!((spike.framerate - 40.0).abs() < 1e-9);
        assert!((spike.deviation - (long - 40.0) / long).abs() < 1e-12);
        assert!(spike.deviation > 0.3);
        assert_eq!(spike.timestamp, rig.now);
        assert_eq!(rig.engine.recent_spikes().count(), 1);
    }

    #[test]
    fn rise_above_long_average_is_not_a_spike() {
        let mut rig = Rig::new();
        rig.flushes(frame_60(), 24);

        let outcomes = rig.flushes(frame_65(), 1);
        assert_eq!(outcomes.len(), 17);
        assert!(outcomes.last().unwrap().flushed);
        assert!((rig.engine.short_average() - 65.0).abs() < 1e-3);
        assert!(outcomes.iter().all(|o| o.spike.is_none()));
        assert_eq!(rig.engine.recent_spikes().count(), 0);
    }

    #[test]
    fn deviation_of_exactly_ten_percent_is_not_a_spike() {
        assert_eq!(deviation(100.0, 90.0), 0.1);
        assert!(!is_spike(deviation(100.0, 90.0)));
        assert!(is_spike(deviation(100.0, 89.99)));
        assert!(!is_spike(deviation(60.0, 65.0)));
    }

    #[test]
    fn spike_log_keeps_seven_most_recent() {
        let mut rig = Rig::new();
        rig.flushes(frame_60(), 8);

        let mut recorded = Vec::new();
        for _ in 0..9 {
            let outcomes = rig.flushes(frame_40(), 1);
            recorded.push(outcomes.last().unwrap().spike.clone().expect("spike"));
            rig.flushes(frame_60(), 4);
        }

        let kept: Vec<Spike> = rig.engine.recent_spikes().cloned().collect();
        assert_eq!(kept.len(), SPIKE_CAPACITY);
        let expected: Vec<Spike> = recorded.iter().rev().take(SPIKE_CAPACITY).cloned().collect();
        assert_eq!(kept, expected);
        assert_eq!(rig.engine.readings().spikes, expected);
    }

    #[test]
    fn graph_scale_changes_only_on_flush() {
        let mut rig = Rig::new();
        rig.frames(frame_60(), 16);
        let scale = rig.engine.graph_scale();
        assert_eq!(scale.min, 0.0);
        assert!((scale.max - rig.engine.long_average() * 1.5).abs() < 1e-9);

        for outcome in rig.frames(frame_40(), 10) {
            assert!(!outcome.flushed);
            assert_eq!(rig.engine.graph_scale(), scale);
        }
        rig.frames(frame_40(), 1);
        assert_ne!(rig.engine.graph_scale(), scale);
    }

    #[test]
    fn empty_history_fault_is_reported_and_next_frame_recovers() {
        let start = Local::now();
        let mut engine = FramerateStats::with_periods(start, SHORT_AVERAGE_PERIOD, -1.0);
        let mut now = start;
        let elapsed = 1.0 / 60.0;

        for _ in 0..15 {
            now = now + frame_60();
            assert!(engine.on_frame(elapsed, now).is_ok());
        }
        now = now + frame_60();
        let err = engine.on_frame(elapsed, now).unwrap_err();
        assert!(matches!(err, WatchError::EmptyHistory));
        assert!(err.is_frame_failure());

        // Partial progress is kept: the short average was computed before the fault.
        assert!((engine.short_average() - 60.0).abs() < 1e-3);
        assert_eq!(engine.long_average(), 0.0);

        now = now + frame_60();
        let outcome = engine.on_frame(elapsed, now).unwrap();
        assert!(!outcome.flushed);
    }

    #[test]
    fn clock_stepping_backwards_does_not_flush() {
        let start = Local::now();
        let mut engine = FramerateStats::new(start);
        let outcome = engine.on_frame(0.016, start - TimeDelta::seconds(3)).unwrap();
        assert!(!outcome.flushed);
        assert_eq!(engine.short_average(), 0.0);
    }

    proptest! {
        #[test]
        fn instant_rate_is_exact_for_any_elapsed(elapsed in -10.0f64..10.0) {
            let start = Local::now();
            let mut engine = FramerateStats::new(start);
            let outcome = engine.on_frame(elapsed, start).unwrap();
            let expected = 1.0 / elapsed.min(1.0);
            prop_assert_eq!(outcome.instant.to_bits(), expected.to_bits());
            prop_assert_eq!(engine.instant_rate().to_bits(), expected.to_bits());
        }

        #[test]
        fn invariants_hold_over_arbitrary_frame_times(
            frame_micros in prop::collection::vec(100i64..200_000, 1..600)
        ) {
            let start = Local::now();
            let mut engine = FramerateStats::new(start);
            let mut now = start;

            for micros in frame_micros {
                let before = engine.graph_scale();
                now = now + TimeDelta::microseconds(micros);
                let outcome = engine.on_frame(micros as f64 / 1e6, now).unwrap();

                let rates: Vec<f64> = engine.short_history().map(|s| s.rate).collect();
                if let (Some(oldest), Some(newest)) =
                    (engine.short_history().next(), engine.short_history().last())
                {
                    let span = newest.timestamp.signed_duration_since(oldest.timestamp);
                    prop_assert!(span.num_nanoseconds().unwrap() as f64 / 1e9 <= LONG_AVERAGE_PERIOD);
                    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
                    prop_assert!((engine.long_average() - mean).abs() < 1e-9);
                }
                prop_assert!(engine.recent_spikes().count() <= SPIKE_CAPACITY);

                if outcome.flushed {
                    let scale = engine.graph_scale();
                    prop_assert_eq!(scale.min, 0.0);
                    prop_assert!((scale.max - 1.5 * engine.long_average()).abs() < 1e-9);
                } else {
                    prop_assert_eq!(engine.graph_scale(), before);
                }
                if let Some(spike) = outcome.spike {
                    prop_assert!(spike.deviation > 0.1);
                }
            }
        }
    }
}
