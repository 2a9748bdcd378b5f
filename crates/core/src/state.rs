use crate::{buffer::BoundedBuffer, surface::DisplaySurface};
use chrono::{DateTime, Local};

/// A detected frame-rate drop relative to the long running average.
#[derive(Debug, Clone, PartialEq)]
pub struct Spike {
    /// When the offending short average was computed.
    pub timestamp: DateTime<Local>,
    /// The short-average frame rate that triggered the spike.
    pub framerate: f64,
    /// Fraction below the long average (`0.25` = 25% slower).
    pub deviation: f64,
}

/// Vertical range of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GraphScale {
    pub min: f64,
    pub max: f64,
}

impl GraphScale {
    /// Headroom above the long average so lines don't stick to the top.
    pub const HEADROOM: f64 = 1.5;

    /// `[0, long_average * 1.5]`.
    #[must_use]
    pub fn for_long_average(long_average: f64) -> Self {
        Self {
            min: 0.0,
            max: long_average * Self::HEADROOM,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// `true` until a usable range has been computed.
    pub fn is_empty(&self) -> bool {
        let span = self.span();
        !span.is_finite() || span <= 0.0
    }

    /// Position of `value` inside the range as a fraction in `[0, 1]`.
    ///
    /// Out-of-range and infinite values are clamped; NaN and an empty range map to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_empty() || value.is_nan() {
            return 0.0;
        }
        ((value - self.min) / self.span()).clamp(0.0, 1.0)
    }
}

/// Current engine readings as shown by the info label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings {
    /// Rate implied by the most recent frame alone.
    pub instant: f64,
    /// Last computed short running average (stale between flushes).
    pub short_average: f64,
    /// Last computed long running average (stale between flushes).
    pub long_average: f64,
    /// Recent spikes, most recent first.
    pub spikes: Vec<Spike>,
}

/// The three plotted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Instant,
    ShortAverage,
    LongAverage,
}

impl Series {
    pub const ALL: [Self; 3] = [Self::Instant, Self::ShortAverage, Self::LongAverage];
}

/// Scrolling history for the graph, one bounded buffer per [`Series`].
#[derive(Debug, Clone)]
pub struct GraphState {
    instant: BoundedBuffer<f64>,
    short:   BoundedBuffer<f64>,
    long:    BoundedBuffer<f64>,
    /// Vertical range; only changes on flush frames.
    pub scale: GraphScale,
}

impl GraphState {
    /// Number of readings plotted along the X axis.
    pub const LENGTH: usize = 500;

    /// Every series starts as a flat line at zero so new values scroll in
    /// from the right.
    pub fn new(length: usize) -> Self {
        Self {
            instant: BoundedBuffer::filled(length, 0.0),
            short:   BoundedBuffer::filled(length, 0.0),
            long:    BoundedBuffer::filled(length, 0.0),
            scale:   GraphScale::default(),
        }
    }

    /// Append one value to each series.
    pub fn push(&mut self, readings: &Readings) {
        self.instant.push(readings.instant);
        self.short.push(readings.short_average);
        self.long.push(readings.long_average);
    }

    pub fn series(&self, series: Series) -> &BoundedBuffer<f64> {
        match series {
            Series::Instant      => &self.instant,
            Series::ShortAverage => &self.short,
            Series::LongAverage  => &self.long,
        }
    }

    /// Number of points per series.
    pub fn length(&self) -> usize {
        self.instant.capacity()
    }
}

impl Default for GraphState {
    fn default() -> Self {
        Self::new(Self::LENGTH)
    }
}

/// Central overlay state; all widgets read from this snapshot.
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    /// Latest readings shown by the info label.
    pub readings: Readings,
    /// Graph series and range.
    pub graph: GraphState,
    /// Diagnostic of the most recent failed frame.  Stays visible once set.
    pub error: Option<String>,
}

impl DisplaySurface for OverlayState {
    fn show_readings(&mut self, readings: &Readings) {
        self.graph.push(readings);
        self.readings = readings.clone();
    }

    fn set_graph_range(&mut self, scale: GraphScale) {
        self.graph.scale = scale;
    }

    fn show_error(&mut self, diagnostic: &str) {
        self.error = Some(diagnostic.to_owned());
    }
}
