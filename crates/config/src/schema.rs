use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `framewatch.toml`.
///
/// Only presentation is configurable; the statistics windows and the spike
/// threshold are fixed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Overlay size, placement and frame cadence.
    pub overlay: OverlayConfig,
    /// Colours and text settings.
    pub theme: ThemeConfig,
}

/// Overlay surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Overlay width in logical pixels.
    pub width: u32,
    /// Overlay height in logical pixels.
    pub height: u32,
    /// Distance from the top of the overlay to the top of the graph.
    pub graph_top: u32,
    /// Screen corner the overlay is pinned to.
    pub corner: Corner,
    /// Where frame callbacks come from.
    pub frame_source: FrameSource,
    /// Tick interval in milliseconds when `frame_source = "timer"`.
    pub frame_interval_ms: u64,
    /// Background opacity (0.0 – 1.0).
    pub opacity: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            width:             400,
            height:            400,
            graph_top:         250,
            corner:            Corner::TopLeft,
            frame_source:      FrameSource::Redraw,
            frame_interval_ms: 16,
            opacity:           0.85,
        }
    }
}

impl OverlayConfig {
    /// Height left for the graph below the labels.
    pub fn graph_height(&self) -> u32 {
        self.height.saturating_sub(self.graph_top)
    }
}

/// Screen corner the overlay sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// What drives the per-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FrameSource {
    /// One frame per redraw of the overlay surface.
    #[default]
    Redraw,
    /// A fixed timer at `frame_interval_ms`.
    Timer,
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Overlay background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Label text color.
    pub foreground: String,
    /// Error label text color.
    pub error: String,
    /// Instant frame rate series.
    pub instant_color: String,
    /// Short running average series.
    pub short_color: String,
    /// Long running average series.
    pub long_color: String,
    /// Font size in points.
    pub font_size: f32,
    /// Inner padding around the labels (pixels).
    pub padding: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background:    "#1e1e2e".to_string(),
            foreground:    "#cdd6f4".to_string(),
            error:         "#f38ba8".to_string(),
            instant_color: "#0000ff".to_string(),
            short_color:   "#ff0000".to_string(),
            long_color:    "#00ff00".to_string(),
            font_size:     13.0,
            padding:       5,
        }
    }
}
