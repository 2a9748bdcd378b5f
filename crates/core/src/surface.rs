use crate::state::{GraphScale, Readings};

/// Output side of the overlay: whatever draws the labels and the graph.
///
/// The frame driver calls into this once per frame; implementations only
/// store or render, they never compute statistics.
pub trait DisplaySurface {
    /// Refresh the labels and push one value onto each graph series.
    fn show_readings(&mut self, readings: &Readings);

    /// Change the graph's vertical range.  Only called on flush frames.
    fn set_graph_range(&mut self, scale: GraphScale);

    /// Show a diagnostic for a frame that failed to update.
    fn show_error(&mut self, diagnostic: &str);
}
