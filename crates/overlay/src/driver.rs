use chrono::{DateTime, Local};
use fw_core::{DisplaySurface, WatchError};
use fw_stats::FramerateStats;
use tracing::{error, warn};

/// Per-frame boundary between the host loop and the statistics engine.
///
/// Nothing raised while processing a frame gets past [`FrameDriver::frame`]:
/// failures become a diagnostic on the surface and the next frame runs as
/// usual, starting from whatever state the failed frame left behind.
#[derive(Debug)]
pub struct FrameDriver<S> {
    engine:   FramerateStats,
    surface:  S,
    failures: u64,
}

impl<S: DisplaySurface> FrameDriver<S> {
    pub fn new(engine: FramerateStats, surface: S) -> Self {
        Self {
            engine,
            surface,
            failures: 0,
        }
    }

    /// Feed one rendered frame.  Returns `false` if the frame failed.
    pub fn frame(&mut self, elapsed_secs: f64, now: DateTime<Local>) -> bool {
        match self.engine.on_frame(elapsed_secs, now) {
            Ok(outcome) => {
                if outcome.flushed {
                    self.surface.set_graph_range(self.engine.graph_scale());
                }
                self.surface.show_readings(&self.engine.readings());
                true
            }
            Err(e) => {
                self.failures += 1;
                if e.is_frame_failure() {
                    warn!("Frame update failed ({} so far): {e}", self.failures);
                } else {
                    error!("Unexpected error in frame update ({} so far): {e}", self.failures);
                }
                self.surface.show_error(&diagnostic(&e, now));
                false
            }
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Number of frames that failed since startup.
    pub fn failures(&self) -> u64 {
        self.failures
    }
}

fn diagnostic(err: &WatchError, now: DateTime<Local>) -> String {
    format!("{} frame update failed: {err}", now.format("%H:%M:%S%.3f"))
}
