use fw_core::{state::OverlayState, Readings, Spike};
use fw_stats::{LONG_AVERAGE_PERIOD, SHORT_AVERAGE_PERIOD, SPIKE_THRESHOLD_PERCENT};
use fw_theme::Theme;
use iced::{widget::text, Element};

/// Main label: instant/short/long frame rates followed by the spike log.
#[derive(Debug, Default)]
pub struct InfoWidget;

impl InfoWidget {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a, M: 'a>(&'a self, state: &'a OverlayState, theme: &'a Theme) -> Element<'a, M> {
        text(format_readings(&state.readings))
            .size(theme.font_size)
            .color(theme.foreground)
            .into()
    }
}

/// Render readings as the label text, spikes most recent first.
pub fn format_readings(readings: &Readings) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:.1} FPS instant framerate\n", readings.instant));
    out.push_str(&format!(
        "{:.1} FPS short running avg ({SHORT_AVERAGE_PERIOD:.2}s)\n",
        readings.short_average
    ));
    out.push_str(&format!(
        "{:.1} FPS long running avg ({LONG_AVERAGE_PERIOD:.2}s)\n",
        readings.long_average
    ));
    out.push_str(&format!(
        "---- Recent major spikes (>{SPIKE_THRESHOLD_PERCENT:.1}%) ----\n"
    ));
    for spike in &readings.spikes {
        out.push_str(&format_spike(spike));
        out.push('\n');
    }
    out
}

/// `"40.0 FPS (33.3% deviation) at 12:34:56.789"`.
pub fn format_spike(spike: &Spike) -> String {
    format!(
        "{:.1} FPS ({:.1}% deviation) at {}",
        spike.framerate,
        spike.deviation * 100.0,
        spike.timestamp.format("%H:%M:%S%.3f")
    )
}
