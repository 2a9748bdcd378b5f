pub mod colors;

pub use colors::Color;

use fw_config::ThemeConfig;
use fw_core::Series;

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colours are parsed once up front.  [`Theme::from_config`] never fails:
/// an invalid colour string is logged and replaced by the built-in default.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background:    Color,
    pub foreground:    Color,
    pub error:         Color,
    pub instant_color: Color,
    pub short_color:   Color,
    pub long_color:    Color,
    pub font_size:     f32,
    pub padding:       u16,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            background:    parse_or(&cfg.background, Color::DARK),
            foreground:    parse_or(&cfg.foreground, Color::WHITE),
            error:         parse_or(&cfg.error, Color::PINK),
            instant_color: parse_or(&cfg.instant_color, Color::BLUE),
            short_color:   parse_or(&cfg.short_color, Color::RED),
            long_color:    parse_or(&cfg.long_color, Color::GREEN),
            font_size:     cfg.font_size,
            padding:       cfg.padding,
        }
    }

    /// Line color for a graph series.
    pub fn series_color(&self, series: Series) -> Color {
        match series {
            Series::Instant      => self.instant_color,
            Series::ShortAverage => self.short_color,
            Series::LongAverage  => self.long_color,
        }
    }
}

fn parse_or(raw: &str, fallback: Color) -> Color {
    raw.parse().unwrap_or_else(|e| {
        tracing::warn!("{e}; using the default colour");
        fallback
    })
}
