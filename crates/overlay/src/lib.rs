//! Wayland layer-shell overlay for `framewatch`.
//!
//! Owns the Iced application loop.  Every redraw of the overlay surface (or
//! every tick of a fixed timer, if configured) is one frame for the
//! statistics engine, fed through [`FrameDriver`] so a failing frame never
//! takes the loop down.

pub mod driver;

pub use driver::FrameDriver;

use chrono::Local;
use fw_config::{default_path, load as load_config, Corner, FrameSource, WatchConfig};
use fw_core::OverlayState;
use fw_stats::FramerateStats;
use fw_theme::Theme;
use fw_widgets::{ErrorWidget, GraphWidget, InfoWidget};
use iced::{
    time::Instant,
    widget::{column, container},
    Element, Length, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use std::time::Duration;
use tracing::{info, warn};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the overlay.  Never returns under normal operation.
pub fn run() -> iced_layershell::Result {
    let config = load_or_default();
    let size = (config.overlay.width, config.overlay.height);
    let anchor = corner_to_anchor(config.overlay.corner);

    application(Overlay::new, Overlay::namespace, Overlay::update, Overlay::view)
        .subscription(Overlay::subscription)
        .style(Overlay::style)
        .settings(Settings {
            layer_settings: LayerShellSettings {
                size: Some(size),
                exclusive_zone: 0,
                anchor,
                layer: Layer::Overlay,
                ..Default::default()
            },
            ..Default::default()
        })
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants (AnchorChange,
/// SizeChange, etc.).  Those are handled by the backend and never reach
/// `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// One rendered frame, stamped by the frame source.
    Frame(Instant),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Overlay {
    driver:     FrameDriver<OverlayState>,
    config:     WatchConfig,
    theme:      Theme,
    last_frame: Instant,
    info:       InfoWidget,
    error:      ErrorWidget,
    graph:      GraphWidget,
}

impl Overlay {
    fn new() -> (Self, Task<Message>) {
        let config = load_or_default();
        let theme  = Theme::from_config(&config.theme);

        match config.overlay.frame_source {
            FrameSource::Redraw => info!(
                "Sampling every redraw ({}x{} overlay)",
                config.overlay.width, config.overlay.height
            ),
            FrameSource::Timer => info!(
                "Sampling frames every {} ms ({}x{} overlay)",
                config.overlay.frame_interval_ms, config.overlay.width, config.overlay.height
            ),
        }

        let overlay = Self {
            driver:     FrameDriver::new(FramerateStats::new(Local::now()), OverlayState::default()),
            config,
            theme,
            last_frame: Instant::now(),
            info:       InfoWidget::new(),
            error:      ErrorWidget::new(),
            graph:      GraphWidget::new(),
        };

        (overlay, Task::none())
    }

    fn namespace() -> String {
        String::from("framewatch")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Frame(at) => {
                let elapsed = elapsed_secs(self.last_frame, at);
                self.last_frame = at;
                self.driver.frame(elapsed, Local::now());
            }
            // Layer-shell injected variants are handled by the backend.
            _ => {}
        }
        Task::none()
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let state = self.driver.surface();
        let overlay = &self.config.overlay;

        // ── Labels: readings + spike log, diagnostic underneath ──────────────
        let info: Element<'_, Message> = self.info.view(state, &self.theme);
        let mut labels = column![info].spacing(4);
        let error: Option<Element<'_, Message>> = self.error.view(state, &self.theme);
        if let Some(error) = error {
            labels = labels.push(error);
        }
        let labels = container(labels)
            .width(Length::Fill)
            .height(Length::Fixed(overlay.graph_top as f32))
            .padding(self.theme.padding);

        // ── Graph: fills the rest of the overlay ─────────────────────────────
        let graph: Element<'_, Message> = self.graph.view(&state.graph, &self.theme);
        let graph = container(graph)
            .width(Length::Fill)
            .height(Length::Fixed(overlay.graph_height() as f32));

        column![labels, graph]
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        match self.config.overlay.frame_source {
            // Each handled frame changes the view, which schedules the next redraw.
            FrameSource::Redraw => iced::window::frames().map(Message::Frame),
            FrameSource::Timer => {
                let interval = Duration::from_millis(self.config.overlay.frame_interval_ms.max(1));
                iced::time::every(interval).map(Message::Frame)
            }
        }
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        let bg = self.theme.background.opacity(self.config.overlay.opacity);
        iced::theme::Style {
            background_color: bg.into(),
            text_color: self.theme.foreground.into(),
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_or_default() -> WatchConfig {
    match load_config(default_path()) {
        Ok(config) => config,
        Err(e) => {
            warn!("Config load failed: {e}; using defaults");
            WatchConfig::default()
        }
    }
}

fn corner_to_anchor(corner: Corner) -> Anchor {
    match corner {
        Corner::TopLeft     => Anchor::Top    | Anchor::Left,
        Corner::TopRight    => Anchor::Top    | Anchor::Right,
        Corner::BottomLeft  => Anchor::Bottom | Anchor::Left,
        Corner::BottomRight => Anchor::Bottom | Anchor::Right,
    }
}

/// Seconds between two frames; zero if they arrive out of order.
fn elapsed_secs(last: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(last).as_secs_f64()
}
