use fw_core::state::OverlayState;
use fw_theme::Theme;
use iced::{widget::text, Element};

/// Shows the diagnostic of the last failed frame.
///
/// Hidden entirely while no frame has failed.
#[derive(Debug, Default)]
pub struct ErrorWidget;

impl ErrorWidget {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when there is nothing to report; callers should skip rendering.
    pub fn view<'a, M: 'a>(
        &'a self,
        state: &'a OverlayState,
        theme: &'a Theme,
    ) -> Option<Element<'a, M>> {
        let diagnostic = state.error.as_deref()?;
        Some(
            text(diagnostic)
                .size(theme.font_size - 1.0)
                .color(theme.error)
                .into(),
        )
    }
}
