use chrono::{DateTime, Local};
use thiserror::Error;

/// Top-level error type used across the entire workspace.
#[derive(Debug, Error)]
pub enum WatchError {
    /// The long average was requested while no short averages were retained.
    #[error("frame error: short-average history is empty")]
    EmptyHistory,

    #[error("frame error: clock difference from {since} to {now} is not representable")]
    ClockOverflow {
        since: DateTime<Local>,
        now:   DateTime<Local>,
    },

    #[error("frame error: {0} is not a finite number")]
    NonFinite(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WatchError {
    /// `true` for failures raised while processing a single frame.
    pub fn is_frame_failure(&self) -> bool {
        matches!(
            self,
            Self::EmptyHistory | Self::ClockOverflow { .. } | Self::NonFinite(_)
        )
    }
}

pub type Result<T, E = WatchError> = std::result::Result<T, E>;
