use thiserror::Error;

use crate::swiper::Stage;

/// Failures raised by the swiper engine.
///
/// Only the bootstrap failures are user visible; they are mirrored into
/// [`crate::SwiperState::error`] and the pane moves to [`Stage::Error`].
/// The rest report host protocol misuse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwiperError {
    #[error("failed to load media item {index} ({url}): {reason}")]
    Preload {
        index: usize,
        url: String,
        reason: String,
    },

    #[error("no media to display")]
    EmptyCollection,

    #[error("measurement anchor {anchor} is not rendered")]
    MeasurementAnchorMissing { anchor: String },

    #[error("measured set height {0} is not usable")]
    InvalidSetHeight(f64),

    #[error("invalid stage transition: {from} -> {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("bootstrap already started; reset before loading again")]
    AlreadyBootstrapped,

    #[error("pane is unmounted")]
    Unmounted,
}

impl SwiperError {
    /// Whether the failure belongs on screen next to a retry control.
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            SwiperError::Preload { .. }
                | SwiperError::EmptyCollection
                | SwiperError::MeasurementAnchorMissing { .. }
                | SwiperError::InvalidSetHeight(_)
        )
    }
}

/// Failures while loading or validating a [`crate::SwiperConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SwiperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_bootstrap_failures_are_user_visible() {
        assert!(SwiperError::EmptyCollection.is_user_visible());
        assert!(SwiperError::InvalidSetHeight(0.0).is_user_visible());
        assert!(!SwiperError::AlreadyBootstrapped.is_user_visible());
        assert!(
            !SwiperError::InvalidTransition {
                from: Stage::Loading,
                to: Stage::Ready,
            }
            .is_user_visible()
        );
    }

    #[test]
    fn preload_message_names_index_and_url() {
        let err = SwiperError::Preload {
            index: 2,
            url: "/img/c.jpg".to_string(),
            reason: "decode failed".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains('2'));
        assert!(message.contains("/img/c.jpg"));
    }
}
