//! Capabilities the host injects into a pane.
//!
//! The engine never touches a render tree directly. Preloading, layout
//! measurement and (see [`crate::boundary::BoundaryObserver`]) visibility
//! detection are reached through these seams so they can be faked in tests.

use async_trait::async_trait;
use folio_model::{MediaItem, SetId};
use thiserror::Error;

/// Reason a single media item could not be made ready for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreloadError {
    #[error("media not found: {0}")]
    NotFound(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

/// Resolves a media item to decode-ready.
///
/// Only called for images; video items count as ready immediately.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaPreloader: Send + Sync {
    async fn preload(&self, item: &MediaItem) -> Result<(), PreloadError>;
}

/// Reads rendered layout.
#[cfg_attr(test, mockall::automock)]
pub trait LayoutProbe: Send {
    /// On-screen height of the rendered set container, or `None` when the
    /// container is not part of the render tree.
    fn measure_set_height(&self, set: &SetId) -> Option<f64>;
}
