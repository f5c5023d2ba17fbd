use std::fmt::{self, Display, Formatter};

use crate::error::{ModelError, Result};

/// Simple enum for the kinds of media a gallery pane can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MediaKind {
    /// Still image; must be decoded before layout can be measured
    #[default]
    Image,
    /// Video; treated as ready as soon as it is known
    Video,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// One resolved media reference. Immutable once resolved; owned by the host
/// page and only read by the swiper.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaItem {
    pub url: String,
    pub kind: MediaKind,
    /// Record the item belongs to, used as the navigation key when the
    /// item is activated.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub record_id: Option<String>,
}

impl MediaItem {
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
            record_id: None,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::Image)
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(url, MediaKind::Video)
    }

    pub fn with_record_id(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    /// Checked constructor rejecting blank URLs.
    pub fn try_new(url: impl Into<String>, kind: MediaKind) -> Result<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ModelError::InvalidMedia(
                "media url must not be empty".to_string(),
            ));
        }
        Ok(Self::new(url, kind))
    }

    pub fn is_video(&self) -> bool {
        matches!(self.kind, MediaKind::Video)
    }

    /// Last path segment of the URL, for log lines.
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}
