use std::sync::Arc;

use crate::error::{ModelError, Result};
use crate::media::{MediaItem, MediaKind};

/// One project image row as delivered by the content backend.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaRecord {
    pub id: String,
    pub image_url: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub media_kind: MediaKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub video_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub thumbnail_url: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub show_in_home: bool,
    /// Published flag
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub in_project_order: i64,
}

impl MediaRecord {
    /// Whether the row belongs on the home gallery.
    pub fn is_listed(&self) -> bool {
        self.status && self.show_in_home
    }

    /// Resolve the row to the media item a pane displays.
    ///
    /// Video rows prefer `video_url` and fall back to `image_url`.
    pub fn to_media_item(&self) -> Result<MediaItem> {
        let url = match self.media_kind {
            MediaKind::Video => self
                .video_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(&self.image_url),
            MediaKind::Image => &self.image_url,
        };

        if url.trim().is_empty() {
            return Err(ModelError::InvalidRecord {
                id: self.id.clone(),
                reason: "no displayable url".to_string(),
            });
        }

        Ok(MediaItem::new(url, self.media_kind).with_record_id(&self.id))
    }
}

/// Ordered, shared media list handed to both panes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaCollection {
    items: Arc<[MediaItem]>,
}

impl MediaCollection {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Build the home gallery list from backend rows: listed rows only,
    /// ordered by `in_project_order` (stable for ties).
    pub fn from_records(records: &[MediaRecord]) -> Result<Self> {
        let mut listed: Vec<&MediaRecord> =
            records.iter().filter(|r| r.is_listed()).collect();
        listed.sort_by_key(|r| r.in_project_order);

        let items = listed
            .into_iter()
            .map(MediaRecord::to_media_item)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(items))
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn shared(&self) -> Arc<[MediaItem]> {
        Arc::clone(&self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<MediaItem>> for MediaCollection {
    fn from(items: Vec<MediaItem>) -> Self {
        Self::new(items)
    }
}
