use std::sync::Arc;

use crate::ids::{PaneSide, SetId};
use crate::media::MediaItem;

/// One full, numbered copy of the media collection laid out contiguously in
/// a pane. The items slice is shared between every set of a window, so a
/// set is always a complete, order-preserving copy of the base collection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaSet {
    pub id: SetId,
    pub set_number: u64,
    pub items: Arc<[MediaItem]>,
    pub side: PaneSide,
}

impl MediaSet {
    pub fn new(
        set_number: u64,
        items: Arc<[MediaItem]>,
        side: PaneSide,
    ) -> Self {
        Self {
            id: SetId::new(side, set_number),
            set_number,
            items,
            side,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }
}
