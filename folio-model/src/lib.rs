//! Core data model definitions shared across folio crates.
#![allow(missing_docs)]

pub mod boundary;
pub mod error;
pub mod ids;
pub mod media;
pub mod record;
pub mod set;
pub mod sync_event;

// Intentionally curated re-exports for downstream consumers.
pub use boundary::{BoundaryKind, MarkerId, ScrollDirection};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{GroupId, LayerId, PaneSide, SetId};
pub use media::{MediaItem, MediaKind};
pub use record::{MediaCollection, MediaRecord};
pub use set::MediaSet;
pub use sync_event::SyncEvent;
