//! Set window arithmetic.
//!
//! Pure functions: no hidden state, no I/O. A window is the ordered run of
//! rendered sets; shifting it adds a fresh set at one edge and evicts the
//! set at the opposite edge, so its length never changes.

use std::sync::Arc;

use folio_model::{MediaItem, MediaSet, PaneSide, ScrollDirection};

/// Result of [`shift_window`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftedWindow {
    pub sets: Vec<MediaSet>,
    pub set_counter: u64,
    /// Number given to the set created by this shift
    pub created: u64,
    pub evicted: Option<MediaSet>,
}

pub fn create_set(
    set_number: u64,
    items: &Arc<[MediaItem]>,
    side: PaneSide,
) -> MediaSet {
    MediaSet::new(set_number, Arc::clone(items), side)
}

/// Sets numbered `1..=set_count`; the counter ends at `set_count`.
pub fn initial_window(
    set_count: usize,
    items: &Arc<[MediaItem]>,
    side: PaneSide,
) -> (Vec<MediaSet>, u64) {
    let sets = (1..=set_count as u64)
        .map(|n| create_set(n, items, side))
        .collect();
    (sets, set_count as u64)
}

/// Shift the window one set in `direction`.
///
/// `TowardTop` prepends set `counter + 1` and drops the bottom-most set;
/// `TowardBottom` appends it and drops the top-most set. The caller must
/// pass a non-empty window; an empty one is returned unchanged.
pub fn shift_window(
    sets: &[MediaSet],
    set_counter: u64,
    items: &Arc<[MediaItem]>,
    direction: ScrollDirection,
) -> ShiftedWindow {
    debug_assert!(!sets.is_empty(), "shift_window needs a non-empty window");
    let Some(side) = sets.first().map(|s| s.side) else {
        return ShiftedWindow {
            sets: Vec::new(),
            set_counter,
            created: set_counter,
            evicted: None,
        };
    };

    let created = set_counter + 1;
    let fresh = create_set(created, items, side);
    let mut next = sets.to_vec();

    let evicted = match direction {
        ScrollDirection::TowardTop => {
            next.insert(0, fresh);
            next.pop()
        }
        ScrollDirection::TowardBottom => {
            next.push(fresh);
            Some(next.remove(0))
        }
    };

    ShiftedWindow {
        sets: next,
        set_counter: created,
        created,
        evicted,
    }
}
