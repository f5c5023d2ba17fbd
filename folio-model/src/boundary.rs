use std::fmt::{self, Display};

use crate::ids::PaneSide;

/// Direction of travel through a pane's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScrollDirection {
    TowardTop,
    TowardBottom,
}

impl ScrollDirection {
    /// Greater offset means toward the bottom; anything else, including no
    /// movement at all, counts as toward the top.
    pub fn from_offsets(previous: f64, current: f64) -> Self {
        if current > previous {
            ScrollDirection::TowardBottom
        } else {
            ScrollDirection::TowardTop
        }
    }
}

impl Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrollDirection::TowardTop => write!(f, "toward-top"),
            ScrollDirection::TowardBottom => write!(f, "toward-bottom"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoundaryKind {
    /// Before the first set of the window
    Top,
    /// After the last set of the window
    Bottom,
    /// Between two adjacent sets
    Seam,
}

/// Identity of a boundary marker: `(side, kind, set_number?)`.
///
/// A seam carries the number of the set directly below it, matching the
/// render order where the seam anchor is emitted as the first child of
/// every set container except the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerId {
    pub side: PaneSide,
    pub kind: BoundaryKind,
    pub set_number: Option<u64>,
}

impl MarkerId {
    pub fn top(side: PaneSide) -> Self {
        Self {
            side,
            kind: BoundaryKind::Top,
            set_number: None,
        }
    }

    pub fn bottom(side: PaneSide) -> Self {
        Self {
            side,
            kind: BoundaryKind::Bottom,
            set_number: None,
        }
    }

    pub fn seam(side: PaneSide, set_number: u64) -> Self {
        Self {
            side,
            kind: BoundaryKind::Seam,
            set_number: Some(set_number),
        }
    }

    /// Element id used by DOM-backed renderers.
    pub fn dom_id(&self) -> String {
        match (self.kind, self.set_number) {
            (BoundaryKind::Top, _) => format!("boundary-top-{}", self.side),
            (BoundaryKind::Bottom, _) => {
                format!("boundary-bottom-{}", self.side)
            }
            (BoundaryKind::Seam, Some(n)) => {
                format!("boundary-set-{}-{n}", self.side)
            }
            (BoundaryKind::Seam, None) => {
                format!("boundary-set-{}", self.side)
            }
        }
    }

    /// Parse an element id produced by [`MarkerId::dom_id`].
    pub fn parse_dom_id(id: &str) -> Option<Self> {
        let rest = id.strip_prefix("boundary-")?;
        let side_of = |s: &str| match s {
            "left" => Some(PaneSide::Left),
            "right" => Some(PaneSide::Right),
            _ => None,
        };
        if let Some(side) = rest.strip_prefix("top-") {
            return side_of(side).map(MarkerId::top);
        }
        if let Some(side) = rest.strip_prefix("bottom-") {
            return side_of(side).map(MarkerId::bottom);
        }
        let rest = rest.strip_prefix("set-")?;
        let (side, number) = rest.split_once('-')?;
        Some(MarkerId::seam(side_of(side)?, number.parse().ok()?))
    }
}

impl Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dom_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_ties_count_as_toward_top() {
        assert_eq!(
            ScrollDirection::from_offsets(10.0, 11.0),
            ScrollDirection::TowardBottom
        );
        assert_eq!(
            ScrollDirection::from_offsets(10.0, 10.0),
            ScrollDirection::TowardTop
        );
        assert_eq!(
            ScrollDirection::from_offsets(10.0, 2.0),
            ScrollDirection::TowardTop
        );
    }

    #[test]
    fn dom_ids_parse_back() {
        for marker in [
            MarkerId::top(PaneSide::Left),
            MarkerId::bottom(PaneSide::Right),
            MarkerId::seam(PaneSide::Left, 42),
        ] {
            assert_eq!(MarkerId::parse_dom_id(&marker.dom_id()), Some(marker));
        }
        assert_eq!(
            MarkerId::seam(PaneSide::Right, 7).dom_id(),
            "boundary-set-right-7"
        );
        assert_eq!(MarkerId::parse_dom_id("boundary-set-up-1"), None);
        assert_eq!(MarkerId::parse_dom_id("set-left-1"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn marker_and_side_serialize_lowercase() {
        let marker = MarkerId::seam(PaneSide::Right, 4);
        let json = serde_json::to_value(marker).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "side": "right",
                "kind": "seam",
                "set_number": 4
            })
        );
        assert_eq!(serde_json::from_value::<MarkerId>(json).unwrap(), marker);

        assert_eq!(serde_json::to_string(&PaneSide::Left).unwrap(), "\"left\"");
        assert_eq!(
            serde_json::from_str::<PaneSide>("\"right\"").unwrap(),
            PaneSide::Right
        );
    }
}
