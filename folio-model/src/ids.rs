use std::fmt::{self, Display};

/// Which of the two gallery panes a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PaneSide {
    Left,
    Right,
}

impl PaneSide {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            PaneSide::Left => "left",
            PaneSide::Right => "right",
        }
    }

    /// The pane on the other side of the gallery.
    pub fn opposite(self) -> Self {
        match self {
            PaneSide::Left => PaneSide::Right,
            PaneSide::Right => PaneSide::Left,
        }
    }
}

impl Display for PaneSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render identity of a set, formatted `set-{side}-{number}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetId(String);

impl SetId {
    pub fn new(side: PaneSide, set_number: u64) -> Self {
        SetId(format!("set-{side}-{set_number}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one scroll layer taking part in a sync group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        LayerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PaneSide> for LayerId {
    fn from(side: PaneSide) -> Self {
        LayerId(side.as_str().to_string())
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        LayerId(id.to_string())
    }
}

impl Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a sync group so that separate groups never cross-talk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        GroupId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        GroupId("main".to_string())
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        GroupId(id.to_string())
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
