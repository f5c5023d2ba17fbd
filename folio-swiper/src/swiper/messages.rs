use crate::swiper::bootstrap::PreloadOutcome;

/// Input for [`crate::SwiperPane::update`], for hosts built around message
/// dispatch.
#[derive(Debug, Clone)]
pub enum SwiperMessage {
    /// Wheel or touch delta (px)
    Wheel(f64),
    /// Native scroll moved the pane to this offset (px)
    ScrollTo(f64),
    Recenter,
    ViewportResized(f64),
    /// The presentation layer committed the latest render
    Committed,
    /// Animation-frame tick
    Frame,
    PreloadFinished(PreloadOutcome),
    /// Item `index` of set `set_number` was clicked
    Activate { set_number: u64, index: usize },
    Reset,
    Unmount,
}

impl SwiperMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wheel(_) => "Wheel",
            Self::ScrollTo(_) => "ScrollTo",
            Self::Recenter => "Recenter",
            Self::ViewportResized(_) => "ViewportResized",
            Self::Committed => "Committed",
            Self::Frame => "Frame",
            Self::PreloadFinished(_) => "PreloadFinished",
            Self::Activate { .. } => "Activate",
            Self::Reset => "Reset",
            Self::Unmount => "Unmount",
        }
    }
}
