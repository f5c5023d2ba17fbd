//! Folio swiper engine
//!
//! Headless engine behind the gallery's dual-pane infinite scroll. Each pane
//! bootstraps a window of repeated media sets, measures it, then keeps the
//! illusion of an endless loop alive by recycling sets whenever the viewer
//! crosses a boundary marker. Wheel input is turned into inertial motion and
//! mirrored to the partner pane over an injected [`sync::SyncBus`].
//!
//! Notes
//! - Rendering is left to the host. The engine exposes the pane state and
//!   expects `commit()` after every render and `frame()` once per animation
//!   frame.
//! - Measurement, visibility detection and time are injected capabilities,
//!   so the whole engine runs deterministically in tests.

pub mod boundary;
pub mod capabilities;
pub mod dual;
pub mod error;
pub mod infra;
pub mod swiper;
pub mod sync;

pub use capabilities::{LayoutProbe, MediaPreloader, PreloadError};
pub use dual::{DualSwiper, DualSwiperOptions};
pub use error::{ConfigError, Result, SwiperError};
pub use infra::runtime_config::SwiperConfig;
pub use infra::time::{Clock, ManualClock, SystemClock};
pub use swiper::{Stage, SwiperPane, SwiperState};
pub use sync::{SyncBus, SyncDirection, SyncRoutes};
