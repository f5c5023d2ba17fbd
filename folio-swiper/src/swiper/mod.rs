//! Single-pane swiper: bootstrap, window recycling and inertial motion.

pub mod bootstrap;
pub mod gesture;
pub mod inertia;
pub mod messages;
pub mod pane;
pub mod recycle;
pub mod scheduler;
pub mod set_manager;
pub mod state;

pub use bootstrap::{BootstrapMachine, LoadStatus, PreloadJob, PreloadOutcome};
pub use gesture::GestureTracker;
pub use inertia::{InertiaConfig, InertiaEngine};
pub use messages::SwiperMessage;
pub use pane::{PaneDiagnostics, PaneTimings, SwiperPane};
pub use recycle::{
    PendingPolicy, RecycleConfig, RecycleController, RecycleOutcome,
};
pub use scheduler::{PaneTask, TaskQueue};
pub use set_manager::ShiftedWindow;
pub use state::{Stage, SwiperState};
