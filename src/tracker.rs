mod catalog;
mod orchestrator;
pub(crate) mod session;
mod state_machine;
mod track_state;

pub use catalog::{Dataset, TargetCatalog, TargetDescriptor};
pub use orchestrator::{SessionConfig, SessionOrchestrator};
pub use session::{TargetInfo, TargetSession};
pub use state_machine::{StatusObserver, StatusUpdate, TrackingStateMachine, UpdateRequester};
pub use track_state::{LossWindow, TrackingStatus};
