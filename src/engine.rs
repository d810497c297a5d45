//! Boundary with the external tracking engine.
//!
//! The engine itself (feature matching, pose estimation) is opaque: this
//! module only describes what it hands to the crate each frame and the
//! dataset-management calls the crate makes on it.

mod frame;
mod resources;
mod tracking_engine;

pub use frame::{FrameView, Image, PixelFormat, State, TrackableResult};
pub use resources::DatasetFiles;
pub use tracking_engine::{DatasetHandle, LoadedDataset, TrackingEngine};
