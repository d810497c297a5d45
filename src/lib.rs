//! Tracking-lifecycle orchestration and overlay rendering for planar-target
//! augmented reality.
//!
//! A tracking engine reports a [`State`] every camera frame. The
//! [`SessionOrchestrator`] turns those updates into high-level signals (new
//! target, target lost) for the host, owns the loaded datasets and the model
//! bound to the tracked target, and the [`RenderPipeline`] draws that model
//! over the camera image at the target's pose.

pub mod engine;
pub mod error;
pub mod integration;
pub mod model;
pub mod render;
pub mod tracker;

pub use engine::{DatasetFiles, FrameView, Image, PixelFormat, State, TrackableResult, TrackingEngine};
pub use error::{Error, Result};
pub use integration::{
    ArDriver, DriverConfig, DriverHandle, MeshBuilder, Recognition, Recognizer, SessionListener,
};
pub use model::{DynamicTextureSource, Mesh, Model, ModelKind, Texture, scale_fit_ratio};
pub use render::{GraphicsApi, RenderConfig, RenderPipeline, TextureId, VideoBackground, Viewport};
pub use tracker::{
    SessionConfig, SessionOrchestrator, StatusObserver, StatusUpdate, TargetInfo, TrackingStatus,
};
