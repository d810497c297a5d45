//! Host-side glue: drives recognition and tracking from status updates.

mod builder;
mod driver;
mod recognizer;

pub use builder::MeshBuilder;
pub use driver::{ArDriver, DriverConfig, DriverHandle, SessionListener};
pub use recognizer::{Recognition, Recognizer};
