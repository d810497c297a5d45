//! Dataset-management side of the tracking engine.

use nalgebra::Vector2;

use crate::error::Result;
use crate::tracker::TargetDescriptor;

/// Opaque engine-side identifier of a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatasetHandle(pub u64);

/// What the engine reports after loading a dataset resource.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub handle: DatasetHandle,
    pub targets: Vec<TargetDescriptor>,
}

/// The image tracker of the external tracking engine.
///
/// Implementations wrap the vendor SDK. Every method is called from the host
/// control thread, except `set_update_callback` which is also reached when an
/// observer is (un)registered.
///
/// # Example
///
/// ```ignore
/// use artrack_rs::engine::{DatasetFiles, DatasetHandle, LoadedDataset, TrackingEngine};
///
/// struct VendorTracker { /* SDK handles */ }
///
/// impl TrackingEngine for VendorTracker {
///     fn dataset_exists(&self, resource: &str) -> bool {
///         DatasetFiles::new(resource).exists_in(&self.assets_dir)
///     }
///     // ...
/// }
/// ```
pub trait TrackingEngine: Send {
    /// Whether a dataset resource with this name is bundled with the application.
    fn dataset_exists(&self, resource: &str) -> bool;

    /// Create and load a dataset from a bundled resource.
    fn load_dataset(&mut self, resource: &str) -> Result<LoadedDataset>;

    /// Override the physical size the engine uses for a target of a loaded dataset.
    fn resize_target(&mut self, dataset: DatasetHandle, target: &str, size: Vector2<f32>);

    /// Bind a dataset into the tracker. Returns false if the engine refused it.
    fn activate_dataset(&mut self, dataset: DatasetHandle) -> bool;

    fn deactivate_dataset(&mut self, dataset: DatasetHandle);

    /// Release a dataset. It is deactivated beforehand.
    fn destroy_dataset(&mut self, dataset: DatasetHandle);

    /// Start the image tracker.
    fn start(&mut self);

    /// Stop the image tracker.
    fn stop(&mut self);

    /// Enable or disable delivery of per-frame updates to
    /// [`SessionOrchestrator::on_engine_update`](crate::tracker::SessionOrchestrator::on_engine_update).
    fn set_update_callback(&mut self, enabled: bool);
}
