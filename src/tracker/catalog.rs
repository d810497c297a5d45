//! Named collections of trackable targets.

use nalgebra::Vector2;
use tracing::{debug, info, warn};

use crate::engine::{DatasetHandle, LoadedDataset, TrackingEngine};
use crate::error::{Error, Result};
use crate::tracker::SessionConfig;

/// A trackable planar target of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescriptor {
    name: String,
    size: Vector2<f32>,
}

impl TargetDescriptor {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            size: Vector2::new(width, height),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn size(&self) -> Vector2<f32> {
        self.size
    }

    /// Same target rescaled so its larger dimension equals `extent`.
    pub fn normalized(&self, extent: f32) -> Self {
        let larger = self.size.x.max(self.size.y);
        if larger <= 0.0 {
            return self.clone();
        }
        Self {
            name: self.name.clone(),
            size: self.size * (extent / larger),
        }
    }
}

/// A dataset loaded into the tracking engine.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    handle: DatasetHandle,
    targets: Vec<TargetDescriptor>,
}

impl Dataset {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> DatasetHandle {
        self.handle
    }

    pub fn targets(&self) -> &[TargetDescriptor] {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&TargetDescriptor> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// Owns the tracking engine and the datasets loaded into it.
///
/// At most one dataset is active at a time.
pub struct TargetCatalog {
    engine: Box<dyn TrackingEngine>,
    datasets: Vec<Dataset>,
    active: Option<usize>,
    running: bool,
    canonical_extent: f32,
}

impl TargetCatalog {
    pub fn new(engine: Box<dyn TrackingEngine>, config: &SessionConfig) -> Self {
        Self {
            engine,
            datasets: Vec::with_capacity(config.initial_dataset_capacity.max(1)),
            active: None,
            running: false,
            canonical_extent: config.canonical_extent,
        }
    }

    /// Load a bundled dataset. Loading a name twice is a no-op.
    pub fn try_add_dataset(&mut self, name: &str) -> Result<()> {
        if self.find(name).is_some() {
            debug!(dataset = %name, "dataset already loaded");
            return Ok(());
        }
        if !self.engine.dataset_exists(name) {
            return Err(Error::DatasetNotFound(name.to_string()));
        }

        let LoadedDataset { handle, targets } = self.engine.load_dataset(name)?;
        let targets: Vec<TargetDescriptor> = targets
            .iter()
            .map(|t| t.normalized(self.canonical_extent))
            .collect();
        for target in &targets {
            self.engine.resize_target(handle, target.name(), target.size());
        }

        if self.datasets.len() == self.datasets.capacity() {
            let grow = self.datasets.capacity().max(1);
            self.datasets.reserve_exact(grow);
        }
        info!(dataset = %name, targets = targets.len(), "dataset loaded");
        self.datasets.push(Dataset {
            name: name.to_string(),
            handle,
            targets,
        });
        Ok(())
    }

    /// Load a bundled dataset, reporting failure as `false`.
    pub fn add_dataset(&mut self, name: &str) -> bool {
        match self.try_add_dataset(name) {
            Ok(()) => true,
            Err(e) => {
                warn!(dataset = %name, error = %e, "could not add dataset");
                false
            }
        }
    }

    /// Whether `dataset` was added and declares a target called `target`.
    pub fn exists(&self, target: &str, dataset: &str) -> bool {
        self.dataset(dataset)
            .is_some_and(|d| d.target(target).is_some())
    }

    /// Make `dataset` the active one and start the engine.
    ///
    /// Returns `false` for unknown names (nothing changes) and when the engine
    /// refuses the dataset (nothing is left active).
    pub fn activate(&mut self, dataset: &str) -> bool {
        let Some(idx) = self.find(dataset) else {
            debug!(dataset = %dataset, "activate ignored: unknown dataset");
            return false;
        };
        if let Some(current) = self.active.take() {
            self.engine.deactivate_dataset(self.datasets[current].handle);
        }
        if !self.engine.activate_dataset(self.datasets[idx].handle) {
            warn!(dataset = %dataset, "engine refused to activate dataset");
            if std::mem::take(&mut self.running) {
                self.engine.stop();
            }
            return false;
        }
        self.active = Some(idx);
        self.engine.start();
        self.running = true;
        debug!(dataset = %dataset, "dataset active");
        true
    }

    /// Stop the engine if it runs and deactivate the active dataset, if any.
    pub fn deactivate(&mut self) {
        if std::mem::take(&mut self.running) {
            self.engine.stop();
        }
        if let Some(current) = self.active.take() {
            self.engine.deactivate_dataset(self.datasets[current].handle);
            debug!(dataset = %self.datasets[current].name, "dataset deactivated");
        }
    }

    pub fn active_dataset(&self) -> Option<&Dataset> {
        self.active.map(|i| &self.datasets[i])
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.find(name).map(|i| &self.datasets[i])
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Names of the loaded datasets, in load order.
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|d| d.name())
    }

    /// Targets of a loaded dataset.
    pub fn targets(&self, dataset: &str) -> Option<&[TargetDescriptor]> {
        self.dataset(dataset).map(Dataset::targets)
    }

    pub(crate) fn engine_mut(&mut self) -> &mut dyn TrackingEngine {
        self.engine.as_mut()
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.datasets.iter().position(|d| d.name == name)
    }
}

impl Drop for TargetCatalog {
    fn drop(&mut self) {
        self.deactivate();
        for dataset in self.datasets.drain(..) {
            self.engine.destroy_dataset(dataset.handle);
        }
    }
}
