//! Single coordination point between the engine, render and host threads.

use std::sync::atomic::{AtomicU32, Ordering};

use nalgebra::Vector3;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::engine::{State, TrackableResult, TrackingEngine};
use crate::error::Result;
use crate::model::{BoundModel, DynamicTextureSource, Mesh, Model, Texture};
use crate::render::TextureId;
use crate::tracker::catalog::{TargetCatalog, TargetDescriptor};
use crate::tracker::session::{TargetInfo, TargetSession};
use crate::tracker::state_machine::{
    EngineView, StatusObserver, TrackingStateMachine, UpdateRequester,
};

/// Configuration for tracking sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Consecutive misses tolerated right after tracking starts.
    pub loss_tolerance_frames: u32,
    /// Size given to the larger dimension of every loaded target.
    pub canonical_extent: f32,
    /// Initial capacity of the dataset table; doubles when full.
    pub initial_dataset_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            loss_tolerance_frames: 15,
            canonical_extent: 2.0,
            initial_dataset_capacity: 1,
        }
    }
}

#[derive(Debug, Default)]
struct SessionSlot {
    tracking: bool,
    session: Option<TargetSession>,
}

/// Owns the catalog, the tracking session and the observer slot.
///
/// Shared by reference (typically through an `Arc`) between the tracking
/// engine's update thread ([`on_engine_update`](Self::on_engine_update)), the
/// render thread ([`RenderPipeline`](crate::render::RenderPipeline)) and the
/// host control thread (everything else).
///
/// Locks are taken in the order observer, session, catalog; the session lock
/// is released before the observer is notified.
pub struct SessionOrchestrator {
    config: SessionConfig,
    observer: Mutex<Option<TrackingStateMachine>>,
    requester: Mutex<Option<UpdateRequester>>,
    session: Mutex<SessionSlot>,
    catalog: Mutex<TargetCatalog>,
    reserved_texture: AtomicU32,
    retired_textures: Mutex<Vec<TextureId>>,
}

impl SessionOrchestrator {
    pub fn new(engine: Box<dyn TrackingEngine>, config: SessionConfig) -> Self {
        let catalog = TargetCatalog::new(engine, &config);
        Self {
            config,
            observer: Mutex::new(None),
            requester: Mutex::new(None),
            session: Mutex::new(SessionSlot::default()),
            catalog: Mutex::new(catalog),
            reserved_texture: AtomicU32::new(0),
            retired_textures: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Install the status observer and enable engine update callbacks.
    ///
    /// Fails if an observer is already registered.
    pub fn register_observer(&self, observer: Box<dyn StatusObserver>) -> bool {
        let mut slot = self.observer.lock();
        if slot.is_some() {
            warn!("an observer is already registered");
            return false;
        }
        let machine = TrackingStateMachine::new(observer, self.config.loss_tolerance_frames);
        *self.requester.lock() = Some(machine.requester());
        *slot = Some(machine);
        self.catalog.lock().engine_mut().set_update_callback(true);
        debug!("observer registered");
        true
    }

    /// Detach the status observer and hand it back.
    pub fn unregister_observer(&self) -> Option<Box<dyn StatusObserver>> {
        let machine = self.observer.lock().take()?;
        *self.requester.lock() = None;
        self.catalog.lock().engine_mut().set_update_callback(false);
        debug!("observer unregistered");
        Some(machine.into_observer())
    }

    /// Ask for the next engine update to be reported. Callable from any thread.
    pub fn request_update(&self) {
        if let Some(requester) = self.requester.lock().as_ref() {
            requester.request_update();
        }
    }

    /// Entry point for the tracking engine's update thread.
    ///
    /// Returns whether the observer was notified.
    pub fn on_engine_update(&self, state: &State<'_>) -> bool {
        let mut slot = self.observer.lock();
        let Some(machine) = slot.as_mut() else {
            return false;
        };
        if !machine.is_update_requested() {
            return false;
        }

        let view = {
            let sessions = self.session.lock();
            if sessions.tracking {
                let target_found = sessions
                    .session
                    .as_ref()
                    .and_then(|s| s.find_in(&state.results))
                    .is_some();
                EngineView::Tracking { target_found }
            } else {
                EngineView::Idle
            }
        };
        machine.on_update(state, view, self)
    }

    pub fn add_dataset(&self, name: &str) -> bool {
        self.catalog.lock().add_dataset(name)
    }

    pub fn try_add_dataset(&self, name: &str) -> Result<()> {
        self.catalog.lock().try_add_dataset(name)
    }

    /// Whether `dataset` is loaded and contains `target`.
    pub fn has_target(&self, target: &str, dataset: &str) -> bool {
        self.catalog.lock().exists(target, dataset)
    }

    /// Names of the loaded datasets, in load order.
    pub fn dataset_names(&self) -> Vec<String> {
        self.catalog
            .lock()
            .dataset_names()
            .map(str::to_string)
            .collect()
    }

    /// Targets of a loaded dataset, normalized to the canonical extent.
    pub fn targets(&self, dataset: &str) -> Option<Vec<TargetDescriptor>> {
        self.catalog.lock().targets(dataset).map(<[_]>::to_vec)
    }

    /// The dataset currently bound into the engine.
    pub fn active_dataset(&self) -> Option<String> {
        self.catalog
            .lock()
            .active_dataset()
            .map(|d| d.name().to_string())
    }

    /// Start tracking `target` from `dataset`.
    ///
    /// Calling this while already tracking, for an unknown target, or when
    /// the engine refuses the dataset leaves the orchestrator stopped, as if
    /// [`stop_tracking`](Self::stop_tracking) had been called.
    pub fn start_tracking(&self, target: &str, dims: [u32; 2], dataset: &str) {
        let mut slot = self.session.lock();
        if slot.tracking {
            warn!(target = %target, "start requested while tracking; stopping instead");
            drop(slot);
            self.stop_tracking();
            return;
        }
        let mut catalog = self.catalog.lock();
        if !catalog.exists(target, dataset) {
            warn!(target = %target, dataset = %dataset, "unknown target");
            drop(catalog);
            drop(slot);
            self.stop_tracking();
            return;
        }
        if !catalog.activate(dataset) {
            drop(catalog);
            drop(slot);
            self.stop_tracking();
            return;
        }

        let descriptor = TargetDescriptor::new(target, dims[0] as f32, dims[1] as f32);
        let stale = slot.session.replace(TargetSession::new(descriptor));
        slot.tracking = true;
        drop(catalog);
        drop(slot);
        if let Some(stale) = stale {
            self.retire(stale.into_model());
        }
        info!(target = %target, dataset = %dataset, "tracking started");
    }

    /// Leave tracking mode. Idempotent.
    ///
    /// A dynamic source is stopped before the session is released, and the
    /// dataset is deactivated last. The source is stopped after the session
    /// lock is released, so it may query the orchestrator.
    pub fn stop_tracking(&self) {
        let (was_tracking, session) = {
            let mut slot = self.session.lock();
            (
                std::mem::replace(&mut slot.tracking, false),
                slot.session.take(),
            )
        };
        if let Some(mut session) = session {
            session.stop_dynamic_source();
            self.retire(session.into_model());
        }
        self.catalog.lock().deactivate();
        if was_tracking {
            info!("tracking stopped");
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.session.lock().tracking
    }

    /// Snapshot of the tracked target, if any.
    pub fn current_target(&self) -> Option<TargetInfo> {
        self.session.lock().session.as_ref().map(TargetSession::info)
    }

    /// Run `f` against the live session while holding the session lock.
    ///
    /// Used by the render thread each frame; keep `f` short and do not call
    /// back into the orchestrator from it.
    pub fn with_current_target<R>(&self, f: impl FnOnce(&mut TargetSession) -> R) -> Option<R> {
        let mut slot = self.session.lock();
        slot.session.as_mut().map(f)
    }

    /// Show a static model. Missing parts default to the unit plane and the
    /// transparent texture. Ignored when not tracking.
    pub fn set_static_model(
        &self,
        mesh: Option<Mesh>,
        texture: Option<Texture>,
        scale: Vector3<f32>,
    ) {
        self.rebind(BoundModel::from_static(mesh, texture), scale);
    }

    /// Show a plane textured by `source`.
    ///
    /// Ignored when not tracking, in which case the source is stopped and
    /// dropped right away.
    pub fn set_dynamic_model(&self, source: Box<dyn DynamicTextureSource>, scale: Vector3<f32>) {
        self.rebind(BoundModel::from_dynamic(source), scale);
    }

    /// Apply a host-built model.
    pub fn change_model(&self, model: Model) {
        match model {
            Model::Static {
                mesh,
                texture,
                scale,
            } => self.set_static_model(mesh, texture, scale),
            Model::Dynamic { source, scale } => self.set_dynamic_model(source, scale),
        }
    }

    /// Position of the tracked target among `results`.
    pub fn resolve_current_target_index(&self, results: &[TrackableResult]) -> Option<usize> {
        self.session
            .lock()
            .session
            .as_ref()
            .and_then(|s| s.find_in(results))
    }

    /// Take the texture name the renderer reserved for the next dynamic
    /// source. `None` until rendering has started.
    pub fn obtain_texture_id(&self) -> Option<TextureId> {
        match self.reserved_texture.swap(0, Ordering::AcqRel) {
            0 => None,
            id => Some(TextureId(id)),
        }
    }

    pub(crate) fn has_reserved_texture(&self) -> bool {
        self.reserved_texture.load(Ordering::Acquire) != 0
    }

    pub(crate) fn reserve_texture(&self, texture: TextureId) {
        self.reserved_texture.store(texture.0, Ordering::Release);
    }

    pub(crate) fn take_retired_textures(&self) -> Vec<TextureId> {
        std::mem::take(&mut *self.retired_textures.lock())
    }

    /// Swap the bound model. The replaced model is stopped and dropped after
    /// the session lock is released.
    fn rebind(&self, model: BoundModel, scale: Vector3<f32>) {
        let swapped = {
            let mut slot = self.session.lock();
            let tracking = slot.tracking;
            match slot.session.as_mut() {
                Some(session) if tracking => Ok(session.rebind(model, scale)),
                _ => Err(model),
            }
        };
        match swapped {
            Ok(old) => self.retire(old),
            Err(rejected) => {
                debug!("model change ignored: not tracking");
                drop(rejected);
            }
        }
    }

    /// Destroy a model, deferring deletion of its GPU texture to the render thread.
    fn retire(&self, model: BoundModel) {
        if let BoundModel::Static { mut texture, .. } = model {
            if let Some(id) = texture.take_handle() {
                self.retired_textures.lock().push(id);
            }
        }
    }
}

impl Drop for SessionOrchestrator {
    fn drop(&mut self) {
        self.stop_tracking();
        if self.observer.get_mut().take().is_some() {
            self.catalog.get_mut().engine_mut().set_update_callback(false);
        }
        let leaked = self.retired_textures.get_mut().len();
        if leaked > 0 {
            debug!(textures = leaked, "GPU textures left for the graphics context to reclaim");
        }
    }
}
