//! Host session driver: recognition while idle, tracking with a debounced exit.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::recognizer::{Recognition, Recognizer};
use crate::model::Model;
use crate::tracker::{SessionOrchestrator, StatusObserver, StatusUpdate, TargetInfo};

/// Configuration for [`ArDriver`].
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// How long a lost target may stay unseen before tracking stops.
    pub untrack_delay: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            untrack_delay: Duration::from_millis(500),
        }
    }
}

/// Application callbacks of the driver.
pub trait SessionListener: Send {
    /// A target was recognized; return the dataset to track it with, or
    /// `None` to ignore it.
    fn on_recognized(&mut self, recognition: &Recognition) -> Option<String>;

    /// Build the model to show on a newly tracked target.
    fn build_model(&mut self, target: &TargetInfo) -> Option<Model>;
}

#[derive(Default)]
struct Shared {
    paused: AtomicBool,
    rebuild: AtomicBool,
    pending: Mutex<Option<Model>>,
}

/// Status observer chaining recognition and tracking.
///
/// While nothing is tracked every frame goes to the recognizer; a match the
/// listener accepts starts tracking. While tracking, the listener's model is
/// bound on the first update and tracking ends once the target has been
/// lost for longer than [`DriverConfig::untrack_delay`].
pub struct ArDriver<R: Recognizer, L: SessionListener> {
    recognizer: R,
    listener: L,
    config: DriverConfig,
    shared: Arc<Shared>,
    last_found: Option<Instant>,
}

impl<R: Recognizer, L: SessionListener> ArDriver<R, L> {
    pub fn new(recognizer: R, listener: L, config: DriverConfig) -> Self {
        Self {
            recognizer,
            listener,
            config,
            shared: Arc::new(Shared::default()),
            last_found: None,
        }
    }

    /// A handle controlling this driver from other threads.
    pub fn handle(&self, orchestrator: Arc<SessionOrchestrator>) -> DriverHandle {
        DriverHandle {
            shared: self.shared.clone(),
            orchestrator,
        }
    }

    fn on_tracking(&mut self, update: &StatusUpdate<'_>) {
        let orchestrator = update.orchestrator();
        if !update.is_target_lost() {
            if update.is_new_target() || self.shared.rebuild.swap(false, Ordering::AcqRel) {
                self.build_model(orchestrator);
            } else {
                let submitted = self.shared.pending.lock().take();
                if let Some(model) = submitted {
                    debug!(kind = ?model.kind(), "applying submitted model");
                    orchestrator.change_model(model);
                }
            }
            self.last_found = Some(Instant::now());
        } else if self
            .last_found
            .is_none_or(|seen| seen.elapsed() > self.config.untrack_delay)
        {
            info!("target lost; leaving tracking mode");
            orchestrator.stop_tracking();
            self.last_found = None;
        }
        update.request_update();
    }

    fn on_idle(&mut self, update: &StatusUpdate<'_>) {
        if let Some(frame) = update.fetch_frame() {
            match self.recognizer.recognize(&frame) {
                Ok(Some(recognition)) => self.on_recognized(update.orchestrator(), &recognition),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "recognition failed"),
            }
        }
        update.request_update();
    }

    fn on_recognized(&mut self, orchestrator: &SessionOrchestrator, recognition: &Recognition) {
        let Some(dataset) = self.listener.on_recognized(recognition) else {
            debug!(target = %recognition.name, "recognition ignored by listener");
            return;
        };
        orchestrator.start_tracking(&recognition.name, recognition.dims(), &dataset);
    }

    fn build_model(&mut self, orchestrator: &SessionOrchestrator) {
        let Some(target) = orchestrator.current_target() else {
            return;
        };
        // A fresh build supersedes whatever was submitted for the previous target.
        self.shared.pending.lock().take();
        match self.listener.build_model(&target) {
            Some(model) => orchestrator.change_model(model),
            None => debug!(target = %target.name, "no model for target"),
        }
    }
}

impl<R: Recognizer, L: SessionListener> StatusObserver for ArDriver<R, L> {
    fn on_status_update(&mut self, update: &StatusUpdate<'_>) {
        if self.shared.paused.load(Ordering::Acquire) {
            return;
        }
        if update.is_tracking() {
            self.on_tracking(update);
        } else {
            self.on_idle(update);
        }
    }
}

/// Any-thread control of a registered [`ArDriver`].
#[derive(Clone)]
pub struct DriverHandle {
    shared: Arc<Shared>,
    orchestrator: Arc<SessionOrchestrator>,
}

impl DriverHandle {
    /// Stop processing updates. The camera image keeps rendering.
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        if self.shared.paused.swap(false, Ordering::AcqRel) {
            self.orchestrator.request_update();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::Acquire)
    }

    /// Queue a model to replace the displayed one on the next update where
    /// the target is visible.
    pub fn submit_model(&self, model: Model) {
        *self.shared.pending.lock() = Some(model);
    }

    /// Ask the listener to build the model of the current target again.
    pub fn rebuild_model(&self) {
        self.shared.rebuild.store(true, Ordering::Release);
    }

    pub fn orchestrator(&self) -> &Arc<SessionOrchestrator> {
        &self.orchestrator
    }
}

impl std::fmt::Debug for DriverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverHandle")
            .field("paused", &self.is_paused())
            .finish_non_exhaustive()
    }
}
