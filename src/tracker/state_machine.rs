//! Derives tracking signals from engine updates and notifies the host.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::engine::{FrameView, Image, PixelFormat, State};
use crate::tracker::SessionOrchestrator;
use crate::tracker::track_state::{LossWindow, TrackingStatus};

/// Host callback notified once per requested update.
///
/// Runs synchronously on the tracking engine's thread and must return
/// promptly. It may drive the orchestrator (start/stop tracking, swap models)
/// through [`StatusUpdate::orchestrator`], but must not register or
/// unregister observers from inside the call.
pub trait StatusObserver: Send {
    fn on_status_update(&mut self, update: &StatusUpdate<'_>);
}

/// Any-thread handle asking for the next engine update to be reported.
///
/// Requests made before the next update collapse into one notification.
#[derive(Debug, Clone)]
pub struct UpdateRequester(Arc<AtomicBool>);

impl UpdateRequester {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn request_update(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

/// What the orchestrator reports about tracking when an update arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EngineView {
    Idle,
    Tracking { target_found: bool },
}

/// The view of one update cycle given to the observer.
///
/// The camera frame is only reachable through this value, so it cannot be
/// fetched outside the notification.
pub struct StatusUpdate<'a> {
    status: TrackingStatus,
    frame: Option<Image<'a>>,
    requester: &'a UpdateRequester,
    orchestrator: &'a SessionOrchestrator,
}

impl<'a> StatusUpdate<'a> {
    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn is_tracking(&self) -> bool {
        self.status.is_tracking
    }

    /// Tracking of a new target started with this update.
    pub fn is_new_target(&self) -> bool {
        self.status.just_started
    }

    /// The tracked target is considered lost in this update.
    pub fn is_target_lost(&self) -> bool {
        self.status.just_lost
    }

    /// The grayscale camera frame of this update, if the engine delivered one.
    pub fn fetch_frame(&self) -> Option<FrameView<'a>> {
        self.frame.as_ref().and_then(FrameView::from_image)
    }

    /// Ask for the next engine update to be reported as well.
    pub fn request_update(&self) {
        self.requester.request_update();
    }

    pub fn orchestrator(&self) -> &'a SessionOrchestrator {
        self.orchestrator
    }
}

/// Per-observer tracking state.
pub struct TrackingStateMachine {
    observer: Box<dyn StatusObserver>,
    requester: UpdateRequester,
    image_channel: Option<usize>,
    was_tracking: bool,
    status: TrackingStatus,
    loss: LossWindow,
    tolerance: u32,
}

impl TrackingStateMachine {
    /// Wrap an observer. The first engine update after construction is reported.
    pub fn new(observer: Box<dyn StatusObserver>, tolerance: u32) -> Self {
        Self {
            observer,
            requester: UpdateRequester::new(),
            image_channel: None,
            was_tracking: false,
            status: TrackingStatus::default(),
            loss: LossWindow::default(),
            tolerance,
        }
    }

    pub fn requester(&self) -> UpdateRequester {
        self.requester.clone()
    }

    pub(crate) fn is_update_requested(&self) -> bool {
        self.requester.is_requested()
    }

    /// Signals of the most recent reported update.
    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn into_observer(self) -> Box<dyn StatusObserver> {
        self.observer
    }

    /// Process one engine update. Returns whether the observer was notified.
    pub(crate) fn on_update(
        &mut self,
        state: &State<'_>,
        view: EngineView,
        orchestrator: &SessionOrchestrator,
    ) -> bool {
        if !self.requester.take() {
            trace!("engine update coalesced");
            return false;
        }

        self.status = TrackingStatus {
            is_tracking: matches!(view, EngineView::Tracking { .. }),
            ..TrackingStatus::default()
        };

        if self.image_channel.is_none() {
            self.image_channel = state
                .images
                .iter()
                .position(|img| img.format == PixelFormat::Grayscale);
        }
        let frame = self
            .image_channel
            .and_then(|i| state.images.get(i))
            .filter(|img| img.format == PixelFormat::Grayscale)
            .copied();

        match view {
            EngineView::Tracking { target_found } => {
                if !self.was_tracking {
                    self.was_tracking = true;
                    self.status.just_started = true;
                    self.loss = LossWindow::default();
                    debug!("tracking session started");
                } else if !target_found {
                    self.status.just_lost = self.loss.record_miss(self.tolerance);
                    if self.status.just_lost {
                        debug!(window = ?self.loss, "target lost");
                    }
                } else {
                    self.loss.record_hit();
                }
            }
            EngineView::Idle => {
                self.was_tracking = false;
            }
        }

        let update = StatusUpdate {
            status: self.status,
            frame,
            requester: &self.requester,
            orchestrator,
        };
        self.observer.on_status_update(&update);
        true
    }
}

impl std::fmt::Debug for TrackingStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingStateMachine")
            .field("image_channel", &self.image_channel)
            .field("was_tracking", &self.was_tracking)
            .field("status", &self.status)
            .field("loss", &self.loss)
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}
