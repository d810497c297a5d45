#![allow(dead_code)]

use std::sync::Arc;

use nalgebra::{Matrix3x4, Matrix4, Vector2, Vector3};
use parking_lot::Mutex;

use artrack_rs::engine::{DatasetHandle, LoadedDataset, TrackingEngine};
use artrack_rs::tracker::TargetDescriptor;
use artrack_rs::{
    DynamicTextureSource, Error, Image, PixelFormat, Result, SessionConfig, SessionOrchestrator,
    StatusObserver, StatusUpdate, TextureId, TrackableResult, TrackingStatus,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine bundling a "cards" dataset (Ace 300x200, King 200x300).
pub struct MockEngine {
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Answer `false` to every dataset activation.
    pub refuse_activation: bool,
}

impl TrackingEngine for MockEngine {
    fn dataset_exists(&self, resource: &str) -> bool {
        resource == "cards"
    }

    fn load_dataset(&mut self, resource: &str) -> Result<LoadedDataset> {
        if resource != "cards" {
            return Err(Error::DatasetNotFound(resource.to_string()));
        }
        self.calls.lock().push(format!("load {resource}"));
        Ok(LoadedDataset {
            handle: DatasetHandle(7),
            targets: vec![
                TargetDescriptor::new("Ace", 300.0, 200.0),
                TargetDescriptor::new("King", 200.0, 300.0),
            ],
        })
    }

    fn resize_target(&mut self, _: DatasetHandle, _: &str, _: Vector2<f32>) {}

    fn activate_dataset(&mut self, _: DatasetHandle) -> bool {
        self.calls.lock().push("activate".into());
        !self.refuse_activation
    }

    fn deactivate_dataset(&mut self, _: DatasetHandle) {
        self.calls.lock().push("deactivate".into());
    }

    fn destroy_dataset(&mut self, _: DatasetHandle) {
        self.calls.lock().push("destroy".into());
    }

    fn start(&mut self) {
        self.calls.lock().push("start".into());
    }

    fn stop(&mut self) {
        self.calls.lock().push("stop".into());
    }

    fn set_update_callback(&mut self, enabled: bool) {
        self.calls.lock().push(format!("callback {enabled}"));
    }
}

/// Orchestrator over a [`MockEngine`] with "cards" already loaded.
pub fn orchestrator() -> (Arc<SessionOrchestrator>, Arc<Mutex<Vec<String>>>) {
    orchestrator_with(false)
}

pub fn orchestrator_with(
    refuse_activation: bool,
) -> (Arc<SessionOrchestrator>, Arc<Mutex<Vec<String>>>) {
    init_tracing();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let engine = MockEngine {
        calls: calls.clone(),
        refuse_activation,
    };
    let orchestrator = SessionOrchestrator::new(Box::new(engine), SessionConfig::default());
    assert!(orchestrator.add_dataset("cards"));
    (Arc::new(orchestrator), calls)
}

/// Observer recording every status it sees and always asking for more.
pub struct Recorder {
    pub seen: Arc<Mutex<Vec<TrackingStatus>>>,
    /// Stop tracking from inside the callback once the target is lost.
    pub stop_on_loss: bool,
}

impl StatusObserver for Recorder {
    fn on_status_update(&mut self, update: &StatusUpdate<'_>) {
        self.seen.lock().push(update.status());
        if self.stop_on_loss && update.is_target_lost() {
            update.orchestrator().stop_tracking();
        }
        update.request_update();
    }
}

pub fn recorder(stop_on_loss: bool) -> (Box<Recorder>, Arc<Mutex<Vec<TrackingStatus>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Recorder {
        seen: seen.clone(),
        stop_on_loss,
    };
    (Box::new(recorder), seen)
}

/// Dynamic source logging its lifecycle.
pub struct LoggingSource {
    pub texture: TextureId,
    pub transform: Matrix4<f32>,
    pub events: Arc<Mutex<Vec<&'static str>>>,
}

impl LoggingSource {
    pub fn new(texture: u32) -> (Box<Self>, Arc<Mutex<Vec<&'static str>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let source = LoggingSource {
            texture: TextureId(texture),
            transform: Matrix4::identity(),
            events: events.clone(),
        };
        (Box::new(source), events)
    }
}

impl DynamicTextureSource for LoggingSource {
    fn produce(&mut self, transform: &mut Matrix4<f32>) -> TextureId {
        self.events.lock().push("produce");
        *transform = self.transform;
        self.texture
    }

    fn stop(&mut self) {
        self.events.lock().push("stop");
    }
}

impl Drop for LoggingSource {
    fn drop(&mut self) {
        self.events.lock().push("drop");
    }
}

pub fn seen_at(name: &str, translation: Vector3<f32>) -> TrackableResult {
    let mut pose = Matrix3x4::identity();
    pose.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
    TrackableResult::new(name, pose)
}

pub fn gray_image(pixels: &[u8], width: u32, height: u32) -> Image<'_> {
    Image {
        format: PixelFormat::Grayscale,
        width,
        height,
        stride: width,
        pixels,
    }
}
