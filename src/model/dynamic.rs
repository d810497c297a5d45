//! Textures refreshed every frame, e.g. video playback.

use nalgebra::Matrix4;
use tracing::debug;

use crate::render::TextureId;

/// Supplies a fresh texture each rendered frame.
///
/// `produce` runs on the render thread once per frame and must return
/// promptly. `stop` is called exactly once, when the source is unbound from
/// the session or tracking stops; `produce` is never called afterwards.
///
/// `produce` runs with the session locked and must not call back into the
/// [`SessionOrchestrator`](crate::tracker::SessionOrchestrator). `stop` and
/// `Drop` run outside that lock and may.
///
/// # Example
///
/// ```ignore
/// struct VideoTexture { player: Player, texture: TextureId }
///
/// impl DynamicTextureSource for VideoTexture {
///     fn produce(&mut self, transform: &mut Matrix4<f32>) -> TextureId {
///         self.player.latch_frame();
///         *transform = self.player.texture_transform();
///         self.texture
///     }
///
///     fn stop(&mut self) {
///         self.player.pause();
///     }
/// }
/// ```
pub trait DynamicTextureSource: Send {
    /// Return the texture to sample this frame.
    ///
    /// `transform` arrives as the identity. Overwrite it (column-major) to
    /// remap homogeneous texture coordinates `(s, t, 0, 1)`.
    fn produce(&mut self, transform: &mut Matrix4<f32>) -> TextureId;

    /// Tracking of the target stopped; release playback resources.
    fn stop(&mut self);
}

/// Single owner of a dynamic source that guarantees `stop` runs exactly once
/// before the source is dropped.
pub(crate) struct OwnedSource {
    source: Box<dyn DynamicTextureSource>,
    stopped: bool,
}

impl OwnedSource {
    pub(crate) fn new(source: Box<dyn DynamicTextureSource>) -> Self {
        Self {
            source,
            stopped: false,
        }
    }

    pub(crate) fn produce(&mut self, transform: &mut Matrix4<f32>) -> Option<TextureId> {
        if self.stopped {
            return None;
        }
        Some(self.source.produce(transform))
    }

    pub(crate) fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.source.stop();
            debug!("dynamic texture source stopped");
        }
    }
}

impl Drop for OwnedSource {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for OwnedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedSource")
            .field("stopped", &self.stopped)
            .finish_non_exhaustive()
    }
}
