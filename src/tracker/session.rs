//! The single target currently being tracked.

use nalgebra::{Matrix4, Vector3};

use crate::engine::TrackableResult;
use crate::model::{BoundModel, Mesh, ModelKind, Texture};
use crate::render::{GraphicsApi, TextureId};
use crate::tracker::TargetDescriptor;

/// Tracking session state: which target, at what scale, showing which model.
///
/// The session exclusively owns its bound model; rebinding destroys the
/// previous one.
#[derive(Debug)]
pub struct TargetSession {
    descriptor: TargetDescriptor,
    scale: Vector3<f32>,
    model: BoundModel,
}

/// Everything the render pipeline needs to draw the bound model this frame.
pub(crate) struct DrawInputs<'a> {
    pub mesh: &'a Mesh,
    pub texture: TextureId,
    pub tex_transform: Matrix4<f32>,
    pub kind: ModelKind,
    pub scale: Vector3<f32>,
}

/// Read-only snapshot of a session, safe to hand to any thread.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInfo {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub scale: Vector3<f32>,
    pub kind: ModelKind,
}

impl TargetSession {
    /// New session showing the transparent unit plane at unit scale.
    pub(crate) fn new(descriptor: TargetDescriptor) -> Self {
        Self {
            descriptor,
            scale: Vector3::new(1.0, 1.0, 1.0),
            model: BoundModel::placeholder(),
        }
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &TargetDescriptor {
        &self.descriptor
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    pub fn kind(&self) -> ModelKind {
        self.model.kind()
    }

    pub fn mesh(&self) -> &Mesh {
        self.model.mesh()
    }

    /// The texture of a static model.
    pub fn static_texture(&self) -> Option<&Texture> {
        match &self.model {
            BoundModel::Static { texture, .. } => Some(texture),
            BoundModel::Dynamic { .. } => None,
        }
    }

    pub fn info(&self) -> TargetInfo {
        TargetInfo {
            name: self.descriptor.name().to_string(),
            width: self.descriptor.width(),
            height: self.descriptor.height(),
            scale: self.scale,
            kind: self.kind(),
        }
    }

    /// Index of this session's target among a frame's results.
    pub fn find_in(&self, results: &[TrackableResult]) -> Option<usize> {
        results.iter().position(|r| r.name == self.descriptor.name())
    }

    /// Bind a new model and scale, handing back the previous model.
    pub(crate) fn rebind(&mut self, model: BoundModel, scale: Vector3<f32>) -> BoundModel {
        self.scale = scale;
        std::mem::replace(&mut self.model, model)
    }

    /// Stop a dynamic source so that it is never asked for another frame.
    pub(crate) fn stop_dynamic_source(&mut self) {
        if let BoundModel::Dynamic { source, .. } = &mut self.model {
            source.stop();
        }
    }

    pub(crate) fn into_model(self) -> BoundModel {
        self.model
    }

    /// Resolve texture and transform for this frame. Render thread only.
    ///
    /// Returns `None` once a dynamic source has been stopped.
    pub(crate) fn draw_inputs<G: GraphicsApi + ?Sized>(
        &mut self,
        gl: &mut G,
    ) -> Option<DrawInputs<'_>> {
        let scale = self.scale;
        let mut tex_transform = Matrix4::identity();
        match &mut self.model {
            BoundModel::Static { mesh, texture } => Some(DrawInputs {
                mesh,
                texture: texture.gpu_handle(gl),
                tex_transform,
                kind: ModelKind::Static,
                scale,
            }),
            BoundModel::Dynamic { mesh, source } => {
                let texture = source.produce(&mut tex_transform)?;
                Some(DrawInputs {
                    mesh,
                    texture,
                    tex_transform,
                    kind: ModelKind::Dynamic,
                    scale,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Matrix3x4;

    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = TargetSession::new(TargetDescriptor::new("Ace", 300.0, 200.0));
        assert_eq!(session.name(), "Ace");
        assert_eq!(session.scale(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(session.kind(), ModelKind::Static);
        assert_eq!(session.mesh(), &Mesh::unit_plane());
        let tex = session.static_texture().unwrap();
        assert_eq!((tex.width(), tex.height()), (64, 64));
    }

    #[test]
    fn test_find_scans_every_result() {
        let session = TargetSession::new(TargetDescriptor::new("Ace", 300.0, 200.0));
        let results = vec![
            TrackableResult::new("King", Matrix3x4::identity()),
            TrackableResult::new("Ace", Matrix3x4::identity()),
        ];
        assert_eq!(session.find_in(&results), Some(1));
        assert_eq!(session.find_in(&results[..1]), None);
        assert_eq!(session.find_in(&[]), None);
    }

    #[test]
    fn test_rebind_returns_previous_model() {
        let mut session = TargetSession::new(TargetDescriptor::new("Ace", 300.0, 200.0));
        let old = session.rebind(
            BoundModel::from_static(None, None),
            Vector3::new(2.0, 2.0, 1.0),
        );
        assert_eq!(old.kind(), ModelKind::Static);
        assert_eq!(session.info().scale, Vector3::new(2.0, 2.0, 1.0));
    }
}
