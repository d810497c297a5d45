//! Model variants: what the host asks to display, and what a session owns.

use nalgebra::Vector3;

use super::dynamic::{DynamicTextureSource, OwnedSource};
use super::mesh::Mesh;
use super::texture::Texture;

/// Which rendering configuration a bound model needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Mesh with a fixed 2D texture.
    Static,
    /// Unit plane with a per-frame texture.
    Dynamic,
}

/// A model the host wants displayed on the tracked target.
///
/// Ownership of the assets moves into the session when applied.
pub enum Model {
    /// A textured mesh. Omitted parts default to the unit plane and the
    /// transparent texture.
    Static {
        mesh: Option<Mesh>,
        texture: Option<Texture>,
        scale: Vector3<f32>,
    },
    /// A plane whose texture is produced every frame.
    Dynamic {
        source: Box<dyn DynamicTextureSource>,
        scale: Vector3<f32>,
    },
}

impl Model {
    pub fn textured_mesh(mesh: Mesh, texture: Texture, scale: Vector3<f32>) -> Self {
        Model::Static {
            mesh: Some(mesh),
            texture: Some(texture),
            scale,
        }
    }

    /// A 2x2 plane carrying `texture`.
    pub fn textured_plane(texture: Texture, scale: Vector3<f32>) -> Self {
        Model::Static {
            mesh: None,
            texture: Some(texture),
            scale,
        }
    }

    pub fn dynamic(source: Box<dyn DynamicTextureSource>, scale: Vector3<f32>) -> Self {
        Model::Dynamic { source, scale }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::Static { .. } => ModelKind::Static,
            Model::Dynamic { .. } => ModelKind::Dynamic,
        }
    }

    pub fn scale(&self) -> Vector3<f32> {
        match self {
            Model::Static { scale, .. } | Model::Dynamic { scale, .. } => *scale,
        }
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::Static {
                mesh,
                texture,
                scale,
            } => f
                .debug_struct("Static")
                .field("mesh", mesh)
                .field("texture", texture)
                .field("scale", scale)
                .finish(),
            Model::Dynamic { scale, .. } => f
                .debug_struct("Dynamic")
                .field("scale", scale)
                .finish_non_exhaustive(),
        }
    }
}

/// The model owned by a target session. Exactly one variant is live.
#[derive(Debug)]
pub(crate) enum BoundModel {
    Static { mesh: Mesh, texture: Texture },
    Dynamic { mesh: Mesh, source: OwnedSource },
}

impl BoundModel {
    /// Unit plane with the transparent texture.
    pub(crate) fn placeholder() -> Self {
        BoundModel::Static {
            mesh: Mesh::unit_plane(),
            texture: Texture::transparent(),
        }
    }

    pub(crate) fn from_static(mesh: Option<Mesh>, texture: Option<Texture>) -> Self {
        BoundModel::Static {
            mesh: mesh.unwrap_or_else(Mesh::unit_plane),
            texture: texture.unwrap_or_else(Texture::transparent),
        }
    }

    pub(crate) fn from_dynamic(source: Box<dyn DynamicTextureSource>) -> Self {
        BoundModel::Dynamic {
            mesh: Mesh::unit_plane(),
            source: OwnedSource::new(source),
        }
    }

    pub(crate) fn kind(&self) -> ModelKind {
        match self {
            BoundModel::Static { .. } => ModelKind::Static,
            BoundModel::Dynamic { .. } => ModelKind::Dynamic,
        }
    }

    pub(crate) fn mesh(&self) -> &Mesh {
        match self {
            BoundModel::Static { mesh, .. } | BoundModel::Dynamic { mesh, .. } => mesh,
        }
    }
}
