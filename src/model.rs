//! Displayable assets: meshes, textures and per-frame texture sources.

mod bound;
mod dynamic;
mod mesh;
mod scale;
mod texture;

pub(crate) use bound::BoundModel;
pub use bound::{Model, ModelKind};
pub use dynamic::DynamicTextureSource;
pub use mesh::Mesh;
pub use scale::scale_fit_ratio;
pub use texture::{RGBA_CHANNELS, Texture};
