//! Error type shared by the fallible constructors and `try_*` operations.

use thiserror::Error;

/// Errors reported by the crate.
///
/// Most host-facing operations deliberately degrade to a no-op or a `false`
/// return instead of surfacing these; the typed variants are what the `try_*`
/// entry points and the asset constructors return.
#[derive(Debug, Error)]
pub enum Error {
    /// The named dataset resource is not bundled with the application.
    #[error("dataset `{0}` not found")]
    DatasetNotFound(String),

    /// The tracking engine rejected an operation.
    #[error("tracking engine error: {0}")]
    Engine(String),

    /// Mesh arrays are inconsistent.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// Texture dimensions do not match the pixel buffer, or the channel count is unsupported.
    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    /// Shader compilation or program linking failed.
    #[error("{stage} shader error: {log}")]
    Shader { stage: &'static str, log: String },
}

pub type Result<T> = std::result::Result<T, Error>;
