//! Render-thread side: camera background, overlay programs and draw dispatch.

mod background;
mod graphics;
mod matrix;
mod pipeline;
mod shaders;

pub use background::{
    VideoBackground, VideoBackgroundConfig, VideoMode, Viewport, video_background_config,
};
pub use graphics::{
    Capability, GraphicsApi, ProgramId, SamplerTarget, ShaderId, ShaderStage, TextureId,
};
pub use matrix::scale_pose_matrix;
pub use pipeline::{RenderConfig, RenderPipeline};
pub use shaders::ShaderSources;
