//! Camera video background: the engine's render section and its layout.

use nalgebra::{Matrix4, Vector2};

use crate::engine::TrackableResult;

/// Camera capture resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoMode {
    pub width: u32,
    pub height: u32,
}

/// Size and orientation of the GL surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub portrait: bool,
}

/// Placement of the camera image behind the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoBackgroundConfig {
    pub enabled: bool,
    pub synchronous: bool,
    pub position: Vector2<i32>,
    pub size: Vector2<i32>,
}

/// The engine's renderer, which owns the camera image.
pub trait VideoBackground {
    /// Open a render section, returning the results tracked for this frame.
    fn begin(&mut self) -> Vec<TrackableResult>;

    fn draw_video_background(&mut self);

    /// Close the render section opened by [`begin`](Self::begin).
    fn end(&mut self);

    fn video_mode(&self) -> VideoMode;

    /// Projection derived from the camera calibration.
    fn projection_matrix(&self, near: f32, far: f32) -> Matrix4<f32>;

    fn set_video_background_config(&mut self, config: &VideoBackgroundConfig);
}

/// Fit the camera image to the viewport, covering it while keeping the
/// capture aspect ratio.
///
/// The capture is always landscape, so in portrait the image is laid out
/// rotated: its height runs along the viewport width.
pub fn video_background_config(viewport: Viewport, mode: VideoMode) -> VideoBackgroundConfig {
    let (vw, vh) = (viewport.width as f32, viewport.height as f32);
    let (mw, mh) = (mode.width as f32, mode.height as f32);

    let (mut w, mut h) = if viewport.portrait {
        (vh * (mh / mw), vh)
    } else {
        (vw, vw * (mh / mw))
    };
    if viewport.portrait && w < vw {
        w = vw;
        h = vw * (mw / mh);
    } else if !viewport.portrait && h < vh {
        w = vh * (mw / mh);
        h = vh;
    }

    VideoBackgroundConfig {
        enabled: true,
        synchronous: true,
        position: Vector2::zeros(),
        size: Vector2::new(w as i32, h as i32),
    }
}
