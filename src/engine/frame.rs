//! Per-frame data produced by the tracking engine.

use nalgebra::{Matrix3x4, Matrix4};
use ndarray::{Array2, ArrayView2, ShapeBuilder};

/// Pixel layout of a camera image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Grayscale,
    Rgb565,
    Rgb888,
    Rgba8888,
    Yuv,
}

/// One camera image of a frame, borrowed from the engine for the duration of an update.
#[derive(Debug, Clone, Copy)]
pub struct Image<'a> {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes.
    pub stride: u32,
    pub pixels: &'a [u8],
}

/// Match result for one active trackable.
#[derive(Debug, Clone)]
pub struct TrackableResult {
    /// Trackable name as declared in its dataset.
    pub name: String,
    /// Row-major 3x4 pose of the target in camera space.
    pub pose: Matrix3x4<f32>,
}

impl TrackableResult {
    pub fn new(name: impl Into<String>, pose: Matrix3x4<f32>) -> Self {
        Self {
            name: name.into(),
            pose,
        }
    }

    /// Expand the pose into a 4x4 model-view matrix (column-major in memory).
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let mut view = Matrix4::identity();
        view.fixed_view_mut::<3, 4>(0, 0).copy_from(&self.pose);
        view
    }
}

/// Engine state handed to the update callback.
#[derive(Debug, Clone, Default)]
pub struct State<'a> {
    pub images: Vec<Image<'a>>,
    pub results: Vec<TrackableResult>,
}

impl<'a> State<'a> {
    pub fn new(images: Vec<Image<'a>>, results: Vec<TrackableResult>) -> Self {
        Self { images, results }
    }
}

/// Grayscale camera frame exposed to the host during a status notification.
///
/// The view borrows the engine buffer and cannot outlive the notification.
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    pixels: ArrayView2<'a, u8>,
    stride: u32,
}

impl<'a> FrameView<'a> {
    /// Wrap a grayscale image, honoring its row stride.
    ///
    /// Returns `None` when the buffer is too short for the declared geometry.
    pub fn from_image(image: &Image<'a>) -> Option<Self> {
        let (width, height, stride) = (
            image.width as usize,
            image.height as usize,
            image.stride as usize,
        );
        if stride < width {
            return None;
        }
        let pixels =
            ArrayView2::from_shape((height, width).strides((stride, 1)), image.pixels).ok()?;
        Some(Self {
            pixels,
            stride: image.stride,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.nrows() as u32
    }

    /// Row stride in bytes of the underlying buffer.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Pixel rows, indexed `[row, column]`.
    pub fn pixels(&self) -> ArrayView2<'a, u8> {
        self.pixels
    }

    /// Copy the frame out so it can be kept past the notification.
    pub fn to_owned(&self) -> Array2<u8> {
        self.pixels.to_owned()
    }
}
