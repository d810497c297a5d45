//! Boundary with the image recognition service that picks targets to track.

use crate::engine::FrameView;

/// A target identified in a camera frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    /// Target name, shared with the tracking dataset.
    pub name: String,
    /// Target width in the recognizer's reference units.
    pub width: u32,
    pub height: u32,
}

impl Recognition {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn dims(&self) -> [u32; 2] {
        [self.width, self.height]
    }
}

/// Image recognition backend run on frames while nothing is tracked.
///
/// # Example
///
/// ```ignore
/// use artrack_rs::{FrameView, Recognition, Recognizer};
///
/// struct OfflineIndex { /* ... */ }
///
/// impl Recognizer for OfflineIndex {
///     type Error = std::io::Error;
///
///     fn recognize(&mut self, frame: &FrameView<'_>) -> Result<Option<Recognition>, Self::Error> {
///         // Match the grayscale frame against the local index
///         Ok(None)
///     }
/// }
/// ```
pub trait Recognizer: Send {
    type Error: std::fmt::Display;

    /// Look for a known target in a grayscale frame.
    fn recognize(&mut self, frame: &FrameView<'_>) -> Result<Option<Recognition>, Self::Error>;
}
