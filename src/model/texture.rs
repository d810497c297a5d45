//! RGBA textures for static models.

use ndarray::Array3;

use crate::error::{Error, Result};
use crate::render::{GraphicsApi, TextureId};

/// The only supported channel count.
pub const RGBA_CHANNELS: u32 = 4;

const TRANSPARENT_SIZE: u32 = 64;

/// Pixel data of a static model texture.
///
/// Rows are stored bottom-up (the source buffer is flipped at construction)
/// to match the texture coordinate convention of the graphics API.
#[derive(Debug)]
pub struct Texture {
    pixels: Array3<u8>,
    gpu: Option<TextureId>,
}

impl Texture {
    /// Create a texture from top-down, tightly packed pixels.
    pub fn new(pixels: &[u8], width: u32, height: u32, channels: u32) -> Result<Self> {
        if channels != RGBA_CHANNELS {
            return Err(Error::InvalidTexture(format!(
                "{channels} channels, only RGBA is supported"
            )));
        }
        let row = width as usize * channels as usize;
        let expected = row * height as usize;
        if pixels.len() != expected {
            return Err(Error::InvalidTexture(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }

        let flipped: Vec<u8> = if row == 0 {
            Vec::new()
        } else {
            pixels.chunks_exact(row).rev().flatten().copied().collect()
        };
        let pixels = Array3::from_shape_vec(
            (height as usize, width as usize, channels as usize),
            flipped,
        )
        .map_err(|e| Error::InvalidTexture(e.to_string()))?;

        Ok(Self { pixels, gpu: None })
    }

    /// Fully transparent 64x64 RGBA texture, bound by default to new sessions.
    pub fn transparent() -> Self {
        Self {
            pixels: Array3::zeros((
                TRANSPARENT_SIZE as usize,
                TRANSPARENT_SIZE as usize,
                RGBA_CHANNELS as usize,
            )),
            gpu: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    pub fn channel_count(&self) -> u32 {
        self.pixels.dim().2 as u32
    }

    /// Stored (bottom-up) pixel buffer.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_slice().unwrap_or(&[])
    }

    /// Channel values of the stored pixel at `(x, y)`, `y` counted bottom-up.
    pub fn texel(&self, x: u32, y: u32) -> Option<&[u8]> {
        let (h, w, _) = self.pixels.dim();
        let (x, y) = (x as usize, y as usize);
        if x >= w || y >= h {
            return None;
        }
        let start = (y * w + x) * self.channel_count() as usize;
        self.pixels().get(start..start + self.channel_count() as usize)
    }

    /// GPU texture name, uploaded on first use. Render thread only.
    pub fn gpu_handle<G: GraphicsApi + ?Sized>(&mut self, gl: &mut G) -> TextureId {
        if let Some(id) = self.gpu {
            return id;
        }
        let id = gl.gen_texture();
        gl.upload_rgba(id, self.width(), self.height(), self.pixels());
        self.gpu = Some(id);
        id
    }

    /// The GPU name, if one was created.
    pub fn cached_handle(&self) -> Option<TextureId> {
        self.gpu
    }

    pub(crate) fn take_handle(&mut self) -> Option<TextureId> {
        self.gpu.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_flipped() {
        // 1x3 texture: rows 0, 1, 2 tagged by their red channel.
        let src = [0u8, 0, 0, 255, 1, 0, 0, 255, 2, 0, 0, 255];
        let tex = Texture::new(&src, 1, 3, 4).unwrap();
        assert_eq!(tex.width(), 1);
        assert_eq!(tex.height(), 3);
        assert_eq!(tex.texel(0, 0).unwrap()[0], 2);
        assert_eq!(tex.texel(0, 2).unwrap()[0], 0);
        assert_eq!(tex.pixels(), &[2, 0, 0, 255, 1, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_rejects_non_rgba() {
        let err = Texture::new(&[0u8; 12], 2, 2, 3);
        assert!(matches!(err, Err(Error::InvalidTexture(_))));
    }

    #[test]
    fn test_rejects_wrong_buffer_size() {
        let err = Texture::new(&[0u8; 15], 2, 2, 4);
        assert!(matches!(err, Err(Error::InvalidTexture(_))));
    }

    #[test]
    fn test_transparent_texture() {
        let tex = Texture::transparent();
        assert_eq!((tex.width(), tex.height(), tex.channel_count()), (64, 64, 4));
        assert_eq!(tex.pixels().len(), 64 * 64 * 4);
        assert!(tex.pixels().iter().all(|&p| p == 0));
        assert!(tex.cached_handle().is_none());
        assert!(tex.texel(64, 0).is_none());
    }
}
