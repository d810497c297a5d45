//! Graphics API seam used by the render pipeline.
//!
//! The shape follows OpenGL ES 2: the host implements it over its GL binding
//! on the render thread. Everything here must only be called from that thread.

use nalgebra::Matrix4;

/// A texture name allocated by the graphics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// A linked shader program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// A compiled shader object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Texture binding point used when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerTarget {
    /// `GL_TEXTURE_2D`
    Texture2D,
    /// `GL_TEXTURE_EXTERNAL_OES`, used for streaming sources such as video decoders.
    #[default]
    External,
}

/// Fixed-function state toggled around the overlay draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    DepthTest,
    CullFace,
    Blend,
}

/// Minimal GL-ES-shaped interface.
pub trait GraphicsApi {
    fn set_clear_color(&mut self, rgba: [f32; 4]);

    /// Clear color and depth buffers.
    fn clear(&mut self);

    fn gen_texture(&mut self) -> TextureId;

    fn delete_texture(&mut self, texture: TextureId);

    /// Upload tightly packed RGBA8 pixels to `texture` as a 2D texture.
    fn upload_rgba(&mut self, texture: TextureId, width: u32, height: u32, pixels: &[u8]);

    /// Compile a shader; the error carries the info log.
    fn compile_shader(
        &mut self,
        stage: ShaderStage,
        source: &str,
    ) -> std::result::Result<ShaderId, String>;

    fn delete_shader(&mut self, shader: ShaderId);

    /// Link a program; the error carries the info log.
    fn link_program(
        &mut self,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> std::result::Result<ProgramId, String>;

    fn delete_program(&mut self, program: ProgramId);

    fn attrib_location(&mut self, program: ProgramId, name: &str) -> Option<u32>;

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<i32>;

    fn use_program(&mut self, program: ProgramId);

    /// Bind `texture` to unit 0 at `target` with linear filtering and edge clamping.
    fn bind_texture(&mut self, target: SamplerTarget, texture: TextureId);

    /// Upload a column-major 4x4 matrix.
    fn uniform_matrix4(&mut self, location: i32, matrix: &Matrix4<f32>);

    fn uniform_sampler(&mut self, location: i32, unit: i32);

    /// Point an attribute at client-side float data and enable it.
    fn vertex_attrib(&mut self, location: u32, components: usize, data: &[f32]);

    fn disable_vertex_attrib(&mut self, location: u32);

    fn set_capability(&mut self, capability: Capability, enabled: bool);

    /// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA`.
    fn set_alpha_blend_func(&mut self);

    /// Draw indexed `TRIANGLES` with 16-bit indices.
    fn draw_triangles(&mut self, indices: &[u16]);
}
