//! Per-frame draw dispatch of the tracked target's model.

use nalgebra::Matrix4;
use tracing::{debug, error, trace};

use crate::error::{Error, Result};
use crate::model::ModelKind;
use crate::render::background::{VideoBackground, Viewport, video_background_config};
use crate::render::graphics::{Capability, GraphicsApi, ProgramId, SamplerTarget, ShaderId, ShaderStage};
use crate::render::matrix::scale_pose_matrix;
use crate::render::shaders::{self, ShaderSources};
use crate::tracker::SessionOrchestrator;
use crate::tracker::session::DrawInputs;

/// Configuration for [`RenderPipeline`].
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub near_plane: f32,
    pub far_plane: f32,
    /// Use a transparent clear when the surface is composited over other views.
    pub clear_color: [f32; 4],
    /// Binding point of dynamic textures. `Texture2D` reuses the static program.
    pub dynamic_sampler: SamplerTarget,
    pub shaders: ShaderSources,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            near_plane: 0.04,
            far_plane: 50.0,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            dynamic_sampler: SamplerTarget::External,
            shaders: ShaderSources::default(),
        }
    }
}

/// A linked program with its resolved attribute and uniform locations.
///
/// Names the compiler optimized out resolve to `None` and are skipped.
#[derive(Debug, Clone, Copy)]
struct OverlayProgram {
    id: ProgramId,
    position: Option<u32>,
    normal: Option<u32>,
    tex_coord: Option<u32>,
    mvp: Option<i32>,
    tex_transform: Option<i32>,
    sampler: Option<i32>,
}

impl OverlayProgram {
    fn build<G: GraphicsApi + ?Sized>(
        gl: &mut G,
        vertex: &str,
        fragment: &str,
        sampler: &str,
    ) -> Result<Self> {
        let vs = compile(gl, ShaderStage::Vertex, vertex)?;
        let fs = match compile(gl, ShaderStage::Fragment, fragment) {
            Ok(fs) => fs,
            Err(e) => {
                gl.delete_shader(vs);
                return Err(e);
            }
        };
        let linked = gl.link_program(vs, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        let id = linked.map_err(|log| {
            error!(%log, "program link failed");
            Error::Shader { stage: "link", log }
        })?;

        Ok(Self {
            id,
            position: gl.attrib_location(id, shaders::ATTR_POSITION),
            normal: gl.attrib_location(id, shaders::ATTR_NORMAL),
            tex_coord: gl.attrib_location(id, shaders::ATTR_TEX_COORD),
            mvp: gl.uniform_location(id, shaders::UNIFORM_MVP),
            tex_transform: gl.uniform_location(id, shaders::UNIFORM_TEX_TRANSFORM),
            sampler: gl.uniform_location(id, sampler),
        })
    }

    fn draw<G: GraphicsApi + ?Sized>(
        &self,
        gl: &mut G,
        target: SamplerTarget,
        inputs: &DrawInputs<'_>,
        mvp: &Matrix4<f32>,
    ) {
        let mesh = inputs.mesh;
        let attribs = [
            (self.position, 3, mesh.positions()),
            (self.normal, 3, mesh.normals()),
            (self.tex_coord, 2, mesh.tex_coords()),
        ];

        gl.use_program(self.id);
        for (location, components, data) in attribs {
            if let Some(location) = location {
                gl.vertex_attrib(location, components, data);
            }
        }
        gl.bind_texture(target, inputs.texture);
        if let Some(location) = self.mvp {
            gl.uniform_matrix4(location, mvp);
        }
        if let Some(location) = self.tex_transform {
            gl.uniform_matrix4(location, &inputs.tex_transform);
        }
        if let Some(location) = self.sampler {
            gl.uniform_sampler(location, 0);
        }

        gl.set_capability(Capability::DepthTest, true);
        gl.set_capability(Capability::CullFace, true);
        gl.set_capability(Capability::Blend, true);
        gl.set_alpha_blend_func();
        gl.draw_triangles(mesh.indices());

        for (location, _, _) in attribs {
            if let Some(location) = location {
                gl.disable_vertex_attrib(location);
            }
        }
        gl.set_capability(Capability::DepthTest, false);
        gl.set_capability(Capability::CullFace, false);
        gl.set_capability(Capability::Blend, false);
    }
}

fn compile<G: GraphicsApi + ?Sized>(gl: &mut G, stage: ShaderStage, source: &str) -> Result<ShaderId> {
    gl.compile_shader(stage, source).map_err(|log| {
        error!(stage = stage.as_str(), %log, "shader compilation failed");
        Error::Shader {
            stage: stage.as_str(),
            log,
        }
    })
}

/// Draws the camera image and the tracked target's model.
///
/// Lives on the render thread, which is the only thread allowed to touch
/// `G`. The orchestrator is borrowed once per frame.
pub struct RenderPipeline<G: GraphicsApi, V: VideoBackground> {
    gl: G,
    background: V,
    config: RenderConfig,
    static_program: OverlayProgram,
    dynamic_program: Option<OverlayProgram>,
    projection: Matrix4<f32>,
    viewport: Option<Viewport>,
}

impl<G: GraphicsApi, V: VideoBackground> RenderPipeline<G, V> {
    /// Build the overlay programs. Must run on the render thread with a
    /// current context.
    pub fn new(mut gl: G, background: V, config: RenderConfig) -> Result<Self> {
        gl.set_clear_color(config.clear_color);

        let sources = &config.shaders;
        let static_program = OverlayProgram::build(
            &mut gl,
            &sources.vertex,
            &sources.fragment,
            shaders::UNIFORM_SAMPLER_2D,
        )?;
        let dynamic_program = match config.dynamic_sampler {
            SamplerTarget::Texture2D => None,
            SamplerTarget::External => {
                let built = OverlayProgram::build(
                    &mut gl,
                    &sources.vertex,
                    &sources.external_fragment,
                    shaders::UNIFORM_SAMPLER_EXTERNAL,
                );
                match built {
                    Ok(program) => Some(program),
                    Err(e) => {
                        gl.delete_program(static_program.id);
                        return Err(e);
                    }
                }
            }
        };

        let projection = background.projection_matrix(config.near_plane, config.far_plane);
        debug!(dynamic_sampler = ?config.dynamic_sampler, "render pipeline ready");
        Ok(Self {
            gl,
            background,
            config,
            static_program,
            dynamic_program,
            projection,
            viewport: None,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn projection(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn graphics(&self) -> &G {
        &self.gl
    }

    pub fn background(&self) -> &V {
        &self.background
    }

    /// Recompute projection and video background layout when the surface
    /// size or orientation changed. Returns whether anything was updated.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if self.viewport == Some(viewport) {
            return false;
        }
        self.projection = self
            .background
            .projection_matrix(self.config.near_plane, self.config.far_plane);
        let layout = video_background_config(viewport, self.background.video_mode());
        self.background.set_video_background_config(&layout);
        self.viewport = Some(viewport);
        debug!(
            width = viewport.width,
            height = viewport.height,
            portrait = viewport.portrait,
            "viewport updated"
        );
        true
    }

    /// Render one frame. Returns whether the model overlay was drawn.
    pub fn render_frame(&mut self, orchestrator: &SessionOrchestrator) -> bool {
        for texture in orchestrator.take_retired_textures() {
            self.gl.delete_texture(texture);
        }
        self.gl.clear();
        if !orchestrator.has_reserved_texture() {
            let texture = self.gl.gen_texture();
            orchestrator.reserve_texture(texture);
        }

        let results = self.background.begin();
        self.background.draw_video_background();

        let gl = &mut self.gl;
        let projection = &self.projection;
        let static_program = &self.static_program;
        let dynamic_program = self.dynamic_program.as_ref().unwrap_or(static_program);
        let dynamic_sampler = self.config.dynamic_sampler;
        let drawn = orchestrator
            .with_current_target(|session| {
                let index = session.find_in(&results)?;
                let inputs = session.draw_inputs(gl)?;
                let view = scale_pose_matrix(&results[index].view_matrix(), inputs.scale);
                let mvp = projection * view;
                let (program, target) = match inputs.kind {
                    ModelKind::Static => (static_program, SamplerTarget::Texture2D),
                    ModelKind::Dynamic => (dynamic_program, dynamic_sampler),
                };
                program.draw(gl, target, &inputs, &mvp);
                trace!(target = %results[index].name, "overlay drawn");
                Some(())
            })
            .flatten()
            .is_some();

        self.background.end();
        drawn
    }

    /// Release the GPU objects owned by the pipeline and the orchestrator's
    /// pending textures, then hand back the graphics and background.
    pub fn shutdown(mut self, orchestrator: &SessionOrchestrator) -> (G, V) {
        for texture in orchestrator.take_retired_textures() {
            self.gl.delete_texture(texture);
        }
        if let Some(texture) = orchestrator.obtain_texture_id() {
            self.gl.delete_texture(texture);
        }
        if let Some(program) = self.dynamic_program.take() {
            self.gl.delete_program(program.id);
        }
        self.gl.delete_program(self.static_program.id);
        debug!("render pipeline shut down");
        (self.gl, self.background)
    }
}

impl<G: GraphicsApi, V: VideoBackground> std::fmt::Debug for RenderPipeline<G, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPipeline")
            .field("config", &self.config)
            .field("static_program", &self.static_program)
            .field("dynamic_program", &self.dynamic_program)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}
