mod common;

use std::sync::Arc;

use nalgebra::{Matrix4, Vector3};
use parking_lot::Mutex;

use artrack_rs::render::{
    Capability, GraphicsApi, ProgramId, SamplerTarget, ShaderId, ShaderStage,
    VideoBackgroundConfig, VideoMode,
};
use artrack_rs::{
    Error, RenderConfig, RenderPipeline, Texture, TextureId, TrackableResult, VideoBackground,
    Viewport,
};
use common::{LoggingSource, orchestrator, seen_at};

const MVP: i32 = 10;
const TEX_TRANSFORM: i32 = 11;
const SAMPLER: i32 = 12;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear,
    GenTexture(u32),
    DeleteTexture(u32),
    Upload(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    BindTexture(SamplerTarget, u32),
    Matrix(i32, Matrix4<f32>),
    Sampler(i32, i32),
    Attrib(u32, usize, usize),
    DisableAttrib(u32),
    Capability(Capability, bool),
    BlendFunc,
    Draw(usize),
}

#[derive(Default)]
struct RecordingGl {
    next_id: u32,
    fail_on: Option<&'static str>,
    programs: Vec<(ProgramId, ShaderId, ShaderId)>,
    calls: Vec<Call>,
}

impl RecordingGl {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn draws(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Draw(_))).count()
    }

    fn position(&self, call: &Call) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }
}

impl GraphicsApi for RecordingGl {
    fn set_clear_color(&mut self, _rgba: [f32; 4]) {}

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
    }

    fn gen_texture(&mut self) -> TextureId {
        let id = self.next();
        self.calls.push(Call::GenTexture(id));
        TextureId(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.calls.push(Call::DeleteTexture(texture.0));
    }

    fn upload_rgba(&mut self, texture: TextureId, width: u32, height: u32, pixels: &[u8]) {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        self.calls.push(Call::Upload(texture.0));
    }

    fn compile_shader(
        &mut self,
        _stage: ShaderStage,
        source: &str,
    ) -> std::result::Result<ShaderId, String> {
        if self.fail_on.is_some_and(|needle| source.contains(needle)) {
            return Err("syntax error".to_string());
        }
        Ok(ShaderId(self.next()))
    }

    fn delete_shader(&mut self, _shader: ShaderId) {}

    fn link_program(
        &mut self,
        vertex: ShaderId,
        fragment: ShaderId,
    ) -> std::result::Result<ProgramId, String> {
        let program = ProgramId(self.next());
        self.programs.push((program, vertex, fragment));
        Ok(program)
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(Call::DeleteProgram(program.0));
    }

    fn attrib_location(&mut self, _program: ProgramId, name: &str) -> Option<u32> {
        match name {
            "vertexPosition" => Some(0),
            "vertexNormal" => Some(1),
            "vertexTexCoord" => Some(2),
            _ => None,
        }
    }

    fn uniform_location(&mut self, _program: ProgramId, name: &str) -> Option<i32> {
        match name {
            "modelViewProjectionMatrix" => Some(MVP),
            "texCoordTransformMatrix" => Some(TEX_TRANSFORM),
            "texSampler2D" | "texSamplerOES" => Some(SAMPLER),
            _ => None,
        }
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(Call::UseProgram(program.0));
    }

    fn bind_texture(&mut self, target: SamplerTarget, texture: TextureId) {
        self.calls.push(Call::BindTexture(target, texture.0));
    }

    fn uniform_matrix4(&mut self, location: i32, matrix: &Matrix4<f32>) {
        self.calls.push(Call::Matrix(location, *matrix));
    }

    fn uniform_sampler(&mut self, location: i32, unit: i32) {
        self.calls.push(Call::Sampler(location, unit));
    }

    fn vertex_attrib(&mut self, location: u32, components: usize, data: &[f32]) {
        self.calls.push(Call::Attrib(location, components, data.len()));
    }

    fn disable_vertex_attrib(&mut self, location: u32) {
        self.calls.push(Call::DisableAttrib(location));
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.calls.push(Call::Capability(capability, enabled));
    }

    fn set_alpha_blend_func(&mut self) {
        self.calls.push(Call::BlendFunc);
    }

    fn draw_triangles(&mut self, indices: &[u16]) {
        self.calls.push(Call::Draw(indices.len()));
    }
}

#[derive(Default)]
struct MockBackground {
    results: Arc<Mutex<Vec<TrackableResult>>>,
    sections: usize,
    open: bool,
    configs: Vec<VideoBackgroundConfig>,
}

impl VideoBackground for MockBackground {
    fn begin(&mut self) -> Vec<TrackableResult> {
        assert!(!self.open);
        self.open = true;
        self.sections += 1;
        self.results.lock().clone()
    }

    fn draw_video_background(&mut self) {
        assert!(self.open);
    }

    fn end(&mut self) {
        assert!(self.open);
        self.open = false;
    }

    fn video_mode(&self) -> VideoMode {
        VideoMode {
            width: 640,
            height: 480,
        }
    }

    fn projection_matrix(&self, _near: f32, _far: f32) -> Matrix4<f32> {
        Matrix4::identity()
    }

    fn set_video_background_config(&mut self, config: &VideoBackgroundConfig) {
        self.configs.push(*config);
    }
}

type Pipeline = RenderPipeline<RecordingGl, MockBackground>;

fn pipeline() -> (Pipeline, Arc<Mutex<Vec<TrackableResult>>>) {
    let background = MockBackground::default();
    let results = background.results.clone();
    let pipeline =
        RenderPipeline::new(RecordingGl::default(), background, RenderConfig::default()).unwrap();
    (pipeline, results)
}

#[test]
fn test_builds_static_and_external_programs() {
    let (pipeline, _) = pipeline();
    assert_eq!(pipeline.graphics().programs.len(), 2);

    let config = RenderConfig {
        dynamic_sampler: SamplerTarget::Texture2D,
        ..RenderConfig::default()
    };
    let single =
        RenderPipeline::new(RecordingGl::default(), MockBackground::default(), config).unwrap();
    assert_eq!(single.graphics().programs.len(), 1);
}

#[test]
fn test_shader_failure_is_fatal() {
    let gl = RecordingGl {
        fail_on: Some("samplerExternalOES"),
        ..RecordingGl::default()
    };
    let err = RenderPipeline::new(gl, MockBackground::default(), RenderConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::Shader { stage: "fragment", .. }));

    let gl = RecordingGl {
        fail_on: Some("gl_Position"),
        ..RecordingGl::default()
    };
    let err = RenderPipeline::new(gl, MockBackground::default(), RenderConfig::default())
        .unwrap_err();
    assert!(matches!(err, Error::Shader { stage: "vertex", .. }));
}

#[test]
fn test_nothing_drawn_without_target() {
    let (orch, _) = orchestrator();
    let (mut pipeline, results) = pipeline();
    results.lock().push(seen_at("Ace", Vector3::zeros()));

    assert!(!pipeline.render_frame(&orch));
    assert_eq!(pipeline.graphics().draws(), 0);
    assert_eq!(pipeline.background().sections, 1);
    assert!(!pipeline.background().open);

    orch.start_tracking("Ace", [300, 200], "cards");
    results.lock().clear();
    assert!(!pipeline.render_frame(&orch));
    assert_eq!(pipeline.graphics().draws(), 0);
    assert_eq!(pipeline.background().sections, 2);
}

#[test]
fn test_reserved_texture_is_handed_out_once() {
    let (orch, _) = orchestrator();
    let (mut pipeline, _) = pipeline();
    assert!(orch.obtain_texture_id().is_none());

    pipeline.render_frame(&orch);
    pipeline.render_frame(&orch);
    let generated: Vec<u32> = pipeline
        .graphics()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::GenTexture(id) => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(generated.len(), 1);

    assert_eq!(orch.obtain_texture_id(), Some(TextureId(generated[0])));
    assert!(orch.obtain_texture_id().is_none());
    pipeline.render_frame(&orch);
    assert!(orch.obtain_texture_id().is_some());
}

#[test]
fn test_static_overlay_draw() {
    let (orch, _) = orchestrator();
    let (mut pipeline, results) = pipeline();
    orch.start_tracking("Ace", [300, 200], "cards");
    orch.set_static_model(None, None, Vector3::new(2.0, 3.0, 1.0));
    results
        .lock()
        .push(seen_at("Ace", Vector3::new(0.5, 0.0, -4.0)));

    assert!(pipeline.render_frame(&orch));
    let gl = pipeline.graphics();
    assert_eq!(gl.draws(), 1);
    assert!(gl.calls.contains(&Call::Draw(6)));
    assert!(gl.calls.contains(&Call::Attrib(0, 3, 12)));
    assert!(gl.calls.contains(&Call::Attrib(2, 2, 8)));
    assert!(gl.calls.contains(&Call::Sampler(SAMPLER, 0)));

    let static_program = gl.programs[0].0;
    assert!(gl.calls.contains(&Call::UseProgram(static_program.0)));
    let uploaded = gl.calls.iter().find_map(|c| match c {
        Call::Upload(id) => Some(*id),
        _ => None,
    });
    let uploaded = uploaded.unwrap();
    assert!(gl.calls.contains(&Call::BindTexture(SamplerTarget::Texture2D, uploaded)));

    let mvp = gl
        .calls
        .iter()
        .find_map(|c| match c {
            Call::Matrix(MVP, m) => Some(*m),
            _ => None,
        })
        .unwrap();
    let expected = Matrix4::new(
        2.0, 0.0, 0.0, 0.5, //
        0.0, 3.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, -4.0, //
        0.0, 0.0, 0.0, 1.0,
    );
    assert!((mvp - expected).abs().max() < 1e-6);
    assert!(gl.calls.contains(&Call::Matrix(TEX_TRANSFORM, Matrix4::identity())));

    let draw = gl.position(&Call::Draw(6)).unwrap();
    for capability in [Capability::DepthTest, Capability::CullFace, Capability::Blend] {
        let on = gl.position(&Call::Capability(capability, true)).unwrap();
        let off = gl.position(&Call::Capability(capability, false)).unwrap();
        assert!(on < draw && draw < off, "{capability:?}");
    }
    for location in 0..3 {
        assert!(gl.position(&Call::DisableAttrib(location)).unwrap() > draw);
    }
}

#[test]
fn test_static_texture_uploaded_once() {
    let (orch, _) = orchestrator();
    let (mut pipeline, results) = pipeline();
    orch.start_tracking("Ace", [300, 200], "cards");
    results.lock().push(seen_at("Ace", Vector3::zeros()));

    pipeline.render_frame(&orch);
    pipeline.render_frame(&orch);
    let gl = pipeline.graphics();
    assert_eq!(gl.draws(), 2);
    let uploads = gl.calls.iter().filter(|c| matches!(c, Call::Upload(_))).count();
    assert_eq!(uploads, 1);
}

#[test]
fn test_replaced_texture_deleted_on_render_thread() {
    let (orch, _) = orchestrator();
    let (mut pipeline, results) = pipeline();
    orch.start_tracking("Ace", [300, 200], "cards");
    results.lock().push(seen_at("Ace", Vector3::zeros()));
    pipeline.render_frame(&orch);

    let first = pipeline
        .graphics()
        .calls
        .iter()
        .find_map(|c| match c {
            Call::Upload(id) => Some(*id),
            _ => None,
        })
        .unwrap();

    let texture = Texture::new(&[128u8; 4 * 4 * 4], 4, 4, 4).unwrap();
    orch.set_static_model(None, Some(texture), Vector3::new(1.0, 1.0, 1.0));
    let before = pipeline.graphics().calls.len();
    pipeline.render_frame(&orch);

    let frame = &pipeline.graphics().calls[before..];
    assert_eq!(frame[0], Call::DeleteTexture(first));
    assert!(frame.iter().any(|c| matches!(c, Call::Upload(id) if *id != first)));
}

#[test]
fn test_dynamic_overlay_draw() {
    let (orch, _) = orchestrator();
    let (mut pipeline, results) = pipeline();
    orch.start_tracking("Ace", [300, 200], "cards");
    let (mut source, events) = LoggingSource::new(77);
    source.transform = Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, -1.0, 1.0));
    let transform = source.transform;
    orch.set_dynamic_model(source, Vector3::new(1.0, 1.0, 1.0));
    results.lock().push(seen_at("Ace", Vector3::zeros()));

    assert!(pipeline.render_frame(&orch));
    let gl = pipeline.graphics();
    let dynamic_program = gl.programs[1].0;
    assert!(gl.calls.contains(&Call::UseProgram(dynamic_program.0)));
    assert!(gl.calls.contains(&Call::BindTexture(SamplerTarget::External, 77)));
    assert!(gl.calls.contains(&Call::Matrix(TEX_TRANSFORM, transform)));
    assert_eq!(*events.lock(), vec!["produce"]);

    orch.stop_tracking();
    assert!(!pipeline.render_frame(&orch));
    assert_eq!(*events.lock(), vec!["produce", "stop", "drop"]);
}

#[test]
fn test_viewport_updates_only_on_change() {
    let (mut pipeline, _) = pipeline();
    let viewport = Viewport {
        width: 480,
        height: 800,
        portrait: true,
    };
    assert!(pipeline.set_viewport(viewport));
    assert!(!pipeline.set_viewport(viewport));
    assert!(pipeline.set_viewport(Viewport {
        portrait: false,
        ..viewport
    }));

    let configs = &pipeline.background().configs;
    assert_eq!(configs.len(), 2);
    // 640x480 capture laid out rotated: 800 * 480 / 640 = 600 wide.
    assert_eq!((configs[0].size.x, configs[0].size.y), (600, 800));
    assert!(configs[0].enabled && configs[0].synchronous);
}

#[test]
fn test_shutdown_releases_gpu_objects() {
    let (orch, _) = orchestrator();
    let (mut pipeline, _) = pipeline();
    pipeline.render_frame(&orch);
    let (gl, _) = pipeline.shutdown(&orch);

    let reserved = gl
        .calls
        .iter()
        .find_map(|c| match c {
            Call::GenTexture(id) => Some(*id),
            _ => None,
        })
        .unwrap();
    assert!(gl.calls.contains(&Call::DeleteTexture(reserved)));
    for (program, _, _) in &gl.programs {
        assert!(gl.calls.contains(&Call::DeleteProgram(program.0)));
    }
    assert!(orch.obtain_texture_id().is_none());
}
