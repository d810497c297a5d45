//! GLSL ES sources of the overlay programs.

pub(crate) const ATTR_POSITION: &str = "vertexPosition";
pub(crate) const ATTR_NORMAL: &str = "vertexNormal";
pub(crate) const ATTR_TEX_COORD: &str = "vertexTexCoord";
pub(crate) const UNIFORM_MVP: &str = "modelViewProjectionMatrix";
pub(crate) const UNIFORM_TEX_TRANSFORM: &str = "texCoordTransformMatrix";
pub(crate) const UNIFORM_SAMPLER_2D: &str = "texSampler2D";
pub(crate) const UNIFORM_SAMPLER_EXTERNAL: &str = "texSamplerOES";

const VERTEX: &str = r#"
attribute vec4 vertexPosition;
attribute vec4 vertexNormal;
attribute vec4 vertexTexCoord;

varying vec4 texCoord;
varying vec4 normal;

uniform mat4 modelViewProjectionMatrix;
uniform mat4 texCoordTransformMatrix;

void main()
{
    gl_Position = modelViewProjectionMatrix * vertexPosition;
    normal = vertexNormal;
    texCoord = texCoordTransformMatrix * vertexTexCoord;
}
"#;

const FRAGMENT_2D: &str = r#"
precision mediump float;

varying vec4 texCoord;
varying vec4 normal;

uniform sampler2D texSampler2D;

void main()
{
    gl_FragColor = texture2DProj(texSampler2D, texCoord);
}
"#;

const FRAGMENT_EXTERNAL: &str = r#"#extension GL_OES_EGL_image_external : require
precision mediump float;

varying vec4 texCoord;

uniform samplerExternalOES texSamplerOES;

void main()
{
    gl_FragColor = texture2DProj(texSamplerOES, texCoord);
}
"#;

/// Shader sources for the static and dynamic programs.
///
/// Both programs share the vertex stage. Custom sources must keep the
/// attribute and uniform names of the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    /// Samples a `sampler2D` named `texSampler2D`.
    pub fragment: String,
    /// Samples a `samplerExternalOES` named `texSamplerOES`.
    pub external_fragment: String,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            vertex: VERTEX.to_string(),
            fragment: FRAGMENT_2D.to_string(),
            external_fragment: FRAGMENT_EXTERNAL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_declare_bound_names() {
        let sources = ShaderSources::default();
        for name in [ATTR_POSITION, ATTR_NORMAL, ATTR_TEX_COORD, UNIFORM_MVP, UNIFORM_TEX_TRANSFORM] {
            assert!(sources.vertex.contains(name), "{name}");
        }
        assert!(sources.fragment.contains(UNIFORM_SAMPLER_2D));
        assert!(sources.external_fragment.contains(UNIFORM_SAMPLER_EXTERNAL));
        // The extension directive must come first.
        assert!(sources.external_fragment.starts_with("#extension"));
    }
}
