use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};

/// Unlit vertex-coloured particle material. The vertex shader expands each
/// particle's six vertices into a screen-aligned quad.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct ParticleShader {
    /// x: world-space quad size, derived from the scene scale. Remaining
    /// lanes unused.
    #[uniform(0)]
    pub params: Vec4,
}

impl Material for ParticleShader {
    fn vertex_shader() -> ShaderRef {
        "shaders/particles.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/particles.wgsl".into()
    }
}
