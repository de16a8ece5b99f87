/// Converts one frame's particles into renderable geometry buffers.
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use trajectory_format::{ColorMap, FrameSnapshot};

/// Parallel buffers describing one frame: slot `i` holds particle `i`'s
/// position and colour in both.
pub struct FrameBuffers {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

/// Colour every particle through the palette. Output lengths always equal
/// the frame's particle count.
pub fn build_frame_buffers(frame: &FrameSnapshot, palette: ColorMap) -> FrameBuffers {
    let mut positions = Vec::with_capacity(frame.count());
    let mut colors = Vec::with_capacity(frame.count());

    for (position, &value) in frame.positions().iter().zip(frame.normalized_values()) {
        positions.push(*position);
        colors.push(palette.sample(value));
    }

    FrameBuffers { positions, colors }
}

/// Expand buffers into quad geometry for the particle material: six
/// vertices per particle, spread into a screen-aligned quad by the vertex
/// shader.
pub fn build_particle_mesh(buffers: &FrameBuffers) -> Mesh {
    let vertex_count = buffers.positions.len() * 6;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);

    for (position, color) in buffers.positions.iter().zip(&buffers.colors) {
        let rgba = [color[0], color[1], color[2], 1.0];
        for _ in 0..6 {
            positions.push(*position);
            colors.push(rgba);
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory_format::FramePayload;

    fn snapshot() -> FrameSnapshot {
        FrameSnapshot::from_payload(FramePayload {
            frame: 0,
            positions: vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            colors: vec![0.0, 0.5, 1.0],
            count: 3,
            property_min: 1.0,
            property_max: 5.0,
        })
        .unwrap()
    }

    #[test]
    fn buffers_are_parallel_and_full_length() {
        let buffers = build_frame_buffers(&snapshot(), ColorMap::Cool);
        assert_eq!(buffers.positions.len(), 3);
        assert_eq!(buffers.colors.len(), 3);
        assert_eq!(buffers.positions[1], [1.0, 2.0, 3.0]);
        // Slot alignment: particle 1 carries the colour of its own scalar.
        assert_eq!(buffers.colors[1], ColorMap::Cool.sample(0.5));
        assert_eq!(buffers.colors[0], [0.0, 1.0, 1.0]);
        assert_eq!(buffers.colors[2], [1.0, 0.0, 1.0]);
    }

    #[test]
    fn mesh_expands_six_vertices_per_particle() {
        let buffers = build_frame_buffers(&snapshot(), ColorMap::Viridis);
        let mesh = build_particle_mesh(&buffers);
        let positions = mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap();
        let colors = mesh.attribute(Mesh::ATTRIBUTE_COLOR).unwrap();
        assert_eq!(positions.len(), 18);
        assert_eq!(colors.len(), 18);
    }

    #[test]
    fn empty_frame_builds_empty_mesh() {
        let empty = FrameSnapshot::from_payload(FramePayload {
            frame: 9,
            positions: vec![],
            colors: vec![],
            count: 0,
            property_min: 0.0,
            property_max: 0.0,
        })
        .unwrap();
        let buffers = build_frame_buffers(&empty, ColorMap::Jet);
        let mesh = build_particle_mesh(&buffers);
        assert_eq!(mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap().len(), 0);
    }
}
