/// Ground grid and coordinate axes sized from the dataset extent.
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::view::NoFrustumCulling;
use trajectory_format::render_settings::{
    AXES_SIZE_FACTOR, GRID_DIVISIONS, GRID_DROP_FACTOR, GRID_SIZE_FACTOR,
};

use crate::engine::assets::dataset_loader::SceneDataset;

#[derive(Component)]
pub struct GroundGrid;

#[derive(Component)]
pub struct CoordinateAxes;

/// Spawn the static scene fixtures once the dataset extent is known: a
/// ground-aligned grid below the particles and axes at the scene centre.
pub fn spawn_scene_fixtures(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    dataset: Res<SceneDataset>,
) {
    let center = Vec3::from_array(dataset.0.center());
    let scale = dataset.0.scene_scale();

    let grid_material = materials.add(StandardMaterial {
        base_color: Color::srgba(1.0, 1.0, 1.0, 0.2),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });
    let grid_mesh = create_grid_mesh(scale * GRID_SIZE_FACTOR, GRID_DIVISIONS);
    let grid_origin = Vec3::new(center.x, center.y - scale * GRID_DROP_FACTOR, center.z);
    commands.spawn((
        Mesh3d(meshes.add(grid_mesh)),
        MeshMaterial3d(grid_material),
        Transform::from_translation(grid_origin),
        Visibility::Visible,
        NoFrustumCulling,
        GroundGrid,
    ));

    let axes_material = materials.add(StandardMaterial {
        base_color: Color::WHITE,
        unlit: true,
        ..default()
    });
    let axes_mesh = create_axes_mesh(scale * AXES_SIZE_FACTOR);
    commands.spawn((
        Mesh3d(meshes.add(axes_mesh)),
        MeshMaterial3d(axes_material),
        Transform::from_translation(center),
        Visibility::Visible,
        NoFrustumCulling,
        CoordinateAxes,
    ));

    info!("Scene fixtures created");
}

/// Flat square grid of line segments centred on the origin.
fn create_grid_mesh(extent: f32, divisions: u32) -> Mesh {
    let half = extent * 0.5;
    let step = extent / divisions as f32;

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;

        let base = vertices.len() as u32;
        vertices.push([offset, 0.0, -half]);
        vertices.push([offset, 0.0, half]);
        vertices.push([-half, 0.0, offset]);
        vertices.push([half, 0.0, offset]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Coordinate axes as three coloured segments: X red, Y green, Z blue.
fn create_axes_mesh(length: f32) -> Mesh {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [length, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, length, 0.0],
        [0.0, 0.0, 0.0],
        [0.0, 0.0, length],
    ];
    let colors: Vec<[f32; 4]> = vec![
        [1.0, 0.2, 0.2, 1.0],
        [1.0, 0.2, 0.2, 1.0],
        [0.2, 1.0, 0.2, 1.0],
        [0.2, 1.0, 0.2, 1.0],
        [0.2, 0.4, 1.0, 1.0],
        [0.2, 0.4, 1.0, 1.0],
    ];

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_mesh_has_a_line_pair_per_division() {
        let mesh = create_grid_mesh(20.0, 40);
        let vertices = mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap().len();
        // 41 offsets, two lines each, two vertices per line.
        assert_eq!(vertices, 41 * 4);
    }

    #[test]
    fn axes_mesh_carries_three_coloured_segments() {
        let mesh = create_axes_mesh(5.0);
        assert_eq!(mesh.attribute(Mesh::ATTRIBUTE_POSITION).unwrap().len(), 6);
        assert_eq!(mesh.attribute(Mesh::ATTRIBUTE_COLOR).unwrap().len(), 6);
    }
}
