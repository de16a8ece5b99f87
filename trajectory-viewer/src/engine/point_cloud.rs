use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;
use trajectory_format::render_settings::PARTICLE_SIZE_FACTOR;

use crate::engine::assets::dataset_loader::SceneDataset;
use crate::engine::frame_builder::{build_frame_buffers, build_particle_mesh};
use crate::engine::shaders::ParticleShader;
use crate::playback::controller::ViewerContext;

/// Marker for the currently displayed frame's geometry.
#[derive(Component)]
pub struct ParticleCloud;

/// Request to rebuild the displayed frame's geometry. Any number of
/// requests within one tick collapse into a single rebuild.
#[derive(Event)]
pub struct RebuildPointCloud;

/// Swap the point cloud for the context's current frame and palette.
///
/// Remove-then-insert within one system run is the exclusion mechanism:
/// no matter how fast rebuilds are requested, the scene never holds two
/// clouds. The old mesh and material assets are dropped with the entity so
/// the previous frame's buffers are freed.
pub fn rebuild_point_cloud(
    mut events: EventReader<RebuildPointCloud>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ParticleShader>>,
    existing: Query<(Entity, &Mesh3d, &MeshMaterial3d<ParticleShader>), With<ParticleCloud>>,
    dataset: Option<Res<SceneDataset>>,
    context: Res<ViewerContext>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let Some(dataset) = dataset else {
        return;
    };
    let frame = match dataset.0.frame(context.current_frame) {
        Ok(frame) => frame,
        Err(err) => {
            warn!("cannot rebuild point cloud: {err}");
            return;
        }
    };

    for (entity, mesh, material) in &existing {
        meshes.remove(mesh.0.id());
        materials.remove(material.0.id());
        commands.entity(entity).despawn();
    }

    let buffers = build_frame_buffers(frame, context.palette);
    let mesh = build_particle_mesh(&buffers);
    let material = ParticleShader {
        params: Vec4::new(
            dataset.0.scene_scale() * PARTICLE_SIZE_FACTOR,
            0.0,
            0.0,
            0.0,
        ),
    };

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(material)),
        Transform::IDENTITY,
        Visibility::Visible,
        ParticleCloud,
        // The cloud spans the whole scene; culling it wholesale on
        // borderline frusta is worse than drawing it.
        NoFrustumCulling,
    ));

    info!(
        "Frame {} displayed, {} particles",
        context.current_frame,
        frame.count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory_format::{Dataset, DatasetPayload, FramePayload};

    fn four_frame_dataset() -> Dataset {
        let frames = (0..4u64)
            .map(|step| FramePayload {
                frame: step * 285,
                positions: vec![[step as f32, 0.0, 0.0], [0.0, step as f32, 0.0]],
                colors: vec![0.0, 1.0],
                count: 2,
                property_min: 0.0,
                property_max: 1.0,
            })
            .collect();
        Dataset::from_payload(DatasetPayload {
            frames,
            center: [0.0, 0.0, 0.0],
            size: 10.0,
            global_min: 0.0,
            global_max: 1.0,
        })
        .unwrap()
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_event::<RebuildPointCloud>();
        app.insert_resource(Assets::<Mesh>::default());
        app.insert_resource(Assets::<ParticleShader>::default());
        app.insert_resource(SceneDataset(four_frame_dataset()));
        app.insert_resource(ViewerContext::default());
        app.add_systems(Update, rebuild_point_cloud);
        app
    }

    fn cloud_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<ParticleCloud>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn rapid_seeks_leave_exactly_one_cloud() {
        let mut app = test_app();
        for i in 0..100usize {
            app.world_mut().resource_mut::<ViewerContext>().current_frame = i % 4;
            app.world_mut().send_event(RebuildPointCloud);
            app.update();
        }
        assert_eq!(cloud_count(&mut app), 1);
        // Old frame geometry is released, not leaked.
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(app.world().resource::<Assets<ParticleShader>>().len(), 1);
    }

    #[test]
    fn burst_of_requests_collapses_to_one_rebuild() {
        let mut app = test_app();
        for _ in 0..10 {
            app.world_mut().send_event(RebuildPointCloud);
        }
        app.update();
        assert_eq!(cloud_count(&mut app), 1);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
    }

    #[test]
    fn no_request_means_no_cloud() {
        let mut app = test_app();
        app.update();
        assert_eq!(cloud_count(&mut app), 0);
    }

    #[test]
    fn out_of_range_frame_leaves_scene_untouched() {
        let mut app = test_app();
        app.world_mut().send_event(RebuildPointCloud);
        app.update();
        assert_eq!(cloud_count(&mut app), 1);

        app.world_mut().resource_mut::<ViewerContext>().current_frame = 99;
        app.world_mut().send_event(RebuildPointCloud);
        app.update();
        // The stale cloud stays; a rejected index must not blank the scene.
        assert_eq!(cloud_count(&mut app), 1);
    }
}
