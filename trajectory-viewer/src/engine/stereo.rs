use bevy::prelude::*;
use bevy::render::camera::Viewport;
use bevy::window::PrimaryWindow;
use trajectory_format::render_settings::STEREO_EYE_FACTOR;

use crate::engine::assets::dataset_loader::SceneDataset;
use crate::engine::camera::orbit_camera::MainCamera;

/// Side-by-side stereo output toggle. Scene construction is untouched; only
/// the camera rig differs between modes.
#[derive(Resource, Default)]
pub struct StereoMode {
    pub enabled: bool,
}

/// Marker for the secondary eye camera while stereo output is active.
#[derive(Component)]
pub struct StereoEye;

/// Handle the stereo toggle and keep the camera rig consistent with it.
/// While enabled, the primary camera renders the left half of the window
/// and a second camera with a small lateral offset renders the right half.
pub fn stereo_mode_system(
    mut stereo: ResMut<StereoMode>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut main_camera: Query<(&mut Camera, &Transform), (With<MainCamera>, Without<StereoEye>)>,
    mut eye_camera: Query<(Entity, &mut Camera, &mut Transform), (With<StereoEye>, Without<MainCamera>)>,
    dataset: Option<Res<SceneDataset>>,
) {
    if keyboard.just_pressed(KeyCode::KeyV) {
        stereo.enabled = !stereo.enabled;
        info!(
            "Stereo output {}",
            if stereo.enabled { "enabled" } else { "disabled" }
        );
    }

    let Ok((mut camera, main_transform)) = main_camera.single_mut() else {
        return;
    };

    if !stereo.enabled {
        if stereo.is_changed() {
            camera.viewport = None;
            for (entity, _, _) in &eye_camera {
                commands.entity(entity).despawn();
            }
        }
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let width = window.physical_width();
    let height = window.physical_height();
    if width < 2 || height == 0 {
        return;
    }

    let half = UVec2::new(width / 2, height);
    camera.viewport = Some(Viewport {
        physical_position: UVec2::ZERO,
        physical_size: half,
        ..default()
    });

    let eye_separation = dataset
        .map(|dataset| dataset.0.scene_scale())
        .unwrap_or(1.0)
        * STEREO_EYE_FACTOR;
    let eye_transform = Transform {
        translation: main_transform.translation + main_transform.right() * eye_separation,
        rotation: main_transform.rotation,
        scale: Vec3::ONE,
    };
    let eye_viewport = Viewport {
        physical_position: UVec2::new(width / 2, 0),
        physical_size: half,
        ..default()
    };

    if let Ok((_, mut eye, mut transform)) = eye_camera.single_mut() {
        eye.viewport = Some(eye_viewport);
        *transform = eye_transform;
    } else {
        commands.spawn((
            Camera3d::default(),
            Camera {
                order: 1,
                viewport: Some(eye_viewport),
                ..default()
            },
            eye_transform,
            StereoEye,
        ));
    }
}
