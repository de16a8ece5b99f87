use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};
use trajectory_format::Dataset;
use trajectory_format::render_settings::{CAMERA_DISTANCE_FACTOR, CAMERA_HEIGHT_FACTOR};

/// Marker for the primary viewport camera.
#[derive(Component)]
pub struct MainCamera;

/// Orbit state: the camera circles a focus target at a zoomable distance.
/// Rotate with left drag, pan the target with right drag, dolly with the
/// wheel.
#[derive(Resource)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitCamera {
    /// Place the camera at the canonical start pose: offset from the scene
    /// centre proportional to the scene scale, vertical component
    /// flattened, looking at the centre.
    pub fn with_dataset(dataset: &Dataset) -> Self {
        let center = Vec3::from_array(dataset.center());
        let scale = dataset.scene_scale().max(1e-3);
        let offset = Vec3::new(1.0, CAMERA_HEIGHT_FACTOR, 1.0) * scale * CAMERA_DISTANCE_FACTOR;
        let distance = offset.length();

        Self {
            target: center,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).asin(),
            distance,
            min_distance: scale * 0.05,
            max_distance: scale * 10.0,
        }
    }

    /// Camera pose for the current orbit state.
    pub fn transform(&self) -> Transform {
        let rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0);
        let eye = self.target + rotation * Vec3::new(0.0, 0.0, self.distance);
        Transform::from_translation(eye).looking_at(self.target, Vec3::Y)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            yaw: 0.78,
            pitch: 0.45,
            distance: 100.0,
            min_distance: 0.1,
            max_distance: 10_000.0,
        }
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    // Left drag orbits around the target.
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        let rotate_sens = 0.005;
        orbit.yaw -= mouse_delta.x * rotate_sens;
        orbit.pitch = (orbit.pitch + mouse_delta.y * rotate_sens).clamp(-1.55, 1.55);
    }

    // Right drag pans the target in the view plane.
    if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
        let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        let pan_speed = orbit.distance * 0.0015;
        let delta = (-right * mouse_delta.x + up * mouse_delta.y) * pan_speed;
        orbit.target += delta;
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        let distance = orbit.distance * (1.0 - scroll_accum * 0.1);
        orbit.distance = distance.clamp(orbit.min_distance, orbit.max_distance);
    }

    // Damped follow keeps interaction smooth without snapping.
    let goal = orbit.transform();
    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(goal.translation, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(goal.rotation, lerp_speed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory_format::{DatasetPayload, FramePayload};

    fn dataset(center: [f32; 3], size: f32) -> Dataset {
        Dataset::from_payload(DatasetPayload {
            frames: vec![FramePayload {
                frame: 0,
                positions: vec![[0.0, 0.0, 0.0]],
                colors: vec![0.5],
                count: 1,
                property_min: 1.0,
                property_max: 1.0,
            }],
            center,
            size,
            global_min: 1.0,
            global_max: 1.0,
        })
        .unwrap()
    }

    #[test]
    fn start_pose_offsets_from_centre_by_scene_scale() {
        let orbit = OrbitCamera::with_dataset(&dataset([10.0, 20.0, 30.0], 4.0));
        let eye = orbit.transform().translation;
        let expected = Vec3::new(10.0, 20.0, 30.0) + Vec3::new(1.0, 0.7, 1.0) * 4.0 * 1.5;
        assert!((eye - expected).length() < 1e-3, "eye {eye:?} vs {expected:?}");
    }

    #[test]
    fn transform_always_looks_at_target() {
        let mut orbit = OrbitCamera::with_dataset(&dataset([5.0, 0.0, -2.0], 8.0));
        orbit.yaw = 2.1;
        orbit.pitch = -0.3;
        let transform = orbit.transform();
        let to_target = (orbit.target - transform.translation).normalize();
        let forward = transform.forward();
        assert!((to_target - *forward).length() < 1e-4);
    }
}
