use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy::ui::IsDefaultUiCamera;
use bevy::window::PresentMode;
use bevy_common_assets::json::JsonAssetPlugin;

mod engine;
mod playback;
mod ui;

use engine::{
    assets::dataset_loader::{DatasetLoader, TrajectoryAsset, load_dataset_system},
    camera::orbit_camera::{MainCamera, OrbitCamera, camera_controller},
    core::app_state::AppState,
    point_cloud::{RebuildPointCloud, rebuild_point_cloud},
    scene::grid::spawn_scene_fixtures,
    shaders::ParticleShader,
    stereo::{StereoMode, stereo_mode_system},
};
use playback::controller::{
    PlaybackCommand, PlaybackTimer, ViewerContext, advance_playback, apply_playback_commands,
    playback_keyboard,
};
use ui::hud::{refresh_hud, seek_bar_interaction, spawn_ui, transport_buttons};

fn main() {
    let mut app = create_app();

    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(async move {
            app.run();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.run();
    }
}

/// Create application wiring dataset loading, playback and rendering
fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(MaterialPlugin::<ParticleShader>::default())
        .add_plugins(JsonAssetPlugin::<TrajectoryAsset>::new(&["json"]));

    app.insert_resource(ClearColor(Color::srgb(0.04, 0.04, 0.04)))
        .init_state::<AppState>()
        .add_event::<PlaybackCommand>()
        .add_event::<RebuildPointCloud>()
        .init_resource::<DatasetLoader>()
        .init_resource::<ViewerContext>()
        .init_resource::<PlaybackTimer>()
        .init_resource::<OrbitCamera>()
        .init_resource::<StereoMode>()
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            load_dataset_system.run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), spawn_scene_fixtures)
        .add_systems(
            Update,
            (
                playback_keyboard,
                transport_buttons,
                seek_bar_interaction,
                advance_playback,
                apply_playback_commands,
                rebuild_point_cloud,
                refresh_hud,
            )
                .chain()
                .run_if(in_state(AppState::Running)),
        )
        .add_systems(
            Update,
            (camera_controller, stereo_mode_system).run_if(in_state(AppState::Running)),
        );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}

fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Particle Trajectory Viewer".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}

/// Spawn the persistent scene: camera, lights and the UI shell. Everything
/// dataset-dependent arrives once loading finishes.
fn setup(mut commands: Commands) {
    info!("=== PARTICLE TRAJECTORY VIEWER ===");

    spawn_camera(&mut commands);
    spawn_lighting(&mut commands);
    spawn_ui(&mut commands);
}

fn spawn_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(-2.5, 4.5, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
        // The UI stays on the primary camera when the stereo eye is active.
        IsDefaultUiCamera,
        MainCamera,
    ));
}

fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 3_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(100.0, 100.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
