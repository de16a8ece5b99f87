use bevy::prelude::*;
use serde::Deserialize;
use trajectory_format::{Dataset, DatasetPayload};

use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::app_state::AppState;
use crate::engine::point_cloud::RebuildPointCloud;

/// Relative path of the exported dataset payload inside the asset
/// directory, as written by the pre-processing CLI.
pub const RELATIVE_DATASET_PATH: &str = "trajectory/fsw_process_trajectory.json";

/// Dataset payload as a loadable JSON asset.
#[derive(Asset, TypePath, Deserialize)]
pub struct TrajectoryAsset(pub DatasetPayload);

/// Validated dataset backing the whole viewer session. Read-only once
/// inserted.
#[derive(Resource)]
pub struct SceneDataset(pub Dataset);

#[derive(Resource, Default)]
pub struct DatasetLoader {
    handle: Option<Handle<TrajectoryAsset>>,
    failed: bool,
}

/// Load the payload JSON, validate it into the session dataset and hand the
/// app over to the running state. A rejected payload aborts the load
/// entirely; the viewer never renders partial data.
pub fn load_dataset_system(
    mut loader: ResMut<DatasetLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    payloads: Res<Assets<TrajectoryAsset>>,
    mut rebuild: EventWriter<RebuildPointCloud>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    // Start loading if not already started
    if loader.handle.is_none() {
        info!("Loading trajectory payload from: {}", RELATIVE_DATASET_PATH);
        loader.handle = Some(asset_server.load(RELATIVE_DATASET_PATH));
        return;
    }

    if loader.failed {
        return;
    }

    let Some(handle) = &loader.handle else {
        return;
    };
    let Some(asset) = payloads.get(handle) else {
        return;
    };

    match Dataset::from_payload(asset.0.clone()) {
        Ok(dataset) => {
            info!(
                "Trajectory loaded: {} frames, {} particles in the first frame",
                dataset.frame_count(),
                dataset.frame(0).map(|frame| frame.count()).unwrap_or(0)
            );
            commands.insert_resource(OrbitCamera::with_dataset(&dataset));
            commands.insert_resource(SceneDataset(dataset));
            rebuild.send(RebuildPointCloud);
            next_state.set(AppState::Running);
        }
        Err(err) => {
            error!("Trajectory payload rejected: {err}");
            loader.failed = true;
        }
    }
}
