/// Scene sizing and playback tuning shared by the viewer systems.
///
/// Everything scales off the dataset's scene scale so the same settings work
/// for simulation boxes of any extent.

/// Per-particle quad size relative to the scene scale. Small because frames
/// carry the full undecimated particle count.
pub const PARTICLE_SIZE_FACTOR: f32 = 0.008;

/// Ground grid spans this multiple of the scene scale.
pub const GRID_SIZE_FACTOR: f32 = 2.0;
pub const GRID_DIVISIONS: u32 = 40;

/// Grid sits below the scene centre by this fraction of the scene scale.
pub const GRID_DROP_FACTOR: f32 = 0.5;

/// Coordinate axes length relative to the scene scale.
pub const AXES_SIZE_FACTOR: f32 = 0.5;

/// Initial camera offset from the scene centre, per axis, relative to the
/// scene scale. The vertical component is flattened.
pub const CAMERA_DISTANCE_FACTOR: f32 = 1.5;
pub const CAMERA_HEIGHT_FACTOR: f32 = 0.7;

/// Fixed playback cadence while playing.
pub const PLAYBACK_INTERVAL_SECS: f32 = 0.5;

/// Sample count for the colorbar legend strip.
pub const LEGEND_SAMPLES: usize = 101;

/// Interocular offset for the stereo camera pair, relative to scene scale.
pub const STEREO_EYE_FACTOR: f32 = 0.01;
