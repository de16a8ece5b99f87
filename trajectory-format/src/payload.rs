/// Dataset payload wire format shared by the exporter and the viewer.
use serde::{Deserialize, Serialize};

/// One exported simulation frame: particle positions plus the scalar field
/// already normalised to [0,1], with the pre-normalisation extrema kept for
/// display labelling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramePayload {
    /// Originating simulation step. Opaque, not necessarily contiguous.
    pub frame: u64,
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<f32>,
    pub count: usize,
    pub property_min: f64,
    pub property_max: f64,
}

/// Complete dataset payload as serialised to JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetPayload {
    pub frames: Vec<FramePayload>,
    /// Mean position of the first frame, anchors camera and grid placement.
    pub center: [f32; 3],
    /// Bounding-box diagonal of the first frame, sizes the whole scene.
    pub size: f32,
    pub global_min: f64,
    pub global_max: f64,
}
