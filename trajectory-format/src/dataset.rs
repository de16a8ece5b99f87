/// Immutable in-memory dataset backing the viewer session.
use crate::error::DatasetError;
use crate::frame::FrameSnapshot;
use crate::payload::DatasetPayload;

/// All exported frames plus the global summary used for scene sizing and
/// legend labels. Built once before interaction begins and read-only for the
/// lifetime of the viewer.
#[derive(Debug, Clone)]
pub struct Dataset {
    frames: Vec<FrameSnapshot>,
    center: [f32; 3],
    scene_scale: f32,
    global_min: f64,
    global_max: f64,
}

impl Dataset {
    /// Validate a deserialised payload into the viewer dataset. Any invalid
    /// frame aborts the whole load; the viewer never renders partial data.
    pub fn from_payload(payload: DatasetPayload) -> Result<Self, DatasetError> {
        if payload.frames.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        if !payload.size.is_finite() || payload.center.iter().any(|c| !c.is_finite()) {
            return Err(DatasetError::NonFiniteExtent);
        }

        let frames = payload
            .frames
            .into_iter()
            .map(FrameSnapshot::from_payload)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            frames,
            center: payload.center,
            scene_scale: payload.size,
            global_min: payload.global_min,
            global_max: payload.global_max,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Random access by navigable index, in insertion order.
    pub fn frame(&self, index: usize) -> Result<&FrameSnapshot, DatasetError> {
        self.frames.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            frame_count: self.frames.len(),
        })
    }

    /// Reference point anchoring camera target and grid placement.
    pub fn center(&self) -> [f32; 3] {
        self.center
    }

    /// Scalar extent sizing the grid, axes, camera distance and particles.
    pub fn scene_scale(&self) -> f32 {
        self.scene_scale
    }

    /// Global scalar extrema across all frames. Display labelling only;
    /// colours always reflect per-frame normalisation.
    pub fn global_min(&self) -> f64 {
        self.global_min
    }

    pub fn global_max(&self) -> f64 {
        self.global_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormap::ColorMap;
    use crate::payload::FramePayload;

    /// The worked example from the exporter: two frames, one with a spread
    /// scalar range and one degenerate single-particle frame.
    fn example_payload() -> DatasetPayload {
        DatasetPayload {
            frames: vec![
                FramePayload {
                    frame: 0,
                    positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
                    colors: vec![0.0, 0.5, 1.0],
                    count: 3,
                    property_min: 1.0,
                    property_max: 5.0,
                },
                FramePayload {
                    frame: 285,
                    positions: vec![[2.0, 2.0, 2.0]],
                    colors: vec![0.5],
                    count: 1,
                    property_min: 7.0,
                    property_max: 7.0,
                },
            ],
            center: [0.33, 0.33, 0.0],
            size: 1.414,
            global_min: 1.0,
            global_max: 7.0,
        }
    }

    #[test]
    fn example_dataset_round_trips() {
        let dataset = Dataset::from_payload(example_payload()).unwrap();
        assert_eq!(dataset.frame_count(), 2);
        assert_eq!(dataset.global_min(), 1.0);
        assert_eq!(dataset.global_max(), 7.0);

        let first = dataset.frame(0).unwrap();
        assert_eq!(first.normalized_values(), &[0.0, 0.5, 1.0]);
        assert_eq!(first.raw_min(), 1.0);
        assert_eq!(first.raw_max(), 5.0);

        let second = dataset.frame(1).unwrap();
        assert!(second.is_degenerate());
        assert_eq!(second.normalized_values(), &[0.5]);

        // Midpoint of the cool ramp, as rendered for the degenerate frame.
        assert_eq!(ColorMap::Cool.sample(second.normalized_values()[0]), [
            0.5, 0.5, 1.0
        ]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let dataset = Dataset::from_payload(example_payload()).unwrap();
        assert!(dataset.frame(1).is_ok());
        assert_eq!(
            dataset.frame(2).unwrap_err(),
            DatasetError::IndexOutOfRange {
                index: 2,
                frame_count: 2,
            }
        );
    }

    #[test]
    fn empty_payload_is_rejected() {
        let mut payload = example_payload();
        payload.frames.clear();
        assert_eq!(
            Dataset::from_payload(payload).unwrap_err(),
            DatasetError::EmptyDataset
        );
    }

    #[test]
    fn non_finite_extent_is_rejected() {
        let mut payload = example_payload();
        payload.size = f32::NAN;
        assert_eq!(
            Dataset::from_payload(payload).unwrap_err(),
            DatasetError::NonFiniteExtent
        );

        let mut payload = example_payload();
        payload.center[1] = f32::INFINITY;
        assert_eq!(
            Dataset::from_payload(payload).unwrap_err(),
            DatasetError::NonFiniteExtent
        );
    }

    #[test]
    fn one_bad_frame_aborts_the_load() {
        let mut payload = example_payload();
        payload.frames[1].colors.push(0.25);
        assert!(matches!(
            Dataset::from_payload(payload).unwrap_err(),
            DatasetError::MalformedFrame { frame: 285, .. }
        ));
    }

    #[test]
    fn payload_json_field_names_are_stable() {
        let json = serde_json::to_string(&example_payload()).unwrap();
        for field in [
            "\"frames\"",
            "\"frame\"",
            "\"positions\"",
            "\"colors\"",
            "\"count\"",
            "\"property_min\"",
            "\"property_max\"",
            "\"center\"",
            "\"size\"",
            "\"global_min\"",
            "\"global_max\"",
        ] {
            assert!(json.contains(field), "missing {field} in payload JSON");
        }
        let back: DatasetPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frames.len(), 2);
    }
}
