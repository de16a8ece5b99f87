/// One immutable time sample of the simulation.
use crate::error::DatasetError;
use crate::payload::FramePayload;

/// Particle positions and the per-frame-normalised scalar field for a single
/// simulation step. Positions and values are index-aligned, never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    frame_index: u64,
    positions: Vec<[f32; 3]>,
    normalized_values: Vec<f32>,
    raw_min: f64,
    raw_max: f64,
}

impl FrameSnapshot {
    /// Validate and adopt an exported frame. Length mismatches between
    /// positions and scalar values refuse the whole frame, nothing is
    /// truncated.
    pub fn from_payload(payload: FramePayload) -> Result<Self, DatasetError> {
        let FramePayload {
            frame,
            positions,
            colors,
            count,
            property_min,
            property_max,
        } = payload;

        if positions.len() != colors.len() {
            return Err(DatasetError::MalformedFrame {
                frame,
                positions: positions.len(),
                values: colors.len(),
            });
        }
        if count != positions.len() {
            return Err(DatasetError::CountMismatch {
                frame,
                declared: count,
                actual: positions.len(),
            });
        }

        // A collapsed scalar range must have been written as the fixed 0.5
        // midpoint by the exporter, not divided through zero.
        if property_max == property_min && colors.iter().any(|&value| value != 0.5) {
            return Err(DatasetError::DegenerateRange { frame });
        }

        Ok(Self {
            frame_index: frame,
            positions,
            normalized_values: colors,
            raw_min: property_min,
            raw_max: property_max,
        })
    }

    /// Originating simulation step identifier.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normalized_values(&self) -> &[f32] {
        &self.normalized_values
    }

    /// Particle count; positions and values always agree on it.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// Scalar field extrema within this frame, prior to normalisation.
    pub fn raw_min(&self) -> f64 {
        self.raw_min
    }

    pub fn raw_max(&self) -> f64 {
        self.raw_max
    }

    /// True when the frame's scalar range collapsed to a single value.
    pub fn is_degenerate(&self) -> bool {
        self.raw_max == self.raw_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(positions: usize, values: usize) -> FramePayload {
        FramePayload {
            frame: 3,
            positions: vec![[0.0, 0.0, 0.0]; positions],
            colors: (0..values).map(|i| i as f32 / values.max(2) as f32).collect(),
            count: positions,
            property_min: 0.0,
            property_max: 1.0,
        }
    }

    #[test]
    fn mismatched_lengths_refuse_the_frame() {
        let result = FrameSnapshot::from_payload(payload(4, 3));
        assert_eq!(
            result.unwrap_err(),
            DatasetError::MalformedFrame {
                frame: 3,
                positions: 4,
                values: 3,
            }
        );
    }

    #[test]
    fn declared_count_must_match() {
        let mut bad = payload(4, 4);
        bad.count = 5;
        assert_eq!(
            FrameSnapshot::from_payload(bad).unwrap_err(),
            DatasetError::CountMismatch {
                frame: 3,
                declared: 5,
                actual: 4,
            }
        );
    }

    #[test]
    fn degenerate_range_requires_midpoint_values() {
        let mut frame = payload(2, 2);
        frame.property_min = 7.0;
        frame.property_max = 7.0;
        frame.colors = vec![0.5, 0.5];
        let snapshot = FrameSnapshot::from_payload(frame.clone()).unwrap();
        assert!(snapshot.is_degenerate());

        frame.colors = vec![0.5, 0.4];
        assert_eq!(
            FrameSnapshot::from_payload(frame).unwrap_err(),
            DatasetError::DegenerateRange { frame: 3 }
        );
    }

    #[test]
    fn empty_frame_is_allowed() {
        let snapshot = FrameSnapshot::from_payload(payload(0, 0)).unwrap();
        assert_eq!(snapshot.count(), 0);
    }
}
