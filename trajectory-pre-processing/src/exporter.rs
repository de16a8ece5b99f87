/// Dump frames to dataset payload exporter orchestrating the conversion.
use crate::lammps::{DumpFrame, read_dump};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use trajectory_format::payload::{DatasetPayload, FramePayload};

/// Converts a LAMMPS trajectory dump into the viewer's JSON dataset payload.
pub struct TrajectoryExporter {
    /// Source trajectory dump path.
    input_path: PathBuf,
    /// Per-particle scalar field visualised via colour.
    field: String,
    /// Dump frame indices to export; empty means every frame.
    frame_indices: Vec<usize>,
    /// Destination payload path, derived from the input filename.
    output_path: PathBuf,
}

impl TrajectoryExporter {
    pub fn new(
        input_path: &str,
        field: &str,
        frame_indices: Vec<usize>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let input_path = PathBuf::from(input_path);
        if !input_path.exists() {
            return Err(format!("input dump does not exist: {}", input_path.display()).into());
        }

        let stem = input_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let output_path = input_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("{stem}_trajectory.json"));

        Ok(Self {
            input_path,
            field: field.to_string(),
            frame_indices,
            output_path,
        })
    }

    /// Executes the full pipeline: read dump, normalise each frame, derive
    /// the scene anchor from the first frame, write the payload JSON.
    pub fn export(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!(
            "Reading {} (field {})...",
            self.input_path.display(),
            self.field
        );
        let reader = BufReader::new(File::open(&self.input_path)?);
        let dump = read_dump(reader, &self.field)?;
        println!("Total frames: {}", dump.len());

        let selected = self.select_frames(&dump)?;
        println!("Exporting {} frames with full particle count...", selected.len());

        let pb = ProgressBar::new(selected.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} frames ({percent}%) {msg}")
                .unwrap()
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Normalising frames");

        let frames: Vec<FramePayload> = selected
            .par_iter()
            .map(|frame| {
                let payload = export_frame(frame);
                pb.inc(1);
                payload
            })
            .collect();
        pb.finish_with_message("Frames normalised");

        let first = &frames[0];
        if first.count == 0 {
            return Err("first frame has no particles, cannot anchor the scene".into());
        }
        let (center, size) = scene_anchor(&first.positions);

        let global_min = frames
            .iter()
            .map(|f| f.property_min)
            .fold(f64::INFINITY, f64::min);
        let global_max = frames
            .iter()
            .map(|f| f.property_max)
            .fold(f64::NEG_INFINITY, f64::max);

        let payload = DatasetPayload {
            frames,
            center,
            size,
            global_min,
            global_max,
        };

        fs::write(&self.output_path, serde_json::to_string(&payload)?)?;
        println!("Payload written: {}", self.output_path.display());
        Ok(())
    }

    /// Resolve the requested dump indices, keeping request order as display
    /// order. No indices requested means the whole dump.
    fn select_frames<'d>(
        &self,
        dump: &'d [DumpFrame],
    ) -> Result<Vec<&'d DumpFrame>, Box<dyn std::error::Error>> {
        if dump.is_empty() {
            return Err("dump contains no frames".into());
        }
        if self.frame_indices.is_empty() {
            return Ok(dump.iter().collect());
        }
        self.frame_indices
            .iter()
            .map(|&index| {
                dump.get(index).ok_or_else(|| {
                    format!("frame index {index} out of range, dump has {}", dump.len()).into()
                })
            })
            .collect()
    }
}

/// Normalise one frame's scalar field to [0,1]. A collapsed range maps every
/// particle to the fixed 0.5 midpoint instead of dividing by zero.
pub fn normalize_values(values: &[f64]) -> (Vec<f32>, f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let normalized = if max > min {
        values
            .iter()
            .map(|&value| ((value - min) / (max - min)) as f32)
            .collect()
    } else {
        vec![0.5; values.len()]
    };
    (normalized, min, max)
}

fn export_frame(frame: &DumpFrame) -> FramePayload {
    let (colors, property_min, property_max) = normalize_values(&frame.scalars);
    FramePayload {
        frame: frame.timestep,
        count: frame.positions.len(),
        positions: frame.positions.clone(),
        colors,
        property_min,
        property_max,
    }
}

/// Scene anchor from the first frame: mean position and bounding-box
/// diagonal length.
pub fn scene_anchor(positions: &[[f32; 3]]) -> ([f32; 3], f32) {
    let count = positions.len() as f32;
    let mut sum = [0.0f32; 3];
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for position in positions {
        for axis in 0..3 {
            sum[axis] += position[axis];
            min[axis] = min[axis].min(position[axis]);
            max[axis] = max[axis].max(position[axis]);
        }
    }
    let center = [sum[0] / count, sum[1] / count, sum[2] / count];
    let diagonal = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
    let size = (diagonal[0] * diagonal[0] + diagonal[1] * diagonal[1] + diagonal[2] * diagonal[2])
        .sqrt();
    (center, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalisation_spans_unit_interval() {
        let (normalized, min, max) = normalize_values(&[1.0, 3.0, 5.0]);
        assert_eq!(normalized, vec![0.0, 0.5, 1.0]);
        assert_eq!(min, 1.0);
        assert_eq!(max, 5.0);
    }

    #[test]
    fn degenerate_range_maps_to_midpoint() {
        let (normalized, min, max) = normalize_values(&[7.0]);
        assert_eq!(normalized, vec![0.5]);
        assert_eq!(min, 7.0);
        assert_eq!(max, 7.0);

        let (normalized, _, _) = normalize_values(&[2.5, 2.5, 2.5]);
        assert_eq!(normalized, vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn exported_frame_keeps_alignment() {
        let frame = DumpFrame {
            timestep: 570,
            positions: vec![[0.0, 0.0, 0.0], [1.0, 2.0, 2.0]],
            scalars: vec![4.0, 8.0],
        };
        let payload = export_frame(&frame);
        assert_eq!(payload.frame, 570);
        assert_eq!(payload.count, 2);
        assert_eq!(payload.positions.len(), payload.colors.len());
        assert_eq!(payload.colors, vec![0.0, 1.0]);
    }

    #[test]
    fn scene_anchor_uses_mean_and_bbox_diagonal() {
        let positions = [[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]];
        let (center, size) = scene_anchor(&positions);
        assert_eq!(center, [0.5, 0.5, 0.5]);
        assert!((size - (12.0f32).sqrt()).abs() < 1e-6);
    }
}
