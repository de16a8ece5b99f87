/// Typed failure modes for dataset construction and palette lookup.
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("frame index {index} out of range, frame count is {frame_count}")]
    IndexOutOfRange { index: usize, frame_count: usize },

    #[error("frame {frame}: {positions} positions but {values} scalar values")]
    MalformedFrame {
        frame: u64,
        positions: usize,
        values: usize,
    },

    #[error("frame {frame}: declared count {declared} does not match {actual} particles")]
    CountMismatch {
        frame: u64,
        declared: usize,
        actual: usize,
    },

    #[error("dataset contains no frames")]
    EmptyDataset,

    #[error("scene centre or scale is not finite")]
    NonFiniteExtent,

    #[error("frame {frame}: degenerate scalar range must normalise to 0.5 everywhere")]
    DegenerateRange { frame: u64 },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown palette \"{0}\"")]
pub struct UnknownPalette(pub String);
