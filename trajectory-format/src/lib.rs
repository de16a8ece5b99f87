pub mod colormap;
pub mod dataset;
pub mod error;
pub mod frame;
pub mod payload;
pub mod render_settings;

pub use colormap::ColorMap;
pub use dataset::Dataset;
pub use error::{DatasetError, UnknownPalette};
pub use frame::FrameSnapshot;
pub use payload::{DatasetPayload, FramePayload};
