pub mod assets;
pub mod camera;
pub mod core;
pub mod frame_builder;
pub mod point_cloud;
pub mod scene;
pub mod shaders;
pub mod stereo;
