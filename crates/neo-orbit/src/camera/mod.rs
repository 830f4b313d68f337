pub mod rig;
pub mod view;

pub use rig::{CameraRig, Projection};
pub use view::{resolve, CameraPose, CameraPreset, ViewMode};
