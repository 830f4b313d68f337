pub mod instance;
pub mod traits;

// Re-export key types for convenient access
pub use instance::{BodyBuffer, BodyInstance, FLAG_DEGENERATE, FLAG_HOVERED, FLAG_SELECTED};
pub use traits::{DrawTiming, FrameData, Renderer};
