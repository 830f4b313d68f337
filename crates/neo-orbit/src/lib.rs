pub mod api;
pub mod core;
pub mod orbit;
pub mod data;
pub mod selection;
pub mod camera;
pub mod sim;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::EngineConfig;
pub use api::types::{BodyId, BodyKind};
pub use orbit::{classify, propagate, Degenerate, OrbitClass, OrbitalElements, Propagation};
pub use data::{parse_lookup, ElementsError, NeoRecord, RiskAssessment, RiskLevel};
pub use self::core::clock::{PlayState, SimulationClock, SpeedSetting, TimeController};
pub use self::core::roster::{BodyRoster, FetchState, TrackedBody};
pub use self::core::time::{ProgressThrottle, TickThrottle};
pub use selection::{BodyProxy, PickHit, Ray, RayCaster, SelectionState, SphereCaster};
pub use camera::{CameraPose, CameraPreset, CameraRig, Projection, ViewMode};
pub use sim::{FrameOutput, SimulationDriver, SimulationState, TickReport};
pub use renderer::{BodyBuffer, BodyInstance, DrawTiming, FrameData, Renderer};
pub use bridge::protocol::ProtocolLayout;
pub use input::{InputEvent, InputQueue, UiCommand};
