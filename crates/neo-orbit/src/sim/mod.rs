pub mod driver;
pub mod state;

pub use driver::{SimulationDriver, TickReport};
pub use state::{BodyPosition, FrameOutput, SimulationState};
