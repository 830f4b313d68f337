pub mod elements;
pub mod propagator;
pub mod classifier;
pub mod planets;

pub use elements::OrbitalElements;
pub use propagator::{propagate, heliocentric_position, Degenerate, Propagation};
pub use classifier::{classify, OrbitClass};
