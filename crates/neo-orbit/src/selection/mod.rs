pub mod picking;

pub use picking::{nearest_hit, BodyProxy, PickHit, Ray, RayCaster, SelectionState, SphereCaster};
