pub mod clock;
pub mod roster;
pub mod smoothing;
pub mod time;
