pub mod dead_reckoning;
pub mod motion;

pub use dead_reckoning::DeadReckoner;
pub use motion::MotionFilter;
