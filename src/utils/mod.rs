pub mod id;
pub mod liveness;
pub mod time;
pub mod timer;
