// src/views/mod.rs

pub mod attempt;
pub mod discovery;
pub mod review;

pub use attempt::{AttemptPhase, AttemptView};
pub use review::{GradeForm, ReviewFilter, ReviewView};
