// src/models/mod.rs

pub mod answer;
pub mod assignment;
pub mod enrollment;
pub mod submission;
pub mod user;
