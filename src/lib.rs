// src/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod utils;
pub mod views;

// The two handles every view is built from.
pub use api::ApiClient;
pub use state::AppState;
