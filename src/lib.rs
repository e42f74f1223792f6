//! Song Catalog Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
/// Application state management
///
/// Holds the song catalog and the upload storage handle.
pub mod state;

pub use api::build_router;
