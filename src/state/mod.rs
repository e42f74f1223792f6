// State management module
// Handles the song catalog and the upload storage it points into

pub mod app_state;
pub mod catalog;

pub use app_state::{AppState, SharedState};
pub use catalog::{Catalog, RateOutcome, Song, SongId};
