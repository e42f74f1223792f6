// Application state management
// Contains the song catalog and where uploaded files live

use crate::config::Config;
use crate::services::storage::UploadStorage;
use crate::state::catalog::Catalog;
use std::sync::Arc;
use tokio::sync::RwLock;

/// State handle shared by every request handler
pub type SharedState = Arc<RwLock<AppState>>;

/// Main application state
/// Constructed once at startup and passed to handlers through axum `State`
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registry of all songs
    pub catalog: Catalog,
    /// Directory uploads are stored in and served from
    pub storage: UploadStorage,
    /// Base URL prepended to `/uploads/{filename}` when building `audioUrl`
    pub public_base_url: String,
}

impl AppState {
    /// Create an empty application state
    pub fn new(storage: UploadStorage, public_base_url: impl Into<String>) -> Self {
        Self {
            catalog: Catalog::new(),
            storage,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create an application state from the loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            UploadStorage::new(config.storage.upload_dir.clone()),
            config.server.public_base_url.clone(),
        )
    }

    /// Wrap the state for sharing across handlers
    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    /// Public URL a stored file is served from
    pub fn audio_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = AppState::new(UploadStorage::new("uploads"), "http://localhost:5000");
        assert!(state.catalog.is_empty());
        assert_eq!(state.storage.root(), std::path::Path::new("uploads"));
    }

    #[test]
    fn test_audio_url() {
        let state = AppState::new(UploadStorage::new("uploads"), "http://localhost:5000/");
        assert_eq!(
            state.audio_url("1-song.mp3"),
            "http://localhost:5000/uploads/1-song.mp3"
        );
    }
}
