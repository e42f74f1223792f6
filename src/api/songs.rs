//! Song API handlers
//!
//! Contains HTTP request handlers for uploading, listing, liking, rating
//! and deleting songs.

use crate::error::AppError;
use crate::services::storage::{is_allowed_audio, sanitize_filename};
use crate::state::{RateOutcome, SharedState, Song, SongId};
use axum::{
    body::Bytes,
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection},
        Multipart, Path, State,
    },
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator (e.g., "ok")
    pub status: String,
}

/// Rate song request
#[derive(Debug, Deserialize)]
pub struct RateSongRequest {
    /// Requested rating; anything other than an integer in 1..=6 is rejected
    pub rating: Option<serde_json::Value>,
}

/// Audio file part of an upload
struct UploadedFile {
    original_name: String,
    data: Bytes,
}

/// Parsed multipart upload form
#[derive(Default)]
struct UploadForm {
    title: Option<String>,
    artist: Option<String>,
    audio_file: Option<UploadedFile>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "title" => form.title = Some(field.text().await?),
                "artist" => form.artist = Some(field.text().await?),
                "audioFile" => {
                    // Get filename first (before consuming field)
                    let original_name = field.file_name().unwrap_or("").to_string();
                    let data = field.bytes().await?;
                    form.audio_file = Some(UploadedFile {
                        original_name,
                        data,
                    });
                }
                _ => {
                    warn!("Unknown multipart field: {}", field_name);
                }
            }
        }

        Ok(form)
    }

    /// The file is checked before title and artist
    fn validate(self) -> Result<(String, String, UploadedFile), AppError> {
        let audio_file = match self.audio_file {
            Some(file) if is_allowed_audio(&file.original_name) => file,
            _ => return Err(AppError::InvalidFile),
        };

        let title = non_blank(self.title).ok_or(AppError::MissingField)?;
        let artist = non_blank(self.artist).ok_or(AppError::MissingField)?;

        Ok((title, artist, audio_file))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Resolve the `:id` path segment; a segment that is not a valid id names no song
fn song_id(path: Result<Path<SongId>, PathRejection>) -> Result<SongId, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!("Rejected song id: {}", rejection.body_text());
        AppError::InvalidSongId
    })
}

/// GET /api/songs - List all songs in upload order
pub async fn list_songs(State(state): State<SharedState>) -> Json<Vec<Song>> {
    let state = state.read().await;
    Json(state.catalog.list().to_vec())
}

/// POST /api/upload - Upload a new song
///
/// Accepts multipart form data with:
/// - title: song title
/// - artist: performing artist
/// - audioFile: the audio file (mp3, wav, ogg or m4a)
pub async fn upload_song(
    State(state): State<SharedState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Song>, AppError> {
    // A request that is not multipart at all carries no audio file
    let multipart = multipart.map_err(|rejection| {
        debug!("Rejected upload body: {}", rejection.body_text());
        AppError::InvalidFile
    })?;
    let (title, artist, audio_file) = UploadForm::read(multipart).await?.validate()?;

    // Reserve the id up front so concurrent uploads never share a filename
    let (id, storage) = {
        let mut state = state.write().await;
        (state.catalog.reserve_id(), state.storage.clone())
    };

    let filename = sanitize_filename(&format!("{}-{}", id, audio_file.original_name));
    storage.save(&filename, &audio_file.data).await?;

    info!(
        song_id = id,
        filename = %filename,
        bytes = audio_file.data.len(),
        "Saved uploaded song"
    );

    let mut state = state.write().await;
    let song = Song::new(id, title, artist, filename.clone(), state.audio_url(&filename));
    if !state.catalog.insert(song.clone()) {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Failed to add song (ID {} already exists)",
            id
        )));
    }

    Ok(Json(song))
}

/// POST /api/songs/:id/like - Add one like to a song
pub async fn like_song(
    State(state): State<SharedState>,
    path: Result<Path<SongId>, PathRejection>,
) -> Result<Json<Song>, AppError> {
    let id = song_id(path)?;
    let mut state = state.write().await;
    let song = state
        .catalog
        .like(id)
        .ok_or(AppError::SongNotFound(id))?;

    debug!(song_id = id, likes = song.likes, "Song liked");
    Ok(Json(song))
}

/// POST /api/songs/:id/rate - Set a song's rating
pub async fn rate_song(
    State(state): State<SharedState>,
    path: Result<Path<SongId>, PathRejection>,
    body: Result<Json<RateSongRequest>, JsonRejection>,
) -> Result<Json<Song>, AppError> {
    let id = song_id(path)?;

    // Unreadable bodies and non-integers map to 0, which is always out of
    // range; the catalog reports an unknown id before looking at the rating
    let rating = match body {
        Ok(Json(request)) => request
            .rating
            .as_ref()
            .and_then(serde_json::Value::as_i64)
            .unwrap_or(0),
        Err(rejection) => {
            debug!(song_id = id, "Rejected rating body: {}", rejection.body_text());
            0
        }
    };

    let mut state = state.write().await;
    match state.catalog.rate(id, rating) {
        RateOutcome::Rated(song) => {
            debug!(song_id = id, rating = song.rating, "Song rated");
            Ok(Json(song))
        }
        RateOutcome::OutOfRange => Err(AppError::InvalidRating),
        RateOutcome::NotFound => Err(AppError::SongNotFound(id)),
    }
}

/// DELETE /api/songs/:id - Delete a song and its stored file
///
/// Failing to remove the file is logged and otherwise ignored.
pub async fn delete_song(
    State(state): State<SharedState>,
    path: Result<Path<SongId>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = song_id(path)?;
    let (song, storage) = {
        let mut state = state.write().await;
        let song = state
            .catalog
            .remove(id)
            .ok_or(AppError::SongNotFound(id))?;
        (song, state.storage.clone())
    };

    match storage.remove(&song.filename).await {
        Ok(true) => {}
        Ok(false) => debug!(song_id = id, filename = %song.filename, "Stored file already gone"),
        Err(e) => warn!(song_id = id, error = %format!("{:#}", e), "Failed to remove stored file"),
    }

    info!(song_id = id, "Song deleted");
    Ok(Json(MessageResponse {
        message: "Song deleted successfully".to_string(),
        status: "ok".to_string(),
    }))
}
