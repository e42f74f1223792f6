//! Upload storage service
//!
//! Owns the upload directory: writing uploaded audio, removing it again,
//! and deciding which names are acceptable.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Audio extensions accepted for upload (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["mp3", "wav", "ogg", "m4a"];

/// Check whether a client-supplied filename has an allowed audio extension
///
/// The extension is everything after the last `.`; a name without a `.`
/// is rejected.
pub fn is_allowed_audio(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// Turn a client-supplied name into a safe, flat storage name
///
/// Path separators become spaces, non-ASCII and unsafe characters are
/// dropped, whitespace runs collapse into `_`, and leading/trailing `.`
/// and `_` are stripped. May return an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let flattened: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .filter(|c| c.is_ascii())
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Upload directory handle
#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Create a handle for the given directory (nothing is touched on disk)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The upload directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist yet
    pub async fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create upload directory {}", self.root.display()))
    }

    /// Path a stored file lives at
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Write `data` under `filename`, replacing any existing file
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err` - If the file could not be created, written or synced
    pub async fn save(&self, filename: &str, data: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.path_for(filename);

        let mut file = fs::File::create(&path)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_all(data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        file.sync_all()
            .await
            .with_context(|| format!("Failed to sync {}", path.display()))?;

        Ok(path)
    }

    /// Remove a stored file
    ///
    /// # Returns
    /// * `Ok(true)` - The file existed and was removed
    /// * `Ok(false)` - There was no such file
    /// * `Err` - The file exists but could not be removed
    pub async fn remove(&self, filename: &str) -> anyhow::Result<bool> {
        let path = self.path_for(filename);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}
