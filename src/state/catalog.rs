// Song catalog
// In-memory, insertion-ordered store of uploaded songs

use serde::Serialize;

/// Unique identifier for a song
pub type SongId = u64;

/// Lowest accepted rating
pub const MIN_RATING: i64 = 1;
/// Highest accepted rating
pub const MAX_RATING: i64 = 6;

/// Song record
/// Metadata for one uploaded audio file
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Unique identifier, never reused after deletion
    pub id: SongId,
    /// Song title
    pub title: String,
    /// Performing artist
    pub artist: String,
    /// Sanitized name of the stored file
    pub filename: String,
    /// Public URL the file is served from
    pub audio_url: String,
    /// Number of likes received
    pub likes: u64,
    /// Rating in 1..=6, or 0 when unrated
    pub rating: u8,
}

impl Song {
    /// Create a new, unliked and unrated song
    pub fn new(
        id: SongId,
        title: String,
        artist: String,
        filename: String,
        audio_url: String,
    ) -> Self {
        Self {
            id,
            title,
            artist,
            filename,
            audio_url,
            likes: 0,
            rating: 0,
        }
    }
}

/// Outcome of a rating attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateOutcome {
    /// Rating stored; carries the updated song
    Rated(Song),
    /// Rating outside the accepted range; the song is unchanged
    OutOfRange,
    /// No song with that id
    NotFound,
}

/// Catalog of songs
/// Keeps insertion order and hands out monotonically increasing ids
#[derive(Debug, Clone)]
pub struct Catalog {
    songs: Vec<Song>,
    next_id: SongId,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            songs: Vec::new(),
            next_id: 1,
        }
    }
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next song id
    /// Ids are never handed out twice, even if the upload later fails
    pub fn reserve_id(&mut self) -> SongId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// All songs in insertion order
    pub fn list(&self) -> &[Song] {
        &self.songs
    }

    /// Number of songs currently held
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Whether the catalog holds no songs
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Append a song
    /// Returns false if a song with the same id is already present
    pub fn insert(&mut self, song: Song) -> bool {
        if self.find(song.id).is_some() {
            return false;
        }
        if song.id >= self.next_id {
            self.next_id = song.id + 1;
        }
        self.songs.push(song);
        true
    }

    /// Find a song by id
    pub fn find(&self, id: SongId) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    /// Apply `f` to the song with the given id and return the updated copy
    pub fn update<F>(&mut self, id: SongId, f: F) -> Option<Song>
    where
        F: FnOnce(&mut Song),
    {
        let song = self.songs.iter_mut().find(|s| s.id == id)?;
        f(song);
        Some(song.clone())
    }

    /// Remove a song, returning it if it existed
    pub fn remove(&mut self, id: SongId) -> Option<Song> {
        let index = self.songs.iter().position(|s| s.id == id)?;
        Some(self.songs.remove(index))
    }

    /// Increment a song's like counter by one
    pub fn like(&mut self, id: SongId) -> Option<Song> {
        self.update(id, |song| song.likes += 1)
    }

    /// Set a song's rating if it lies within `MIN_RATING..=MAX_RATING`
    pub fn rate(&mut self, id: SongId, rating: i64) -> RateOutcome {
        if self.find(id).is_none() {
            return RateOutcome::NotFound;
        }
        let Some(rating) = valid_rating(rating) else {
            return RateOutcome::OutOfRange;
        };
        match self.update(id, |song| song.rating = rating) {
            Some(song) => RateOutcome::Rated(song),
            None => RateOutcome::NotFound,
        }
    }
}

fn valid_rating(rating: i64) -> Option<u8> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        u8::try_from(rating).ok()
    } else {
        None
    }
}
