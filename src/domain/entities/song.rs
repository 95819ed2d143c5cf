//! Song catalog - static reference data loaded once at startup

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DifficultyTier;

/// One playable song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    /// Number of notes in a generated pattern
    pub note_count: usize,
    pub difficulty: DifficultyTier,
    /// Energy spent when a battle on this song starts
    pub energy_cost: u32,
    /// Nominal length in minutes, advisory only
    pub duration_minutes: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Song catalog is empty")]
    Empty,
    #[error("Duplicate song id: {0}")]
    DuplicateId(String),
    #[error("Song {0} has no notes")]
    NoNotes(String),
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable id → song lookup
#[derive(Debug, Clone)]
pub struct SongCatalog {
    songs: Vec<Song>,
}

impl SongCatalog {
    pub fn new(songs: Vec<Song>) -> Result<Self, CatalogError> {
        if songs.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, song) in songs.iter().enumerate() {
            if song.note_count == 0 {
                return Err(CatalogError::NoNotes(song.id.clone()));
            }
            if songs[..i].iter().any(|other| other.id == song.id) {
                return Err(CatalogError::DuplicateId(song.id.clone()));
            }
        }
        Ok(Self { songs })
    }

    /// Parse a catalog from a JSON array of songs
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let songs: Vec<Song> = serde_json::from_str(json)?;
        Self::new(songs)
    }

    /// The catalog shipped with the game
    pub fn builtin() -> Self {
        let song = |id: &str, name: &str, note_count, difficulty, energy_cost, duration_minutes| Song {
            id: id.to_string(),
            name: name.to_string(),
            note_count,
            difficulty,
            energy_cost,
            duration_minutes,
        };
        let tier = |value| DifficultyTier::new(value).unwrap_or(DifficultyTier::EASIEST);

        Self {
            songs: vec![
                song("tutorial", "🎵 Rhythm Tutorial", 30, tier(1), 10, 1),
                song("pico_theme", "🎸 Pico's Theme", 80, tier(3), 20, 3),
                song("boyfriend_song", "🎤 Boyfriend's Song", 120, tier(4), 30, 5),
                song("final_boss", "🔥 Final Boss", 200, tier(5), 50, 8),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
