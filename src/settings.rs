//! Game settings and preferences
//!
//! Persisted one key per field so a corrupt value only resets itself.

use serde::{Deserialize, Serialize};

use crate::palette::{self, PALETTE_COUNT};
use crate::persistence::{Store, keys};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Scored, the first mistake ends the run
    #[default]
    Classic,
    /// Unscored, mistakes replay the sequence
    Zen,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Zen => "zen",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "zen" => Some(GameMode::Zen),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    /// Index into the palette catalog (always `< PALETTE_COUNT`)
    pub palette: usize,
    pub muted: bool,
}

impl Settings {
    /// Step the palette forward or backward, wrapping around the catalog
    pub fn cycle_palette(&mut self, delta: isize) {
        self.palette = palette::advance(self.palette, delta);
    }

    /// Load settings from the store, falling back per field
    pub fn load<S: Store + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();

        let difficulty = match store.get(keys::DIFFICULTY) {
            Some(raw) => Difficulty::from_str(&raw).unwrap_or_else(|| {
                log::warn!("Invalid stored difficulty {:?}, using default", raw);
                defaults.difficulty
            }),
            None => defaults.difficulty,
        };

        let mode = match store.get(keys::MODE) {
            Some(raw) => GameMode::from_str(&raw).unwrap_or_else(|| {
                log::warn!("Invalid stored game mode {:?}, using default", raw);
                defaults.mode
            }),
            None => defaults.mode,
        };

        let palette = match store.get(keys::PALETTE) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(idx) if idx < PALETTE_COUNT => idx,
                _ => {
                    log::warn!("Invalid stored palette {:?}, using default", raw);
                    defaults.palette
                }
            },
            None => defaults.palette,
        };

        let muted = match store.get(keys::MUTED) {
            Some(raw) => raw.trim().parse::<bool>().unwrap_or_else(|_| {
                log::warn!("Invalid stored mute flag {:?}, using default", raw);
                defaults.muted
            }),
            None => defaults.muted,
        };

        let settings = Self {
            difficulty,
            mode,
            palette,
            muted,
        };
        log::info!(
            "Loaded settings: difficulty={} mode={} palette={} muted={}",
            settings.difficulty.as_str(),
            settings.mode.as_str(),
            settings.palette,
            settings.muted
        );
        settings
    }

    /// Save every field to the store
    pub fn save<S: Store + ?Sized>(&self, store: &mut S) {
        let entries = [
            (keys::DIFFICULTY, self.difficulty.as_str().to_string()),
            (keys::MODE, self.mode.as_str().to_string()),
            (keys::PALETTE, self.palette.to_string()),
            (keys::MUTED, self.muted.to_string()),
        ];
        for (key, value) in entries {
            if let Err(e) = store.set(key, &value) {
                log::warn!("Failed to save setting {}: {}", key, e);
            }
        }
        log::debug!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_store_empty() {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.mode, GameMode::Classic);
        assert_eq!(settings.palette, 0);
        assert!(!settings.muted);
    }

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Hard,
            mode: GameMode::Zen,
            palette: 3,
            muted: true,
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_fields_fall_back_individually() {
        let mut store = MemoryStore::new();
        store.insert(keys::DIFFICULTY, "nightmare");
        store.insert(keys::MODE, "zen");
        store.insert(keys::PALETTE, "42");
        store.insert(keys::MUTED, "yes");

        let settings = Settings::load(&store);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.mode, GameMode::Zen);
        assert_eq!(settings.palette, 0);
        assert!(!settings.muted);
    }

    #[test]
    fn test_cycle_palette_wraps() {
        let mut settings = Settings::default();
        settings.cycle_palette(-1);
        assert_eq!(settings.palette, PALETTE_COUNT - 1);
        settings.cycle_palette(1);
        assert_eq!(settings.palette, 0);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("med"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_str(""), None);
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
    }
}
