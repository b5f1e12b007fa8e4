//! Tile palettes
//!
//! Each palette colors the nine tiles and assigns every tile a tone from
//! the shared tone table in `audio::TONE_FREQUENCIES`.

use crate::consts::GRID_SIZE;

/// Number of palettes in the catalog
pub const PALETTE_COUNT: usize = 5;

/// Visual and audio identity of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileStyle {
    /// CSS color
    pub color: &'static str,
    /// Index into the tone table
    pub tone: usize,
}

/// A named set of tile styles, in grid order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub tiles: [TileStyle; GRID_SIZE as usize],
}

impl Palette {
    /// Tone index for a tile (tiles beyond the grid wrap)
    pub fn tone_for(&self, tile: u8) -> usize {
        self.tiles[tile as usize % self.tiles.len()].tone
    }
}

const fn tile(color: &'static str, tone: usize) -> TileStyle {
    TileStyle { color, tone }
}

static PALETTES: [Palette; PALETTE_COUNT] = [
    Palette {
        name: "Neon",
        tiles: [
            tile("#ff3b6b", 0),
            tile("#ff9f1c", 1),
            tile("#ffe74c", 2),
            tile("#4cff7a", 3),
            tile("#2ec4ff", 4),
            tile("#5a6bff", 5),
            tile("#b44cff", 6),
            tile("#ff4ce1", 7),
            tile("#f5f5f5", 8),
        ],
    },
    Palette {
        name: "Ocean",
        tiles: [
            tile("#03045e", 8),
            tile("#023e8a", 7),
            tile("#0077b6", 6),
            tile("#0096c7", 5),
            tile("#00b4d8", 4),
            tile("#48cae4", 3),
            tile("#90e0ef", 2),
            tile("#ade8f4", 1),
            tile("#caf0f8", 0),
        ],
    },
    Palette {
        name: "Sunset",
        tiles: [
            tile("#355070", 0),
            tile("#6d597a", 2),
            tile("#b56576", 4),
            tile("#e56b6f", 6),
            tile("#eaac8b", 8),
            tile("#f4a261", 1),
            tile("#e76f51", 3),
            tile("#ffb4a2", 5),
            tile("#ffcdb2", 7),
        ],
    },
    Palette {
        name: "Forest",
        tiles: [
            tile("#1b4332", 4),
            tile("#2d6a4f", 3),
            tile("#40916c", 5),
            tile("#52b788", 2),
            tile("#74c69d", 6),
            tile("#95d5b2", 1),
            tile("#b7e4c7", 7),
            tile("#d8f3dc", 0),
            tile("#a3b18a", 8),
        ],
    },
    Palette {
        name: "Mono",
        tiles: [
            tile("#111111", 0),
            tile("#2b2b2b", 1),
            tile("#444444", 2),
            tile("#5e5e5e", 3),
            tile("#777777", 4),
            tile("#919191", 5),
            tile("#aaaaaa", 6),
            tile("#c4c4c4", 7),
            tile("#dddddd", 8),
        ],
    },
];

/// Palette at an index (wrapped into range)
pub fn palette_at(index: usize) -> &'static Palette {
    &PALETTES[index % PALETTE_COUNT]
}

/// Step a palette index by `delta`, wrapping in both directions
pub fn advance(index: usize, delta: isize) -> usize {
    let n = PALETTE_COUNT as isize;
    ((index as isize % n) + delta % n).rem_euclid(n) as usize
}
