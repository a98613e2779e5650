use crate::constants::*;
use crate::location::*;
use bitflags::*;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TerrainFlags: u8 {
        const NONE = 0;
        const WALL = 1;
        const SWAMP = 2;
    }
}

/// Movement class of a tile as seen by the planner.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum TerrainClass {
    Open,
    Difficult,
    Impassable,
}

impl From<TerrainFlags> for TerrainClass {
    fn from(flags: TerrainFlags) -> Self {
        if flags.contains(TerrainFlags::WALL) {
            TerrainClass::Impassable
        } else if flags.contains(TerrainFlags::SWAMP) {
            TerrainClass::Difficult
        } else {
            TerrainClass::Open
        }
    }
}

/// Row-major terrain buffer covering the whole grid.
#[derive(Clone)]
pub struct GridTerrain {
    buffer: Vec<u8>,
}

impl Default for GridTerrain {
    fn default() -> Self {
        GridTerrain::open()
    }
}

impl GridTerrain {
    /// Wrap a raw buffer of `TerrainFlags` bits, one byte per tile.
    /// Missing tiles are treated as open.
    pub fn new(mut buffer: Vec<u8>) -> GridTerrain {
        buffer.resize((ROOM_WIDTH as usize) * (ROOM_HEIGHT as usize), 0);
        GridTerrain { buffer }
    }

    /// A grid with no walls or swamps.
    pub fn open() -> GridTerrain {
        GridTerrain::new(Vec::new())
    }

    /// Parse one text row per grid row: `#` wall, `~` swamp, anything else open.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> GridTerrain {
        let mut terrain = GridTerrain::open();
        for (y, row) in rows.iter().enumerate().take(ROOM_HEIGHT as usize) {
            for (x, ch) in row.as_ref().chars().enumerate().take(ROOM_WIDTH as usize) {
                let flags = match ch {
                    '#' => TerrainFlags::WALL,
                    '~' => TerrainFlags::SWAMP,
                    _ => TerrainFlags::NONE,
                };
                terrain.set_xy(x as u8, y as u8, flags);
            }
        }
        terrain
    }

    fn index(x: u8, y: u8) -> usize {
        (y as usize * ROOM_WIDTH as usize) + (x as usize)
    }

    pub fn get(&self, pos: &Location) -> TerrainFlags {
        self.get_xy(pos.x(), pos.y())
    }

    pub fn get_xy(&self, x: u8, y: u8) -> TerrainFlags {
        TerrainFlags::from_bits_truncate(self.buffer[Self::index(x, y)])
    }

    pub fn set_xy(&mut self, x: u8, y: u8, flags: TerrainFlags) {
        self.buffer[Self::index(x, y)] = flags.bits();
    }

    pub fn class_at(&self, pos: Location) -> TerrainClass {
        self.get(&pos).into()
    }

    pub fn is_wall(&self, x: u8, y: u8) -> bool {
        self.get_xy(x, y).contains(TerrainFlags::WALL)
    }

    pub fn is_swamp(&self, x: u8, y: u8) -> bool {
        self.get_xy(x, y).contains(TerrainFlags::SWAMP)
    }

    /// Number of impassable tiles within Chebyshev `radius` of `center`.
    /// Tiles off the grid are not counted.
    pub fn walls_within(&self, center: Location, radius: u8) -> u32 {
        let r = radius as i16;
        let mut count = 0;
        for dy in -r..=r {
            for dx in -r..=r {
                if let Some(loc) = center.offset(dx, dy) {
                    if self.is_wall(loc.x(), loc.y()) {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

/// Neighbor offsets for 8-directional movement.
pub const NEIGHBORS_8: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];
