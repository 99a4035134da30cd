//! Public data models for generated levels and spawn planning.

use serde::{Deserialize, Serialize};

use crate::grid::TileGrid;
use crate::types::{ActorKind, Pos, Tile};

/// Axis-aligned room rectangle in tile coordinates. The interior (everything
/// but the 1-tile border) is Floor; the border is Wall. `connected` is only
/// mutated during corridor carving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
    pub connected: bool,
}

impl Room {
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self { left, top, width, height, connected: false }
    }

    pub fn right(self) -> usize {
        self.left + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.top + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.top + self.height / 2) as i32, x: (self.left + self.width / 2) as i32 }
    }

    /// Plain AABB overlap; rooms that merely share an edge do not intersect,
    /// so edge-adjacent placements are accepted.
    pub fn intersects(self, other: &Room) -> bool {
        self.left <= other.right()
            && self.right() >= other.left
            && self.top <= other.bottom()
            && self.bottom() >= other.top
    }

    pub fn contains(self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 {
            return false;
        }
        let px = pos.x as usize;
        let py = pos.y as usize;
        px >= self.left && px <= self.right() && py >= self.top && py <= self.bottom()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub kind: ActorKind,
    pub quantity: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPlacement {
    pub kind: ActorKind,
    pub pos: Pos,
}

/// Everything a level build produces: the sealed tile grid, the accepted
/// rooms in acceptance order, and one placement per requested spawn unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    pub placements: Vec<SpawnPlacement>,
}

impl Level {
    /// Stable byte serialization for fingerprinting generated output.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                bytes.push(match self.grid.get(x, y) {
                    Tile::None => 0,
                    Tile::Water => 1,
                    Tile::Floor => 2,
                    Tile::Wall => 3,
                });
            }
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend((room.left as u32).to_le_bytes());
            bytes.extend((room.top as u32).to_le_bytes());
            bytes.extend((room.width as u32).to_le_bytes());
            bytes.extend((room.height as u32).to_le_bytes());
        }

        bytes.extend((self.placements.len() as u32).to_le_bytes());
        for placement in &self.placements {
            bytes.push(match placement.kind {
                ActorKind::Player => 0,
                ActorKind::Exit => 1,
                ActorKind::Slime => 2,
            });
            bytes.extend(placement.pos.y.to_le_bytes());
            bytes.extend(placement.pos.x.to_le_bytes());
        }

        bytes
    }
}
