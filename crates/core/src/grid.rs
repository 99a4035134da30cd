//! Dense tile grid with adjacency queries used by generation and movement.

use crate::types::{Pos, Tile};

pub const MIN_GRID_WIDTH: usize = 4;
pub const MIN_GRID_HEIGHT: usize = 3;
pub const MAX_GRID_SIDE: usize = 128;

/// Row-major grid of tiles. Dimensions are fixed for the grid's lifetime;
/// regeneration replaces the whole grid rather than resizing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Allocates a `width` x `height` grid with every cell set to Water.
    ///
    /// Panics when the dimensions fall outside the supported range; sizes are
    /// a caller contract, not runtime input.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            (MIN_GRID_WIDTH..=MAX_GRID_SIDE).contains(&width),
            "grid width {width} outside [{MIN_GRID_WIDTH}, {MAX_GRID_SIDE}]"
        );
        assert!(
            (MIN_GRID_HEIGHT..=MAX_GRID_SIDE).contains(&height),
            "grid height {height} outside [{MIN_GRID_HEIGHT}, {MAX_GRID_SIDE}]"
        );
        Self { width, height, tiles: vec![Tile::Water; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Tile {
        self.tiles[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, tile: Tile) {
        let index = self.index(x, y);
        self.tiles[index] = tile;
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height
    }

    /// A cell an actor may occupy: inside the grid and carved as Floor.
    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.get(pos.x as usize, pos.y as usize) == Tile::Floor
    }

    /// True when any of the 8 neighbors of `(x, y)` holds `tile`, clipped at
    /// the grid edges. Drives the Water-to-Wall promotion pass.
    pub fn has_adjacent_of_type(&self, x: usize, y: usize, tile: Tile) -> bool {
        let x = x as i32;
        let y = y as i32;
        for dy in -1..=1_i32 {
            for dx in -1..=1_i32 {
                if dy == 0 && dx == 0 {
                    continue;
                }
                let neighbor = Pos { y: y + dy, x: x + dx };
                if self.in_bounds(neighbor)
                    && self.get(neighbor.x as usize, neighbor.y as usize) == tile
                {
                    return true;
                }
            }
        }
        false
    }

    /// Every Floor cell with its position, recomputed by full scan on each
    /// call since the grid mutates between generation passes.
    pub fn floor_tiles_with_positions(&self) -> impl Iterator<Item = (Pos, Tile)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(index, &tile)| {
            (tile == Tile::Floor).then(|| {
                let pos =
                    Pos { y: (index / self.width) as i32, x: (index % self.width) as i32 };
                (pos, tile)
            })
        })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "tile access out of bounds: ({x}, {y})");
        y * self.width + x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_water() {
        let grid = TileGrid::new(6, 4);
        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(grid.get(x, y), Tile::Water);
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_outside_grid_panics() {
        let grid = TileGrid::new(6, 4);
        let _ = grid.get(6, 0);
    }

    #[test]
    #[should_panic(expected = "grid width")]
    fn undersized_grid_is_rejected() {
        let _ = TileGrid::new(3, 8);
    }

    #[test]
    fn adjacency_sees_diagonals_and_clips_at_edges() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(2, 2, Tile::Floor);
        assert!(grid.has_adjacent_of_type(1, 1, Tile::Floor));
        assert!(grid.has_adjacent_of_type(3, 3, Tile::Floor));
        assert!(!grid.has_adjacent_of_type(0, 0, Tile::Floor));
        // Corner query must not scan outside the grid.
        assert!(!grid.has_adjacent_of_type(4, 4, Tile::Floor));
    }

    #[test]
    fn floor_scan_is_restartable_and_tracks_mutation() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(1, 1, Tile::Floor);
        assert_eq!(grid.floor_tiles_with_positions().count(), 1);

        grid.set(3, 2, Tile::Floor);
        let positions: Vec<Pos> =
            grid.floor_tiles_with_positions().map(|(pos, _)| pos).collect();
        assert_eq!(positions, vec![Pos { y: 1, x: 1 }, Pos { y: 2, x: 3 }]);
    }
}
