//! Room placement, stamping, corridor carving, and the wall inference pass.

use rand_chacha::ChaCha8Rng;

use crate::grid::TileGrid;
use crate::types::{Pos, Tile};

use super::model::Room;
use super::seed::random_usize;

pub(super) const MIN_ROOM_WIDTH: usize = 4;
pub(super) const MIN_ROOM_HEIGHT: usize = 3;

/// Largest room side for a grid side, at least the matching minimum.
fn max_room_side(grid_side: usize, minimum: usize) -> usize {
    ((grid_side as f32 * 0.35) as usize).max(minimum)
}

/// Rejection-sampling placement: up to `maximum_attempts` candidates are
/// drawn, each rejected on AABB overlap with an accepted room. Exhausting the
/// budget with zero acceptances is a legal degenerate outcome, left to the
/// caller to surface.
pub(super) fn place_rooms(
    rng: &mut ChaCha8Rng,
    grid_width: usize,
    grid_height: usize,
    maximum_rooms: usize,
    maximum_attempts: usize,
) -> Vec<Room> {
    let max_width = max_room_side(grid_width, MIN_ROOM_WIDTH);
    let max_height = max_room_side(grid_height, MIN_ROOM_HEIGHT);

    let mut rooms: Vec<Room> = Vec::new();
    for _ in 0..maximum_attempts {
        if rooms.len() >= maximum_rooms {
            break;
        }

        let room_width = random_usize(rng, MIN_ROOM_WIDTH, max_width);
        let room_height = random_usize(rng, MIN_ROOM_HEIGHT, max_height);
        let left = random_usize(rng, 0, grid_width - room_width);
        let top = random_usize(rng, 0, grid_height - room_height);

        let candidate = Room::new(left, top, room_width, room_height);
        if rooms.iter().any(|existing_room| existing_room.intersects(&candidate)) {
            continue;
        }
        rooms.push(candidate);
    }
    rooms
}

/// Interior cells become Floor, the 1-tile perimeter becomes Wall.
pub(super) fn stamp_room(grid: &mut TileGrid, room: &Room) {
    for y in room.top..=room.bottom() {
        for x in room.left..=room.right() {
            let on_border =
                x == room.left || x == room.right() || y == room.top || y == room.bottom();
            grid.set(x, y, if on_border { Tile::Wall } else { Tile::Floor });
        }
    }
}

/// Connects rooms in acceptance order. Each not-yet-connected room carves one
/// L-shaped corridor to the room at a random index offset, and both endpoints
/// are flagged connected. Corridors overwrite whatever they cross, including
/// walls of unrelated rooms; the target pair may repeat for small room
/// counts. Both quirks are part of the generation contract.
pub(super) fn carve_corridors(grid: &mut TileGrid, rng: &mut ChaCha8Rng, rooms: &mut [Room]) {
    let room_count = rooms.len();
    if room_count < 2 {
        for room in rooms.iter_mut() {
            room.connected = true;
        }
        return;
    }

    for source_index in 0..room_count {
        if rooms[source_index].connected {
            continue;
        }
        let offset = random_usize(rng, 1, room_count - 1);
        let target_index = (source_index + offset) % room_count;

        carve_l_corridor(grid, rooms[source_index].center(), rooms[target_index].center());
        rooms[source_index].connected = true;
        rooms[target_index].connected = true;
    }
}

/// Single-bend corridor from `from` to `to`: one cell at a time along x,
/// then along y, setting every visited cell to Floor.
fn carve_l_corridor(grid: &mut TileGrid, from: Pos, to: Pos) {
    let mut cursor = from;
    grid.set(cursor.x as usize, cursor.y as usize, Tile::Floor);
    while cursor.x != to.x {
        cursor.x += (to.x - cursor.x).signum();
        grid.set(cursor.x as usize, cursor.y as usize, Tile::Floor);
    }
    while cursor.y != to.y {
        cursor.y += (to.y - cursor.y).signum();
        grid.set(cursor.x as usize, cursor.y as usize, Tile::Floor);
    }
}

/// Promotes every Water cell with a Floor neighbor (8-neighborhood) to Wall,
/// sealing rooms and corridors against open Water.
pub(super) fn seal_exposed_water(grid: &mut TileGrid) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get(x, y) == Tile::Water && grid.has_adjacent_of_type(x, y, Tile::Floor) {
                grid.set(x, y, Tile::Wall);
            }
        }
    }
}
