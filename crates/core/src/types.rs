use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct ActorId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn step(self, direction: Direction) -> Pos {
        let (dy, dx) = direction.delta();
        Pos { y: self.y + dy, x: self.x + dx }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tile {
    None,
    Water,
    Floor,
    Wall,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Grid delta as `(dy, dx)`; up is toward decreasing y.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const ALL: [Direction; 4] =
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Exit,
    Slime,
}

/// Observable simulation transitions, drained once per tick by subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimEvent {
    StepTaken { actor: ActorId, from: Pos, to: Pos },
    DestinationReached { actor: ActorId, pos: Pos },
    CollisionFallback { actor: ActorId, abandoned: Pos, retreat_to: Pos },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnError {
    /// More placements requested than Floor tiles available; nothing is placed.
    InsufficientSpace { requested: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_exactly_one_grid_unit() {
        let origin = Pos { y: 4, x: 7 };
        for direction in Direction::ALL {
            let stepped = origin.step(direction);
            let moved = (stepped.y - origin.y).abs() + (stepped.x - origin.x).abs();
            assert_eq!(moved, 1);
            assert_eq!(stepped.step(direction.reversed()), origin);
        }
    }
}
