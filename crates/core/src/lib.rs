pub mod content;
pub mod grid;
pub mod input;
pub mod journal;
pub mod journal_file;
pub mod mapgen;
pub mod movement;
pub mod replay;
pub mod sim;
pub mod types;

pub use grid::TileGrid;
pub use input::InputQueue;
pub use journal::{InputJournal, InputPayload, InputRecord};
pub use mapgen::{GenConfig, Level, LevelGenerator, Room, SpawnPlacement, SpawnRequest};
pub use movement::{MovePhase, Mover};
pub use replay::*;
pub use sim::{ActorState, Simulation, TICK_SECONDS};
pub use types::*;
