//! Procedural level generation domain split into coherent submodules.

pub mod model;

mod generator;
mod rooms;
mod seed;
mod spawns;

pub use generator::{GenConfig, LevelGenerator};
pub use model::{Level, Room, SpawnPlacement, SpawnRequest};
pub use seed::derive_level_seed;
pub use spawns::plan_spawns;

use crate::types::SpawnError;

pub fn generate_level(
    run_seed: u64,
    level_index: u8,
    requests: &[SpawnRequest],
) -> Result<Level, SpawnError> {
    LevelGenerator::new(GenConfig::for_level(level_index)).generate(
        run_seed,
        level_index,
        requests,
    )
}
