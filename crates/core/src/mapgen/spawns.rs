//! Spawn planning: unique Floor positions for each requested actor kind.

use rand_chacha::ChaCha8Rng;

use crate::grid::TileGrid;
use crate::types::{Pos, SpawnError};

use super::model::{SpawnPlacement, SpawnRequest};
use super::seed::random_usize;

/// Assigns every requested spawn unit a distinct Floor position, sampling
/// without replacement. Fails up front when the grid cannot host the total;
/// no partial placement is ever produced.
///
/// The pool is shuffled and then re-sampled at random per pick. The second
/// randomization is redundant; uniqueness and exact counts hold either way.
pub fn plan_spawns(
    grid: &TileGrid,
    requests: &[SpawnRequest],
    rng: &mut ChaCha8Rng,
) -> Result<Vec<SpawnPlacement>, SpawnError> {
    let mut pool: Vec<Pos> = grid.floor_tiles_with_positions().map(|(pos, _)| pos).collect();
    let requested: usize = requests.iter().map(|request| request.quantity).sum();
    if pool.len() < requested {
        return Err(SpawnError::InsufficientSpace { requested, available: pool.len() });
    }

    shuffle(&mut pool, rng);

    let mut placements = Vec::with_capacity(requested);
    for request in requests {
        for _ in 0..request.quantity {
            let slot = random_usize(rng, 0, pool.len() - 1);
            let pos = pool.swap_remove(slot);
            placements.push(SpawnPlacement { kind: request.kind, pos });
        }
    }
    Ok(placements)
}

fn shuffle(pool: &mut [Pos], rng: &mut ChaCha8Rng) {
    for index in (1..pool.len()).rev() {
        let other = random_usize(rng, 0, index);
        pool.swap(index, other);
    }
}
