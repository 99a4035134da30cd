use serde::{Deserialize, Serialize};

use crate::mapgen::SpawnRequest;
use crate::types::Direction;

/// Everything needed to rebuild and re-drive a simulation: the generation
/// inputs plus the full input sequence, in tick order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputJournal {
    pub format_version: u16,
    pub build_id: String,
    pub run_seed: u64,
    pub level_index: u8,
    pub requests: Vec<SpawnRequest>,
    pub inputs: Vec<InputRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub seq: u64,
    pub tick: u64,
    pub payload: InputPayload,
}

/// Actors are addressed by spawn index, which equals placement index for
/// simulations built from a generated level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPayload {
    Queue { actor_index: u32, direction: Direction },
    Lock { actor_index: u32 },
    Unlock { actor_index: u32, delay_ticks: u64 },
}

impl InputJournal {
    pub fn new(run_seed: u64, level_index: u8, requests: Vec<SpawnRequest>) -> Self {
        Self {
            format_version: 1,
            build_id: "dev".to_string(),
            run_seed,
            level_index,
            requests,
            inputs: Vec::new(),
        }
    }

    pub fn append(&mut self, tick: u64, payload: InputPayload) {
        let seq = self.inputs.len() as u64;
        self.inputs.push(InputRecord { seq, tick, payload });
    }
}
