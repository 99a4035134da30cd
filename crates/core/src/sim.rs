//! Tick-driven simulation context owning the grid, the actor registry,
//! per-actor input queues, unlock timers, and the per-tick event log.
//!
//! One `tick` runs the logic phase (unlock timers, input consumption) and
//! then the integration phase (collision arbitration, interpolation); the
//! two never interleave within a tick. All state lives on this value, so
//! simulations are freely instantiable side by side.

use slotmap::SlotMap;

use crate::content::actor_profile;
use crate::grid::TileGrid;
use crate::input::InputQueue;
use crate::mapgen::Level;
use crate::movement::{Arrival, MovePhase, Mover};
use crate::types::{ActorId, ActorKind, Direction, Pos, SimEvent};

/// Fixed logic/integration step used by replays and the fuzz harness.
pub const TICK_SECONDS: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct ActorState {
    pub id: ActorId,
    pub kind: ActorKind,
    pub mover: Mover,
    pub queue: InputQueue,
    pub steps_taken: u64,
}

#[derive(Clone, Copy, Debug)]
struct PendingUnlock {
    actor: ActorId,
    due_tick: u64,
}

pub struct Simulation {
    seed: u64,
    tick: u64,
    grid: TileGrid,
    actors: SlotMap<ActorId, ActorState>,
    // Stable spawn indices; holes left by despawns keep later indices valid.
    spawn_order: Vec<ActorId>,
    pending_unlocks: Vec<PendingUnlock>,
    events: Vec<SimEvent>,
}

impl Simulation {
    pub fn new(grid: TileGrid, seed: u64) -> Self {
        Self {
            seed,
            tick: 0,
            grid,
            actors: SlotMap::with_key(),
            spawn_order: Vec::new(),
            pending_unlocks: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Spawns one actor per placement, in placement order, so spawn indices
    /// match the level's placement indices.
    pub fn from_level(level: &Level, seed: u64) -> Self {
        let mut sim = Self::new(level.grid.clone(), seed);
        for placement in &level.placements {
            let _ = sim.spawn(placement.kind, placement.pos);
        }
        sim
    }

    pub fn spawn(&mut self, kind: ActorKind, pos: Pos) -> ActorId {
        let profile = actor_profile(kind);
        let id = self.actors.insert_with_key(|id| ActorState {
            id,
            kind,
            mover: Mover::at(pos, profile.speed),
            queue: InputQueue::new(profile.input_capacity),
            steps_taken: 0,
        });
        self.spawn_order.push(id);
        id
    }

    /// Removes the actor and any unlock timer scheduled for it.
    pub fn despawn(&mut self, actor: ActorId) {
        let _ = self.actors.remove(actor);
        self.pending_unlocks.retain(|pending| pending.actor != actor);
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn actor(&self, actor: ActorId) -> Option<&ActorState> {
        self.actors.get(actor)
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorState> {
        self.spawn_order.iter().filter_map(|&id| self.actors.get(id))
    }

    /// Maps a stable spawn index back to the actor, if it still exists.
    pub fn actor_by_index(&self, index: usize) -> Option<ActorId> {
        let id = self.spawn_order.get(index).copied()?;
        self.actors.contains_key(id).then_some(id)
    }

    /// Queues a direction for the actor. Inputs for despawned actors are
    /// dropped, matching the queue's own silent-overflow behavior.
    pub fn enqueue_input(&mut self, actor: ActorId, direction: Direction) {
        if let Some(state) = self.actors.get_mut(actor) {
            state.queue.enqueue(direction);
        }
    }

    pub fn lock_inputs(&mut self, actor: ActorId) {
        if let Some(state) = self.actors.get_mut(actor) {
            state.queue.lock();
        }
    }

    /// Schedules the queue to accept inputs again `delay_ticks` from now.
    /// The timer dies with the actor.
    pub fn unlock_inputs_after(&mut self, actor: ActorId, delay_ticks: u64) {
        if self.actors.contains_key(actor) {
            self.pending_unlocks
                .push(PendingUnlock { actor, due_tick: self.tick + delay_ticks });
        }
    }

    /// One simulation step: logic phase strictly before integration phase.
    pub fn tick(&mut self, dt: f32) {
        self.fire_due_unlocks();
        self.consume_queued_inputs();
        self.arbitrate_collisions();
        self.integrate_motion(dt);
        self.tick += 1;
    }

    /// Drains events accumulated since the previous call. Subscribers read
    /// the drained batch after the tick instead of hooking into dispatch.
    pub fn take_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.tick);
        for &id in &self.spawn_order {
            let Some(actor) = self.actors.get(id) else {
                hasher.write_u8(u8::MAX);
                continue;
            };
            hasher.write_u8(actor.kind as u8);
            hasher.write_u8(match actor.mover.phase {
                MovePhase::Idle => 0,
                MovePhase::Moving => 1,
                MovePhase::FallingBack => 2,
            });
            hasher.write_u32(actor.mover.position.y.to_bits());
            hasher.write_u32(actor.mover.position.x.to_bits());
            hasher.write_i32(actor.mover.destination.y);
            hasher.write_i32(actor.mover.destination.x);
            hasher.write_u64(actor.steps_taken);
        }
        hasher.finish()
    }

    fn fire_due_unlocks(&mut self) {
        let tick = self.tick;
        let mut index = 0;
        while index < self.pending_unlocks.len() {
            if self.pending_unlocks[index].due_tick <= tick {
                let unlock = self.pending_unlocks.swap_remove(index);
                // The actor may have despawned since scheduling.
                if let Some(actor) = self.actors.get_mut(unlock.actor) {
                    actor.queue.unlock();
                }
            } else {
                index += 1;
            }
        }
    }

    fn consume_queued_inputs(&mut self) {
        for &id in &self.spawn_order {
            let Some(actor) = self.actors.get_mut(id) else { continue };
            if actor.mover.phase == MovePhase::Idle && actor.queue.has_inputs() {
                let direction = actor.queue.dequeue();
                actor.mover.begin_step(direction);
            }
        }
    }

    /// Decides every fallback from one immutable snapshot, then applies them,
    /// so the outcome does not depend on actor iteration order.
    fn arbitrate_collisions(&mut self) {
        let mut views = Vec::with_capacity(self.spawn_order.len());
        for (order, &id) in self.spawn_order.iter().enumerate() {
            let Some(actor) = self.actors.get(id) else { continue };
            views.push(MoverView {
                id,
                order,
                phase: actor.mover.phase,
                destination: actor.mover.destination,
                previous_destination: actor.mover.previous_destination,
                distance_to_destination: actor.mover.distance_to_destination(),
                distance_to_previous: actor.mover.distance_to_previous_destination(),
            });
        }

        let mut fallbacks: Vec<ActorId> = Vec::new();
        for view in &views {
            if view.phase == MovePhase::Moving && must_fall_back(view, &views, &self.grid) {
                fallbacks.push(view.id);
            }
        }

        for id in fallbacks {
            let Some(actor) = self.actors.get_mut(id) else { continue };
            let abandoned = actor.mover.destination;
            let retreat_to = actor.mover.previous_destination;
            actor.mover.fall_back();
            self.events.push(SimEvent::CollisionFallback { actor: id, abandoned, retreat_to });
        }
    }

    fn integrate_motion(&mut self, dt: f32) {
        for &id in &self.spawn_order {
            let Some(actor) = self.actors.get_mut(id) else { continue };
            let from = actor.mover.previous_destination;
            match actor.mover.integrate(dt) {
                Some(Arrival::CompletedStep) => {
                    actor.steps_taken += 1;
                    let to = actor.mover.destination;
                    self.events.push(SimEvent::StepTaken { actor: id, from, to });
                    self.events.push(SimEvent::DestinationReached { actor: id, pos: to });
                }
                Some(Arrival::ReturnedToOrigin) => {
                    self.events.push(SimEvent::DestinationReached {
                        actor: id,
                        pos: actor.mover.destination,
                    });
                }
                None => {}
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct MoverView {
    id: ActorId,
    order: usize,
    phase: MovePhase,
    destination: Pos,
    previous_destination: Pos,
    distance_to_destination: f32,
    distance_to_previous: f32,
}

/// Collision arbitration for one Moving actor against the snapshot, in rule
/// order:
/// 1. a Wall (or any non-walkable cell) at the destination, or an Idle actor
///    occupying it, always forces a fallback;
/// 2. a contender already falling back into the cell wins unless this actor
///    is strictly closer to its destination than to its own origin;
/// 3. two movers onto the same cell: the farther one yields, ties broken by
///    spawn order so exactly one side wins;
/// 4. entering a cell another mover is still vacating is refused, which also
///    resolves head-on swaps by sending both actors home.
fn must_fall_back(mover: &MoverView, views: &[MoverView], grid: &TileGrid) -> bool {
    if !grid.is_walkable(mover.destination) {
        return true;
    }

    for other in views {
        if other.id == mover.id {
            continue;
        }
        match other.phase {
            MovePhase::Idle => {
                if other.destination == mover.destination {
                    return true;
                }
            }
            MovePhase::FallingBack => {
                if other.destination == mover.destination
                    && mover.distance_to_destination >= mover.distance_to_previous
                {
                    return true;
                }
            }
            MovePhase::Moving => {
                if other.destination == mover.destination {
                    let farther = mover.distance_to_destination
                        > other.distance_to_destination
                        || (mover.distance_to_destination == other.distance_to_destination
                            && mover.order > other.order);
                    if farther {
                        return true;
                    }
                } else if mover.destination == other.previous_destination {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use crate::types::Tile;

    use super::*;

    fn open_grid(width: usize, height: usize) -> TileGrid {
        let mut grid = TileGrid::new(width, height);
        for y in 1..(height - 1) {
            for x in 1..(width - 1) {
                grid.set(x, y, Tile::Floor);
            }
        }
        for x in 0..width {
            grid.set(x, 0, Tile::Wall);
            grid.set(x, height - 1, Tile::Wall);
        }
        for y in 0..height {
            grid.set(0, y, Tile::Wall);
            grid.set(width - 1, y, Tile::Wall);
        }
        grid
    }

    #[test]
    fn spawned_actor_uses_its_kind_profile() {
        let mut sim = Simulation::new(open_grid(8, 8), 1);
        let slime = sim.spawn(ActorKind::Slime, Pos { y: 2, x: 2 });
        let state = sim.actor(slime).expect("spawned");
        assert_eq!(state.mover.speed, actor_profile(ActorKind::Slime).speed);
        assert_eq!(state.queue.capacity(), actor_profile(ActorKind::Slime).input_capacity);
    }

    #[test]
    fn deferred_unlock_fires_at_its_tick() {
        let mut sim = Simulation::new(open_grid(8, 8), 1);
        let player = sim.spawn(ActorKind::Player, Pos { y: 2, x: 2 });

        sim.lock_inputs(player);
        sim.unlock_inputs_after(player, 2);

        sim.enqueue_input(player, Direction::Right);
        assert!(!sim.actor(player).unwrap().queue.has_inputs());

        sim.tick(TICK_SECONDS);
        sim.tick(TICK_SECONDS);
        // Due tick reached on the third tick's logic phase.
        sim.tick(TICK_SECONDS);
        sim.enqueue_input(player, Direction::Right);
        assert!(sim.actor(player).unwrap().queue.has_inputs());
    }

    #[test]
    fn unlock_timer_never_fires_for_a_despawned_actor() {
        let mut sim = Simulation::new(open_grid(8, 8), 1);
        let slime = sim.spawn(ActorKind::Slime, Pos { y: 3, x: 3 });
        sim.lock_inputs(slime);
        sim.unlock_inputs_after(slime, 1);
        sim.despawn(slime);

        for _ in 0..3 {
            sim.tick(TICK_SECONDS);
        }
        assert!(sim.actor(slime).is_none());
        assert_eq!(sim.actor_by_index(0), None);
    }

    #[test]
    fn take_events_drains_the_log() {
        let mut sim = Simulation::new(open_grid(8, 8), 1);
        let player = sim.spawn(ActorKind::Player, Pos { y: 2, x: 2 });
        sim.enqueue_input(player, Direction::Right);

        for _ in 0..4 {
            sim.tick(TICK_SECONDS);
        }
        let events = sim.take_events();
        assert!(!events.is_empty());
        assert!(sim.take_events().is_empty());
    }

    #[test]
    fn snapshot_hash_tracks_state_changes() {
        let mut sim = Simulation::new(open_grid(8, 8), 1);
        let player = sim.spawn(ActorKind::Player, Pos { y: 2, x: 2 });
        let before = sim.snapshot_hash();

        sim.enqueue_input(player, Direction::Down);
        sim.tick(TICK_SECONDS);
        assert_ne!(before, sim.snapshot_hash());
    }
}
