use anyhow::Result;
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use warren_core::movement::Vec2;
use warren_core::{
    ActorKind, Direction, MovePhase, Simulation, SpawnRequest, TICK_SECONDS, mapgen,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 4)]
    level: u8,
    #[arg(short, long, default_value_t = 1000)]
    ticks: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for max {} ticks...", args.seed, args.ticks);
    let requests = [
        SpawnRequest { kind: ActorKind::Player, quantity: 1 },
        SpawnRequest { kind: ActorKind::Exit, quantity: 1 },
        SpawnRequest { kind: ActorKind::Slime, quantity: 3 },
    ];
    let level = mapgen::generate_level(args.seed, args.level, &requests)
        .map_err(|e| anyhow::anyhow!("Level generation failed: {:?}", e))?;
    let mut sim = Simulation::from_level(&level, args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let movers: Vec<_> = sim
        .actors()
        .filter(|actor| actor.kind != ActorKind::Exit)
        .map(|actor| actor.id)
        .collect();

    for _ in 0..args.ticks {
        for &actor in &movers {
            // Roughly one new command per actor every four ticks.
            if rng.next_u64() % 4 == 0 {
                sim.enqueue_input(actor, choose(&mut rng, &Direction::ALL));
            }
        }
        sim.tick(TICK_SECONDS);
        let _ = sim.take_events();

        // Assert invariants
        for actor in sim.actors() {
            assert!(
                sim.grid().is_walkable(actor.mover.destination),
                "Invariant failed: destination on a non-walkable tile"
            );
            if actor.mover.phase == MovePhase::Idle {
                let snapped = Vec2::from_pos(actor.mover.destination);
                assert_eq!(
                    actor.mover.position, snapped,
                    "Invariant failed: idle actor off its cell"
                );
            }
        }
    }

    let total_steps: u64 = sim.actors().map(|actor| actor.steps_taken).sum();
    println!("Fuzzing completed successfully. Total steps taken: {total_steps}");
    Ok(())
}
