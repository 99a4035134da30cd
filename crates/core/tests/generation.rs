use proptest::prelude::*;

use warren_core::mapgen::{self, GenConfig, Level, LevelGenerator, SpawnRequest};
use warren_core::types::{ActorKind, SpawnError, Tile};

fn assert_structural_invariants(level: &Level) {
    // No-overlap: accepted rooms never intersect pairwise.
    for left_index in 0..level.rooms.len() {
        for right_index in (left_index + 1)..level.rooms.len() {
            assert!(
                !level.rooms[left_index].intersects(&level.rooms[right_index]),
                "rooms must not overlap: {:?} vs {:?}",
                level.rooms[left_index],
                level.rooms[right_index]
            );
        }
    }

    // Containment: every room cell lies inside the grid.
    for room in &level.rooms {
        assert!(room.right() < level.grid.width(), "room exceeds grid width: {room:?}");
        assert!(room.bottom() < level.grid.height(), "room exceeds grid height: {room:?}");
    }

    // Connectivity flags: corridor carving visits every room.
    assert!(level.rooms.iter().all(|room| room.connected));

    // Wall sealing: no Water cell still touches Floor after the inference
    // pass.
    for y in 0..level.grid.height() {
        for x in 0..level.grid.width() {
            if level.grid.get(x, y) == Tile::Water {
                assert!(
                    !level.grid.has_adjacent_of_type(x, y, Tile::Floor),
                    "unsealed water at ({x}, {y})"
                );
            }
        }
    }
}

#[test]
fn structural_invariants_hold_across_a_seed_sweep() {
    for seed in 0..40_u64 {
        for level_index in 1..=6_u8 {
            let level = mapgen::generate_level(seed, level_index, &[]).expect("no spawns");
            assert_structural_invariants(&level);
        }
    }
}

#[test]
fn level_four_grid_is_thirteen_by_thirteen_with_rooms_and_floor() {
    let config = GenConfig::for_level(4);
    assert_eq!((config.width, config.height), (13, 13));

    let level = mapgen::generate_level(777, 4, &[]).expect("no spawns");
    assert!(!level.rooms.is_empty(), "generous attempt budget must accept at least one room");
    for room in &level.rooms {
        for y in (room.top + 1)..room.bottom() {
            for x in (room.left + 1)..room.right() {
                assert_eq!(level.grid.get(x, y), Tile::Floor);
            }
        }
    }
    assert!(level.grid.floor_tiles_with_positions().count() > 0);
}

#[test]
fn same_seed_produces_byte_identical_levels() {
    let requests = [
        SpawnRequest { kind: ActorKind::Player, quantity: 1 },
        SpawnRequest { kind: ActorKind::Exit, quantity: 1 },
        SpawnRequest { kind: ActorKind::Slime, quantity: 3 },
    ];
    let a = mapgen::generate_level(88_001, 4, &requests).expect("generation");
    let b = mapgen::generate_level(88_001, 4, &requests).expect("generation");
    assert_eq!(a.canonical_bytes(), b.canonical_bytes());
}

#[test]
fn different_seeds_produce_different_layouts() {
    let a = mapgen::generate_level(123, 4, &[]).expect("generation");
    let b = mapgen::generate_level(456, 4, &[]).expect("generation");
    assert_ne!(a.canonical_bytes(), b.canonical_bytes());
}

#[test]
fn spawn_requests_fill_distinct_floor_tiles_with_exact_kind_counts() {
    let requests = [
        SpawnRequest { kind: ActorKind::Player, quantity: 1 },
        SpawnRequest { kind: ActorKind::Exit, quantity: 1 },
        SpawnRequest { kind: ActorKind::Slime, quantity: 3 },
    ];
    let level = mapgen::generate_level(2_024, 4, &requests).expect("generation");

    assert_eq!(level.placements.len(), 5);
    for placement in &level.placements {
        assert!(level.grid.is_walkable(placement.pos));
    }
    for left_index in 0..level.placements.len() {
        for right_index in (left_index + 1)..level.placements.len() {
            assert_ne!(
                level.placements[left_index].pos,
                level.placements[right_index].pos
            );
        }
    }

    let count_of = |kind: ActorKind| {
        level.placements.iter().filter(|placement| placement.kind == kind).count()
    };
    assert_eq!(count_of(ActorKind::Player), 1);
    assert_eq!(count_of(ActorKind::Exit), 1);
    assert_eq!(count_of(ActorKind::Slime), 3);
}

#[test]
fn oversized_spawn_request_fails_without_partial_placement() {
    let config = GenConfig { width: 13, height: 13, maximum_rooms: 4, maximum_attempts: 0 };
    let requests = [SpawnRequest { kind: ActorKind::Slime, quantity: 10 }];

    let result = LevelGenerator::new(config).generate(42, 1, &requests);
    assert_eq!(
        result.unwrap_err(),
        SpawnError::InsufficientSpace { requested: 10, available: 0 }
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]
    #[test]
    fn generated_levels_keep_structural_invariants(
        seed in any::<u64>(),
        level_index in 1_u8..=8
    ) {
        let level = mapgen::generate_level(seed, level_index, &[]).expect("no spawns");
        assert_structural_invariants(&level);
    }
}
