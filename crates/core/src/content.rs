use crate::types::ActorKind;

pub struct ActorProfile {
    /// Tiles per second while interpolating toward a destination.
    pub speed: f32,
    /// Input queue capacity; zero means the kind never moves on its own.
    pub input_capacity: usize,
}

pub fn actor_profile(kind: ActorKind) -> ActorProfile {
    match kind {
        ActorKind::Player => ActorProfile { speed: 5.0, input_capacity: 3 },
        ActorKind::Slime => ActorProfile { speed: 2.5, input_capacity: 1 },
        ActorKind::Exit => ActorProfile { speed: 0.0, input_capacity: 0 },
    }
}
