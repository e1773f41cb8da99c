//! Level entity placement
//!
//! Uniform random positions inside the margin band. No overlap avoidance
//! between entities, the start point, or the destination.

use glam::Vec2;

use super::random::RandomSource;
use super::state::Entity;
use crate::consts::PLAY_AREA;
use crate::tuning::Tuning;

/// Generate obstacles then resources for one level.
///
/// Draw order is fixed (each obstacle's x then y, then each resource's x then
/// y) so a given random stream always yields the same layout.
pub fn generate_entities<R: RandomSource + ?Sized>(
    obstacle_count: u32,
    resource_count: u32,
    tuning: &Tuning,
    rng: &mut R,
) -> (Vec<Entity>, Vec<Entity>) {
    let margin = tuning.spawn_margin;
    let obstacles = (0..obstacle_count)
        .map(|id| {
            let pos = random_point(margin, &mut *rng);
            Entity::obstacle(id, pos, tuning.obstacle_size)
        })
        .collect();
    let resources = (0..resource_count)
        .map(|id| {
            let pos = random_point(margin, &mut *rng);
            Entity::resource(id, pos, tuning.resource_size)
        })
        .collect();
    (obstacles, resources)
}

fn random_point<R: RandomSource + ?Sized>(margin: f32, rng: &mut R) -> Vec2 {
    let span = PLAY_AREA - 2.0 * margin;
    let x = margin + rng.next_unit() * span;
    let y = margin + rng.next_unit() * span;
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{SequenceRandom, seeded};
    use crate::sim::state::EntityKind;

    #[test]
    fn counts_and_ids_follow_level() {
        let mut rng = seeded(7);
        let (obstacles, resources) = generate_entities(6, 8, &Tuning::default(), &mut rng);
        assert_eq!(obstacles.len(), 6);
        assert_eq!(resources.len(), 8);
        assert!(obstacles.iter().all(|e| e.kind == EntityKind::Obstacle));
        assert!(resources.iter().all(|e| e.kind == EntityKind::Resource));
        let ids: Vec<u32> = resources.iter().map(|e| e.id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn positions_stay_inside_margin_band() {
        let mut rng = seeded(1234);
        let (obstacles, resources) = generate_entities(200, 200, &Tuning::default(), &mut rng);
        for e in obstacles.iter().chain(resources.iter()) {
            assert!((10.0..=90.0).contains(&e.pos.x), "{:?}", e);
            assert!((10.0..=90.0).contains(&e.pos.y), "{:?}", e);
        }
    }

    #[test]
    fn draws_map_linearly_onto_band() {
        let mut rng = SequenceRandom::new([0.0, 0.5, 0.25, 0.75]);
        let (obstacles, resources) = generate_entities(1, 1, &Tuning::default(), &mut rng);
        assert_eq!(obstacles[0].pos, Vec2::new(10.0, 50.0));
        assert_eq!(resources[0].pos, Vec2::new(30.0, 70.0));
        assert_eq!(rng.consumed(), 4);
    }

    #[test]
    fn same_seed_same_layout() {
        let tuning = Tuning::default();
        let a = generate_entities(9, 6, &tuning, &mut seeded(99));
        let b = generate_entities(9, 6, &tuning, &mut seeded(99));
        assert_eq!(a, b);
    }
}
